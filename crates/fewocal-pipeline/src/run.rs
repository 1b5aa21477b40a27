//! Single-shot run orchestration: read inputs, compute, write outputs, exit.

use crate::guests::GuestHistory;
use crate::seen::SeenStore;
use chrono::{Local, NaiveDate, Utc};
use fewocal_backend::blocked::load_blocked;
use fewocal_backend::overview::collect_bookings;
use fewocal_backend::password::{load_password_hash, PASSWORD_ENV, PASSWORD_FILE};
use fewocal_core::booking::{Annotations, Booking, BookingKey};
use fewocal_core::error::{FewocalError, Result};
use fewocal_core::layout::DEFAULT_SCALE;
use fewocal_core::serializer::{CalendarHtmlSerializer, HtmlOptions};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

/// Everything a run needs to know. All paths and tuning values have the
/// defaults the deployment has always used; the CLI overrides them.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Directory with one `<property>.txt` overview file per property.
    pub src_dir: PathBuf,

    /// Output path of the rendered document, rewritten wholesale each run.
    pub out_path: PathBuf,

    /// Seen-bookings store path.
    pub seen_store: PathBuf,

    /// Guest-history store path.
    pub guest_history: PathBuf,

    /// Blocked-range override file path.
    pub blocked_file: PathBuf,

    /// Password file consulted when `CALENDAR_PASSWORD` is unset.
    pub password_file: PathBuf,

    /// UI scale factor.
    pub scale: f64,

    /// Auto-refresh interval in minutes; 0 disables.
    pub auto_refresh_minutes: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            src_dir: PathBuf::from("overviews"),
            out_path: PathBuf::from("calendar.html"),
            seen_store: PathBuf::from("seen_bookings.json"),
            guest_history: PathBuf::from("guest_history.json"),
            blocked_file: PathBuf::from("blocked_out_dates.txt"),
            password_file: PathBuf::from(PASSWORD_FILE),
            scale: DEFAULT_SCALE,
            auto_refresh_minutes: 60,
        }
    }
}

/// Counts reported after a successful run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Properties on the board.
    pub properties: usize,
    /// Bookings across all properties.
    pub bookings: usize,
    /// Blocked ranges rendered.
    pub blocked: usize,
    /// Booking keys flagged as new.
    pub new_bookings: usize,
    /// Booking keys flagged as repeat-guest.
    pub repeat_bookings: usize,
}

/// Run with the wall clock: today's date and the current timestamp.
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    run_at(
        config,
        Local::now().date_naive(),
        Utc::now().timestamp_millis(),
    )
}

/// Run with an explicit date and generation timestamp.
///
/// One pass: collect the board, reconcile both stores, resolve the
/// password, render, write. Store rewrites are atomic; the only fatal
/// input-independent failure is an unwritable output path.
pub fn run_at(config: &RunConfig, today: NaiveDate, generated_ms: i64) -> Result<RunSummary> {
    let mut board = collect_bookings(&config.src_dir);
    board.attach_blocked(load_blocked(&config.blocked_file));
    log::info!(
        "Collected {} bookings and {} blocked ranges across {} properties",
        board.booking_count(),
        board.blocked_count(),
        board.lanes.len()
    );

    let current: HashSet<BookingKey> = board.bookings().map(Booking::key).collect();
    let mut seen = SeenStore::load(&config.seen_store);
    let new_keys = seen.reconcile(&current, today);
    seen.persist(&config.seen_store)?;

    let mut history = GuestHistory::load(&config.guest_history);
    let repeat_keys = history.record(board.bookings(), today);
    history.persist(&config.guest_history)?;

    let annotations = Annotations {
        new_keys,
        repeat_keys,
    };
    let summary = RunSummary {
        properties: board.lanes.len(),
        bookings: board.booking_count(),
        blocked: board.blocked_count(),
        new_bookings: annotations.new_keys.len(),
        repeat_bookings: annotations.repeat_keys.len(),
    };

    let serializer = CalendarHtmlSerializer::with_options(HtmlOptions {
        scale: config.scale,
        auto_refresh_minutes: config.auto_refresh_minutes,
        password_hash: load_password_hash(PASSWORD_ENV, &config.password_file),
    });
    let html = serializer.serialize(&board, &annotations, today, generated_ms);
    fs::write(&config.out_path, &html)
        .map_err(|err| FewocalError::output_error(&config.out_path, err))?;
    log::info!(
        "Wrote {} ({} new, {} repeat)",
        config.out_path.display(),
        summary.new_bookings,
        summary.repeat_bookings
    );
    Ok(summary)
}
