//! fewocal: occupancy calendar generator.
//!
//! Single-shot batch run: read the per-property overview files, reconcile
//! the annotation stores, write the calendar document. Meant to be invoked
//! from whatever scheduler refreshes the overview files.

use anyhow::{Context, Result};
use clap::Parser;
use fewocal_core::layout::DEFAULT_SCALE;
use fewocal_pipeline::{run, RunConfig};
use std::path::PathBuf;

/// Generate the occupancy calendar from per-property booking overview files.
#[derive(Debug, Parser)]
#[command(name = "fewocal", version, about)]
struct Args {
    /// Directory with one <property>.txt overview file per property.
    #[arg(long, default_value = "overviews")]
    src: PathBuf,

    /// Output path of the rendered calendar document.
    #[arg(long, short = 'o', default_value = "calendar.html")]
    out: PathBuf,

    /// Seen-bookings store (drives the "new booking" badge).
    #[arg(long, default_value = "seen_bookings.json")]
    seen_store: PathBuf,

    /// Guest-history store (drives the "repeat guest" badge).
    #[arg(long, default_value = "guest_history.json")]
    guest_history: PathBuf,

    /// Blocked-range override file.
    #[arg(long, default_value = "blocked_out_dates.txt")]
    blocked: PathBuf,

    /// Password file consulted when CALENDAR_PASSWORD is unset.
    #[arg(long, default_value = "calendar_password.txt")]
    password_file: PathBuf,

    /// UI scale factor (1.5 = 150% zoom).
    #[arg(long, default_value_t = DEFAULT_SCALE)]
    scale: f64,

    /// Auto-refresh interval in minutes; 0 disables.
    #[arg(long, default_value_t = 60)]
    auto_refresh_min: u32,

    /// Suppress all output except errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose logging (repeat for per-line parser detail).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logger(quiet: bool, verbose: u8) {
    let default_filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.quiet, args.verbose);

    let config = RunConfig {
        src_dir: args.src,
        out_path: args.out,
        seen_store: args.seen_store,
        guest_history: args.guest_history,
        blocked_file: args.blocked,
        password_file: args.password_file,
        scale: args.scale,
        auto_refresh_minutes: args.auto_refresh_min,
    };

    let summary = run(&config).context("calendar run failed")?;
    if !args.quiet {
        println!(
            "Wrote {}: {} properties, {} bookings ({} new, {} repeat), {} blocked",
            config.out_path.display(),
            summary.properties,
            summary.bookings,
            summary.new_bookings,
            summary.repeat_bookings,
            summary.blocked
        );
    }
    Ok(())
}
