//! Overview-file backend.
//!
//! One file per property, filename stem = property name, one booking per
//! line in the upstream export format:
//!
//! ```text
//! ref | guest | start | end | length | adults / children / animals | ...
//! ```
//!
//! Malformed upstream data is expected; every failure mode is "skip this
//! line". Nothing in here aborts a file, let alone a run.

use fewocal_core::booking::{Booking, CalendarBoard, PropertyLane};
use fewocal_core::dates::parse_day_month_year;
use fewocal_core::properties::order_properties;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Summary lines carry this token; they are export chrome, not bookings.
pub const SUMMARY_MARKER: &str = "Belegungen";

/// Parse one line of an overview file. Returns `None` for anything that is
/// not a well-formed booking.
#[must_use]
pub fn parse_overview_line(property: &str, line: &str) -> Option<Booking> {
    let line = line.trim();
    if line.is_empty() || line.contains(SUMMARY_MARKER) || !line.contains('|') {
        return None;
    }
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    if fields.len() < 4 {
        log::debug!("Skipping short line for {property:?}: {line:?}");
        return None;
    }
    let start = parse_day_month_year(fields[2]).ok()?;
    let end = parse_day_month_year(fields[3]).ok()?;
    if end < start {
        log::debug!("Skipping inverted range for {property:?}: {line:?}");
        return None;
    }
    let (guest_count, animal_count) = fields
        .get(5)
        .map_or((None, None), |field| parse_occupancy(field));
    Some(Booking {
        property: property.to_string(),
        guest: fields[1].to_string(),
        start,
        end,
        guest_count,
        animal_count,
    })
}

/// Parse the `adults / children / animals` field.
///
/// Guest count is adults + children; animals default to 0 when the field
/// has fewer than three components. Any component that fails to parse
/// leaves both counts unknown; a half-parsed occupancy would be worse
/// than none.
fn parse_occupancy(field: &str) -> (Option<u32>, Option<u32>) {
    let mut numbers = Vec::new();
    for part in field.split('/') {
        match part.trim().parse::<u32>() {
            Ok(n) => numbers.push(n),
            Err(_) => return (None, None),
        }
    }
    let adults = numbers.first().copied().unwrap_or(0);
    let children = numbers.get(1).copied().unwrap_or(0);
    let animals = numbers.get(2).copied().unwrap_or(0);
    (Some(adults + children), Some(animals))
}

/// Parse a whole overview file for one property.
///
/// The result is sorted by `(start, end)`; the sort is stable, so file
/// order breaks ties between bookings with identical ranges.
#[must_use]
pub fn parse_overview(property: &str, content: &str) -> Vec<Booking> {
    let mut bookings: Vec<Booking> = content
        .lines()
        .filter_map(|line| parse_overview_line(property, line))
        .collect();
    bookings.sort_by_key(|b| (b.start, b.end));
    bookings
}

/// Read every `*.txt` overview file in `dir` and build the occupancy board,
/// lanes in display order.
///
/// An unreadable file yields an empty lane for its property; an unreadable
/// directory yields an empty board. Both are warnings, not errors: the run
/// always produces the best document possible from whatever valid data
/// exists.
#[must_use]
pub fn collect_bookings(dir: &Path) -> CalendarBoard {
    let mut paths: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension() == Some(OsStr::new("txt")))
            .collect(),
        Err(err) => {
            log::warn!("Cannot read overview directory {}: {err}", dir.display());
            Vec::new()
        }
    };
    paths.sort();

    let mut names = Vec::new();
    let mut per_property: HashMap<String, Vec<Booking>> = HashMap::new();
    for path in paths {
        let Some(property) = path.file_stem().and_then(OsStr::to_str) else {
            continue;
        };
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                log::warn!(
                    "Cannot read overview file {}; rendering {property:?} as empty: {err}",
                    path.display()
                );
                String::new()
            }
        };
        names.push(property.to_string());
        per_property.insert(property.to_string(), parse_overview(property, &content));
    }

    let lanes = order_properties(names)
        .into_iter()
        .map(|property| PropertyLane {
            bookings: per_property.remove(&property).unwrap_or_default(),
            property,
            blocked: Vec::new(),
        })
        .collect();
    CalendarBoard { lanes }
}
