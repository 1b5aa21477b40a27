//! Blocked-range file loader.
//!
//! Operator-authored overrides for spans that must render as occupied
//! without being bookings (renovation, family use, ...). Plain text, one
//! range per line:
//!
//! ```text
//! # property, start, end[, note]
//! Fischers Huus, 01.03.25, 05.03.25, Handwerker
//! ```
//!
//! The optional note is for the operator; the renderer ignores it.

use fewocal_core::booking::BlockedRange;
use fewocal_core::dates::parse_day_month_year;
use std::fs;
use std::path::Path;

/// Parse blocked-range file content. Duplicates are kept: the file is
/// small, operator-authored data and duplicate overlay bars are harmless.
#[must_use]
pub fn parse_blocked(content: &str) -> Vec<BlockedRange> {
    let mut ranges = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() < 3 {
            log::debug!("Skipping short blocked-range line: {line:?}");
            continue;
        }
        let (Ok(start), Ok(end)) = (
            parse_day_month_year(parts[1]),
            parse_day_month_year(parts[2]),
        ) else {
            log::debug!("Skipping blocked-range line with bad dates: {line:?}");
            continue;
        };
        if end < start {
            log::debug!("Skipping inverted blocked range: {line:?}");
            continue;
        }
        ranges.push(BlockedRange {
            property: parts[0].to_string(),
            start,
            end,
        });
    }
    ranges
}

/// Load the blocked-range file. Missing or unreadable files yield an empty
/// list; blocked ranges are optional data.
#[must_use]
pub fn load_blocked(path: &Path) -> Vec<BlockedRange> {
    match fs::read_to_string(path) {
        Ok(content) => parse_blocked(&content),
        Err(err) => {
            if path.exists() {
                log::warn!("Cannot read blocked-range file {}: {err}", path.display());
            } else {
                log::debug!("No blocked-range file at {}", path.display());
            }
            Vec::new()
        }
    }
}
