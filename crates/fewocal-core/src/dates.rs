//! Parsing and formatting of the booking-file date format.
//!
//! Upstream exports dates as `DD.MM.YYYY` or `DD.MM.YY`, depending on the
//! export template in use; both occur in the wild, sometimes in one file.

use crate::error::{FewocalError, Result};
use chrono::NaiveDate;

/// Parse a `DD.MM.YYYY` or `DD.MM.YY` date string.
///
/// The format is picked from the width of the year token: chrono's `%Y`
/// accepts one to four digits, so a plain try-`%Y`-then-`%y` cascade would
/// read `06.09.21` as the year 21 instead of 2021.
///
/// # Examples
///
/// ```
/// use fewocal_core::dates::parse_day_month_year;
/// use chrono::NaiveDate;
///
/// let d = parse_day_month_year("24.12.2025").unwrap();
/// assert_eq!(d, NaiveDate::from_ymd_opt(2025, 12, 24).unwrap());
///
/// let d = parse_day_month_year("06.09.21").unwrap();
/// assert_eq!(d, NaiveDate::from_ymd_opt(2021, 9, 6).unwrap());
/// ```
pub fn parse_day_month_year(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    let year_width = s.rsplit('.').next().map_or(0, str::len);
    let fmt = match year_width {
        4 => "%d.%m.%Y",
        2 => "%d.%m.%y",
        _ => return Err(FewocalError::DateError(format!("Cannot parse date: {s}"))),
    };
    NaiveDate::parse_from_str(s, fmt)
        .map_err(|_| FewocalError::DateError(format!("Cannot parse date: {s}")))
}

/// Format a date as `DD.MM.YYYY` for display in tooltips and labels.
#[inline]
#[must_use]
pub fn format_day_month_year(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_four_digit_year() {
        assert_eq!(parse_day_month_year("01.03.2024").unwrap(), d(2024, 3, 1));
    }

    #[test]
    fn test_two_digit_year_is_two_thousands() {
        // Regression guard: must not come back as year 21.
        assert_eq!(parse_day_month_year("06.09.21").unwrap(), d(2021, 9, 6));
        assert_eq!(parse_day_month_year("31.12.99").unwrap(), d(1999, 12, 31));
    }

    #[test]
    fn test_surrounding_whitespace() {
        assert_eq!(parse_day_month_year(" 15.07.2026 ").unwrap(), d(2026, 7, 15));
    }

    #[test]
    fn test_rejects_garbage() {
        for bad in ["", "not a date", "2024-03-01", "32.01.2024", "01.13.2024", "1.2.345"] {
            assert!(
                parse_day_month_year(bad).is_err(),
                "'{bad}' should not parse as a date"
            );
        }
    }

    #[test]
    fn test_format_round_trip() {
        let date = d(2025, 1, 5);
        assert_eq!(format_day_month_year(date), "05.01.2025");
        assert_eq!(parse_day_month_year(&format_day_month_year(date)).unwrap(), date);
    }
}
