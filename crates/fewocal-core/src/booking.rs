//! Booking data model.
//!
//! A [`Booking`] is an immutable reservation record for one property; a
//! [`BlockedRange`] is an operator-declared span that renders as occupied but
//! is not a reservation. Identity for annotation purposes is the
//! [`BookingKey`] triple; guest fields never participate in identity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One reservation on one property. `end` is inclusive.
///
/// Parsers guarantee `end >= start`; records violating that are dropped at
/// the parse boundary, never clamped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Booking {
    /// Property the reservation belongs to (file stem of the source file).
    pub property: String,

    /// Guest display name, as exported upstream.
    pub guest: String,

    /// Arrival date.
    pub start: NaiveDate,

    /// Departure date, inclusive.
    pub end: NaiveDate,

    /// Adults + children, when the occupancy field parsed.
    pub guest_count: Option<u32>,

    /// Animals, when the occupancy field parsed.
    pub animal_count: Option<u32>,
}

impl Booking {
    /// The annotation identity of this booking.
    #[inline]
    #[must_use]
    pub fn key(&self) -> BookingKey {
        BookingKey {
            property: self.property.clone(),
            start: self.start,
            end: self.end,
        }
    }
}

/// An operator-declared date span that must render as occupied.
///
/// Same shape as a booking minus the guest fields; kept as a distinct type so
/// it can never leak into turnover or annotation logic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockedRange {
    /// Property the span applies to.
    pub property: String,

    /// First blocked date.
    pub start: NaiveDate,

    /// Last blocked date, inclusive.
    pub end: NaiveDate,
}

/// Identity of a booking: `(property, start, end)`.
///
/// Used as the in-memory key for both persistent stores and the annotation
/// sets. The pipe-delimited string form exists only at the store boundary;
/// see [`BookingKey::storage_key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookingKey {
    /// Property name.
    pub property: String,
    /// Arrival date.
    pub start: NaiveDate,
    /// Departure date, inclusive.
    pub end: NaiveDate,
}

impl BookingKey {
    /// Canonical storage form: `property|YYYY-MM-DD|YYYY-MM-DD`.
    #[must_use]
    pub fn storage_key(&self) -> String {
        format!("{}|{}|{}", self.property, self.start, self.end)
    }

    /// Parse the canonical storage form back into a key.
    ///
    /// Property names may themselves contain `|` in principle, so the two
    /// date fields are taken from the right.
    #[must_use]
    pub fn parse_storage_key(s: &str) -> Option<Self> {
        let (rest, end) = s.rsplit_once('|')?;
        let (property, start) = rest.rsplit_once('|')?;
        if property.is_empty() {
            return None;
        }
        Some(Self {
            property: property.to_string(),
            start: start.parse().ok()?,
            end: end.parse().ok()?,
        })
    }
}

/// Per-run booking classification, computed by the annotation stores.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    /// Keys first observed within the last 7 days.
    pub new_keys: std::collections::HashSet<BookingKey>,

    /// Keys belonging to guests with a recorded earlier completed stay.
    pub repeat_keys: std::collections::HashSet<BookingKey>,
}

/// All bookings and blocked ranges of one property, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyLane {
    /// Property name (raw, not the display override).
    pub property: String,

    /// Bookings sorted by `(start, end)`, stable over file order.
    pub bookings: Vec<Booking>,

    /// Blocked ranges sorted by `(start, end)`.
    pub blocked: Vec<BlockedRange>,
}

/// The full occupancy board: one lane per property, lanes in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarBoard {
    /// Lanes in display order.
    pub lanes: Vec<PropertyLane>,
}

impl CalendarBoard {
    /// Total number of bookings across all lanes.
    #[must_use]
    pub fn booking_count(&self) -> usize {
        self.lanes.iter().map(|l| l.bookings.len()).sum()
    }

    /// Total number of blocked ranges across all lanes.
    #[must_use]
    pub fn blocked_count(&self) -> usize {
        self.lanes.iter().map(|l| l.blocked.len()).sum()
    }

    /// Iterate all bookings in lane order.
    pub fn bookings(&self) -> impl Iterator<Item = &Booking> {
        self.lanes.iter().flat_map(|l| l.bookings.iter())
    }

    /// Attach blocked ranges to their lanes, keeping each lane's list sorted.
    ///
    /// Ranges naming a property without a lane are dropped; the original
    /// system collected them but never rendered them.
    pub fn attach_blocked(&mut self, ranges: Vec<BlockedRange>) {
        for range in ranges {
            match self.lanes.iter_mut().find(|l| l.property == range.property) {
                Some(lane) => lane.blocked.push(range),
                None => {
                    log::debug!(
                        "Dropping blocked range for unknown property {:?}",
                        range.property
                    );
                }
            }
        }
        for lane in &mut self.lanes {
            lane.blocked.sort_by_key(|b| (b.start, b.end));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn key(property: &str, start: NaiveDate, end: NaiveDate) -> BookingKey {
        BookingKey {
            property: property.to_string(),
            start,
            end,
        }
    }

    #[test]
    fn test_storage_key_format() {
        let k = key("Austernfischer", d(2025, 7, 1), d(2025, 7, 8));
        assert_eq!(k.storage_key(), "Austernfischer|2025-07-01|2025-07-08");
    }

    #[test]
    fn test_storage_key_round_trip() {
        let k = key("Dat Lütte Huus1", d(2024, 12, 30), d(2025, 1, 4));
        assert_eq!(
            BookingKey::parse_storage_key(&k.storage_key()),
            Some(k),
            "storage form must round-trip"
        );
    }

    #[test]
    fn test_storage_key_with_pipe_in_property() {
        // Not expected in practice, but must not mis-split.
        let k = key("a|b", d(2025, 1, 1), d(2025, 1, 2));
        assert_eq!(BookingKey::parse_storage_key(&k.storage_key()), Some(k));
    }

    #[test]
    fn test_parse_storage_key_rejects_malformed() {
        for bad in ["", "nopipes", "a|2025-01-01", "|2025-01-01|2025-01-02", "a|x|y"] {
            assert!(
                BookingKey::parse_storage_key(bad).is_none(),
                "'{bad}' should not parse as a storage key"
            );
        }
    }

    #[test]
    fn test_attach_blocked_sorts_and_drops_unknown() {
        let mut board = CalendarBoard {
            lanes: vec![PropertyLane {
                property: "Wellengang 4c".to_string(),
                ..Default::default()
            }],
        };
        board.attach_blocked(vec![
            BlockedRange {
                property: "Wellengang 4c".to_string(),
                start: d(2025, 3, 10),
                end: d(2025, 3, 12),
            },
            BlockedRange {
                property: "Nirgendwo".to_string(),
                start: d(2025, 3, 1),
                end: d(2025, 3, 2),
            },
            BlockedRange {
                property: "Wellengang 4c".to_string(),
                start: d(2025, 2, 1),
                end: d(2025, 2, 3),
            },
        ]);
        assert_eq!(board.blocked_count(), 2, "unknown-property range must be dropped");
        let blocked = &board.lanes[0].blocked;
        assert!(
            blocked[0].start < blocked[1].start,
            "blocked ranges must end up sorted by start"
        );
    }
}
