//! Guest-history store: when was each guest's first completed stay recorded.
//!
//! Drives the "repeat guest" badge. Stored as one flat JSON object
//! (guest name → ISO date). Only first-ever appearance is timestamped;
//! repeat occurrences never touch the store.

use crate::store::write_json_atomic;
use chrono::NaiveDate;
use fewocal_core::booking::{Booking, BookingKey};
use fewocal_core::error::Result;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

/// First-completed-stay dates per guest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestHistory {
    entries: BTreeMap<String, NaiveDate>,
}

impl GuestHistory {
    /// Load the store; missing or corrupt files yield an empty history.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                if path.exists() {
                    log::warn!(
                        "Cannot read guest history {}: {err}; starting empty",
                        path.display()
                    );
                } else {
                    log::info!("No guest history at {}; starting empty", path.display());
                }
                return Self::default();
            }
        };
        let map: BTreeMap<String, String> = match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(err) => {
                log::warn!(
                    "Corrupt guest history {}: {err}; starting empty",
                    path.display()
                );
                return Self::default();
            }
        };
        let mut entries = BTreeMap::new();
        for (guest, date) in map {
            match date.parse::<NaiveDate>() {
                Ok(date) => {
                    entries.insert(guest, date);
                }
                Err(_) => log::warn!("Dropping unreadable guest-history entry {guest:?}"),
            }
        }
        Self { entries }
    }

    /// Number of recorded guests.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no guest has been recorded yet.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a guest has a recorded first completed stay.
    #[must_use]
    pub fn contains(&self, guest: &str) -> bool {
        self.entries.contains_key(guest)
    }

    /// Replay the current bookings in order: flag bookings of guests already
    /// in history as repeat, then record guests whose stay has completed
    /// (`end < today`) and who are not yet known.
    ///
    /// The sequential order means a guest's very first completed stay is not
    /// flagged in the step that records it, while any of their bookings
    /// processed afterwards (in this run or a later one) is.
    pub fn record<'a, I>(&mut self, bookings: I, today: NaiveDate) -> HashSet<BookingKey>
    where
        I: IntoIterator<Item = &'a Booking>,
    {
        let mut repeat_keys = HashSet::new();
        for booking in bookings {
            if self.entries.contains_key(&booking.guest) {
                repeat_keys.insert(booking.key());
            } else if booking.end < today {
                self.entries.insert(booking.guest.clone(), today);
            }
        }
        repeat_keys
    }

    /// Rewrite the store atomically.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let map: BTreeMap<&String, String> = self
            .entries
            .iter()
            .map(|(guest, date)| (guest, date.to_string()))
            .collect();
        write_json_atomic(path, &map)
    }
}
