//! Seen-bookings store: when was each booking key first observed.
//!
//! Drives the "new booking" badge. The store lives as one flat JSON object
//! (`"property|start|end"` → ISO date) and goes through an explicit
//! load / reconcile / persist cycle once per run.

use crate::store::write_json_atomic;
use chrono::{Days, NaiveDate};
use fewocal_core::booking::BookingKey;
use fewocal_core::error::Result;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

/// A booking counts as "new" for this many days after first observation
/// (inclusive).
pub const NEW_WINDOW_DAYS: i64 = 7;

/// Seed backdate applied on a cold start, one day past the new-window so
/// pre-existing bookings never light up as new.
pub const SEED_BACKDATE_DAYS: u64 = 8;

/// First-seen dates for every booking key currently known.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenStore {
    entries: BTreeMap<BookingKey, NaiveDate>,
    cold_start: bool,
}

impl SeenStore {
    /// Load the store. A missing, unreadable or corrupt file yields an empty
    /// store flagged as a cold start; it is overwritten on the next persist.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let cold = Self {
            entries: BTreeMap::new(),
            cold_start: true,
        };
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                if path.exists() {
                    log::warn!("Cannot read seen-store {}: {err}; starting cold", path.display());
                } else {
                    log::info!("No seen-store at {}; first run", path.display());
                }
                return cold;
            }
        };
        let map: BTreeMap<String, String> = match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(err) => {
                log::warn!(
                    "Corrupt seen-store {}: {err}; starting cold",
                    path.display()
                );
                return cold;
            }
        };
        let mut entries = BTreeMap::new();
        for (key, date) in map {
            match (BookingKey::parse_storage_key(&key), date.parse::<NaiveDate>()) {
                (Some(key), Ok(date)) => {
                    entries.insert(key, date);
                }
                _ => log::warn!("Dropping unreadable seen-store entry {key:?}"),
            }
        }
        Self {
            entries,
            cold_start: false,
        }
    }

    /// Whether this store started cold (no usable prior state).
    #[inline]
    #[must_use]
    pub fn cold_start(&self) -> bool {
        self.cold_start
    }

    /// Number of tracked keys.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store tracks no keys.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First-seen date of a key, if tracked.
    #[must_use]
    pub fn first_seen(&self, key: &BookingKey) -> Option<NaiveDate> {
        self.entries.get(key).copied()
    }

    /// Reconcile the store against the current booking set and return the
    /// keys considered new.
    ///
    /// Seeds unknown keys (backdated past the new-window on a cold start),
    /// prunes keys that vanished, and applies the one-time migration for
    /// stores written by an earlier buggy version that stamped everything
    /// with its own run date. Content-idempotent: rerunning with the same
    /// booking set flags the same keys.
    pub fn reconcile(
        &mut self,
        current: &HashSet<BookingKey>,
        today: NaiveDate,
    ) -> HashSet<BookingKey> {
        if !self.entries.is_empty() && self.entries.values().all(|date| *date == today) {
            let backdated = today - Days::new(SEED_BACKDATE_DAYS);
            for date in self.entries.values_mut() {
                *date = backdated;
            }
            log::info!(
                "Migrated seen-store: backdated {} uniform entries",
                self.entries.len()
            );
        }

        let seed = if self.cold_start {
            today - Days::new(SEED_BACKDATE_DAYS)
        } else {
            today
        };
        for key in current {
            self.entries.entry(key.clone()).or_insert(seed);
        }
        self.entries.retain(|key, _| current.contains(key));

        current
            .iter()
            .filter(|key| {
                self.entries
                    .get(*key)
                    .map_or(false, |first| (today - *first).num_days() <= NEW_WINDOW_DAYS)
            })
            .cloned()
            .collect()
    }

    /// Rewrite the store atomically.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let map: BTreeMap<String, String> = self
            .entries
            .iter()
            .map(|(key, date)| (key.storage_key(), date.to_string()))
            .collect();
        write_json_atomic(path, &map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn key(property: &str) -> BookingKey {
        BookingKey {
            property: property.to_string(),
            start: d(2025, 7, 1),
            end: d(2025, 7, 8),
        }
    }

    fn today() -> NaiveDate {
        d(2025, 6, 1)
    }

    #[test]
    fn test_cold_start_flags_nothing_new() {
        let mut store = SeenStore::load(Path::new("/no/such/seen.json"));
        assert!(store.cold_start());
        let current = HashSet::from([key("a"), key("b")]);
        let new = store.reconcile(&current, today());
        assert!(new.is_empty(), "cold-start seeds are backdated past the window");
        assert_eq!(store.len(), 2);
        assert_eq!(
            store.first_seen(&key("a")),
            Some(today() - Days::new(SEED_BACKDATE_DAYS))
        );
    }

    #[test]
    fn test_new_window_boundary() {
        let current = HashSet::from([key("fresh"), key("week"), key("old")]);
        let mut store = SeenStore {
            entries: BTreeMap::from([
                (key("fresh"), today()),
                (key("week"), today() - Days::new(7)),
                (key("old"), today() - Days::new(8)),
            ]),
            cold_start: false,
        };
        let new = store.reconcile(&current, today());
        assert!(new.contains(&key("fresh")), "seen today is new");
        assert!(new.contains(&key("week")), "exactly 7 days is still new");
        assert!(!new.contains(&key("old")), "8 days is no longer new");
    }

    #[test]
    fn test_unknown_key_seeded_with_today_on_warm_store() {
        let current = HashSet::from([key("known"), key("incoming")]);
        let mut store = SeenStore {
            entries: BTreeMap::from([(key("known"), today() - Days::new(30))]),
            cold_start: false,
        };
        let new = store.reconcile(&current, today());
        assert_eq!(new, HashSet::from([key("incoming")]));
    }

    #[test]
    fn test_vanished_keys_pruned() {
        let current = HashSet::from([key("kept")]);
        let mut store = SeenStore {
            entries: BTreeMap::from([
                (key("kept"), today() - Days::new(20)),
                (key("gone"), today() - Days::new(20)),
            ]),
            cold_start: false,
        };
        store.reconcile(&current, today());
        assert_eq!(store.len(), 1);
        assert!(store.first_seen(&key("gone")).is_none());
    }

    #[test]
    fn test_migration_backdates_uniform_today_store() {
        let current = HashSet::from([key("a"), key("b")]);
        let mut store = SeenStore {
            entries: BTreeMap::from([(key("a"), today()), (key("b"), today())]),
            cold_start: false,
        };
        let new = store.reconcile(&current, today());
        assert!(
            new.is_empty(),
            "a store uniformly stamped with today is a migration artifact, not a burst of new bookings"
        );
    }

    #[test]
    fn test_no_migration_for_mixed_dates() {
        let current = HashSet::from([key("a"), key("b")]);
        let mut store = SeenStore {
            entries: BTreeMap::from([
                (key("a"), today()),
                (key("b"), today() - Days::new(30)),
            ]),
            cold_start: false,
        };
        let new = store.reconcile(&current, today());
        assert_eq!(new, HashSet::from([key("a")]), "mixed dates are real history");
    }

    #[test]
    fn test_reconcile_is_content_idempotent() {
        let current = HashSet::from([key("a"), key("b")]);
        let mut store = SeenStore::load(Path::new("/no/such/seen.json"));
        let first = store.reconcile(&current, today());
        let again = store.reconcile(&current, today());
        assert_eq!(first, again);
    }

    #[test]
    fn test_persist_load_round_trip_is_byte_stable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen_bookings.json");
        let current = HashSet::from([key("a"), key("b")]);

        let mut store = SeenStore::load(&path);
        store.reconcile(&current, today());
        store.persist(&path).unwrap();
        let bytes_first = fs::read(&path).unwrap();

        let mut reloaded = SeenStore::load(&path);
        assert!(!reloaded.cold_start());
        let new = reloaded.reconcile(&current, today());
        assert!(new.is_empty());
        reloaded.persist(&path).unwrap();
        let bytes_second = fs::read(&path).unwrap();

        assert_eq!(
            bytes_first, bytes_second,
            "an unchanged booking set rewrites the store byte-for-byte"
        );
    }

    #[test]
    fn test_corrupt_store_is_cold_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen_bookings.json");
        fs::write(&path, "{ not json").unwrap();
        let store = SeenStore::load(&path);
        assert!(store.cold_start());
        assert!(store.is_empty());

        fs::write(&path, "[1,2,3]").unwrap();
        assert!(SeenStore::load(&path).cold_start(), "non-object JSON is corrupt too");
    }

    #[test]
    fn test_unreadable_entries_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen_bookings.json");
        fs::write(
            &path,
            r#"{"P|2025-07-01|2025-07-08":"2025-05-01","broken key":"2025-05-01","P|2025-08-01|2025-08-02":"not a date"}"#,
        )
        .unwrap();
        let store = SeenStore::load(&path);
        assert!(!store.cold_start(), "a readable object is not a cold start");
        assert_eq!(store.len(), 1, "only the well-formed entry survives");
    }
}
