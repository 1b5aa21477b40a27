//! # fewocal-backend
//!
//! Input parsing backends for the fewocal occupancy calendar:
//!
//! | Module | Input |
//! |--------|-------|
//! | [`overview`] | per-property booking export files (pipe-delimited text) |
//! | [`blocked`] | the operator's blocked-range override file |
//! | [`password`] | the calendar password (environment or sibling file) |
//!
//! All parsers are tolerant by contract: malformed lines are skipped with a
//! log entry, missing files turn into empty data, and nothing on the input
//! side can abort a run.

pub mod blocked;
pub mod overview;
pub mod password;

pub use blocked::{load_blocked, parse_blocked};
pub use overview::{collect_bookings, parse_overview, parse_overview_line, SUMMARY_MARKER};
pub use password::{load_password_hash, normalize_password, sha256_hex, PASSWORD_ENV, PASSWORD_FILE};
