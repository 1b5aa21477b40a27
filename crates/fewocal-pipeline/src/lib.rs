//! # fewocal-pipeline
//!
//! Persistent annotation state and run orchestration for the fewocal
//! occupancy calendar.
//!
//! The two stores are the only state that survives between runs:
//!
//! | Store | Keyed by | Drives |
//! |-------|----------|--------|
//! | [`seen::SeenStore`] | booking key | the "new booking" badge |
//! | [`guests::GuestHistory`] | guest name | the "repeat guest" badge |
//!
//! Both follow an explicit load / mutate / persist lifecycle, with no
//! ambient file access inside the classification logic, and are rewritten
//! atomically at the end of every run. Corrupt or missing store files are
//! a cold start, never an error.
//!
//! [`run::run`] ties it together: collect the board, reconcile the stores,
//! render, write. Single-threaded, one pass; overlapping invocations must
//! be serialized by the caller.

pub mod guests;
pub mod run;
pub mod seen;
mod store;

pub use guests::GuestHistory;
pub use run::{run, run_at, RunConfig, RunSummary};
pub use seen::{SeenStore, NEW_WINDOW_DAYS, SEED_BACKDATE_DAYS};
