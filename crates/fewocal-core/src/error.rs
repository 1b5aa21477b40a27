//! Error types for calendar generation.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for fewocal operations.
pub type Result<T> = std::result::Result<T, FewocalError>;

/// Error type covering the fatal failure modes of a calendar run.
///
/// Almost everything in this system recovers locally (malformed lines are
/// skipped, corrupt stores cold-start); the variants here are the cases that
/// must surface to the caller.
#[derive(Error, Debug)]
pub enum FewocalError {
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error from the persistent stores.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A date string that was required to parse did not.
    #[error("Date parse error: {0}")]
    DateError(String),

    /// The rendered document could not be written to its output path.
    ///
    /// Unlike input-side failures this aborts the run; there is nothing to
    /// fall back to when the artifact itself cannot be produced.
    #[error("Failed to write output {path}: {source}")]
    OutputError {
        /// Path of the output artifact that failed to write.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl FewocalError {
    /// Create an output-write error.
    #[inline]
    #[must_use = "returns FewocalError for output write failures"]
    pub fn output_error<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        Self::OutputError {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
