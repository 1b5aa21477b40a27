//! Shared persistence helper for the annotation stores.

use fewocal_core::error::{FewocalError, Result};
use std::io::Write;
use std::path::Path;

/// Write `value` as compact JSON via a temp file in the target directory,
/// then rename into place.
///
/// A crash mid-run leaves either the old store or the new one, never a
/// truncated file; the temp file is cleaned up on every error path when it
/// drops.
pub(crate) fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    serde_json::to_writer(&mut tmp, value)?;
    tmp.flush()?;
    tmp.persist(path)
        .map_err(|err| FewocalError::IoError(err.error))?;
    Ok(())
}
