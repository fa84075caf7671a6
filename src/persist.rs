//! Atomic file persistence for serialized documents.
//!
//! Writes go to a temporary file created in the target's own directory and
//! are moved into place with a single rename, so a concurrent reader never
//! observes a partially written file. The temporary file is removed on every
//! exit path.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Serialize `value` as JSON with stable 4-space indentation.
///
/// The fixed formatting keeps successive writes byte-comparable, so diffs
/// across migrations stay inspectable.
pub(crate) fn to_pretty_json<T: Serialize>(value: &T) -> StoreResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(1024);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);

    value
        .serialize(&mut ser)
        .map_err(|e| StoreError::format(&buf, e))?;

    Ok(buf)
}

/// Replace the file at `path` with `bytes` without exposing a partial write.
///
/// On any failure before the rename the target is left untouched; the
/// temporary file is cleaned up when it drops.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    // Same directory as the target, so the rename cannot degrade into a
    // cross-device copy.
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(path, e))?;
    tmp.write_all(bytes).map_err(|e| StoreError::io(path, e))?;
    tmp.flush().map_err(|e| StoreError::io(path, e))?;
    tmp.persist(path).map_err(|e| StoreError::io(path, e.error))?;

    debug!(path = %path.display(), bytes = bytes.len(), "document written");
    Ok(())
}

/// Read the full contents of `path`.
///
/// A missing or empty file means "no document yet" and yields `None`.
pub(crate) fn read_document(path: &Path) -> StoreResult<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(bytes) if bytes.is_empty() => Ok(None),
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io(path, e)),
    }
}
