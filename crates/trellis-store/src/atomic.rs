use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Atomically replace the file at `path` with `bytes`.
///
/// The payload is written to a temporary file created in the target's own
/// directory, synced, and then renamed over `path`. The rename is atomic on
/// the same filesystem, so a concurrent reader observes either the old
/// complete content or the new complete content — never a truncated file.
///
/// If anything fails after the temp file is created, the temp file is
/// removed best-effort before the error propagates ([`tempfile::NamedTempFile`]
/// unlinks on drop). There is no retry; the underlying I/O error is returned
/// to the caller.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let dir = path
        .parent()
        .ok_or_else(|| StoreError::InvalidPath(path.display().to_string()))?;
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;

    debug!(path = %path.display(), len = bytes.len(), "atomic write");
    Ok(())
}
