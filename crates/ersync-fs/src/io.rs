//! Atomic writes and directory lifecycle helpers

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};

use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Write content atomically to a file with locking.
///
/// Writes to a sibling temp file under an exclusive advisory lock, then
/// renames it over the target, so readers never observe a partial file.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Same directory keeps the rename on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    fs::rename(&temp_path, &native_path).map_err(|e| Error::io(&native_path, e))?;

    Ok(())
}

/// Create a directory and all of its parents if missing.
pub fn ensure_dir(path: &NormalizedPath) -> Result<()> {
    let native = path.to_native();
    fs::create_dir_all(&native).map_err(|e| Error::io(&native, e))
}

/// Remove a directory tree and recreate it empty.
///
/// A missing directory is not an error.
pub fn reset_dir(path: &NormalizedPath) -> Result<()> {
    let native = path.to_native();
    match fs::remove_dir_all(&native) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path, "Nothing to remove before reset");
        }
        Err(e) => return Err(Error::io(&native, e)),
    }
    ensure_dir(path)
}
