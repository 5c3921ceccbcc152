//! Archive materialization
//!
//! Extracts a zip archive held in memory into a destination directory,
//! replacing whatever the directory held before.

use std::fs;
use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::{Error, NormalizedPath, Result, io, json};

/// Entry suffix that gets re-encoded in canonical form.
pub const STRUCTURED_DATA_EXTENSION: &str = ".json";

/// What a materialization wrote to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Files written, in archive order
    pub files: Vec<NormalizedPath>,

    /// Directories created from explicit directory entries
    pub directories: Vec<NormalizedPath>,
}

impl MaterializeReport {
    /// Number of files written.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Extract `bytes` into `dest`, destroying any previous contents of `dest`.
///
/// The central directory and entry names are checked before anything on disk
/// is touched, so an unreadable archive or an unsafe entry name leaves the
/// previous tree in place. A damaged entry body is only detected while it is
/// extracted, after `dest` has been cleared. Entries ending in `.json` are
/// rewritten with two-space indentation.
pub fn materialize(bytes: &[u8], dest: &NormalizedPath) -> Result<MaterializeReport> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index)?;
        if entry.enclosed_name().is_none() {
            return Err(Error::UnsafeEntry {
                name: entry.name().to_string(),
            });
        }
    }

    io::reset_dir(dest)?;

    let mut report = MaterializeReport::default();

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let name = entry.name().to_string();
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| Error::UnsafeEntry { name: name.clone() })?;
        let target = dest.join(NormalizedPath::new(&relative).as_str());

        if entry.is_dir() {
            io::ensure_dir(&target)?;
            report.directories.push(target);
            continue;
        }

        let mut data = Vec::new();
        entry
            .read_to_end(&mut data)
            .map_err(|e| Error::io(target.to_native(), e))?;

        if name.ends_with(STRUCTURED_DATA_EXTENSION) {
            data = json::canonicalize(&data)
                .map_err(|source| Error::MalformedJson {
                    name: name.clone(),
                    source,
                })?
                .into_bytes();
        }

        if let Some(parent) = target.parent() {
            io::ensure_dir(&parent)?;
        }
        let native = target.to_native();
        fs::write(&native, &data).map_err(|e| Error::io(&native, e))?;

        report.files.push(target);
    }

    tracing::debug!(
        dest = %dest,
        files = report.files.len(),
        directories = report.directories.len(),
        "Materialized archive"
    );

    Ok(report)
}
