//! In-memory zip archives for materializer and sync-flow tests.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Builder for a zip archive held entirely in memory.
///
/// # Example
///
/// ```rust,no_run
/// use ersync_test_utils::archive::ZipBuilder;
///
/// let bytes = ZipBuilder::new()
///     .dir("Character/")
///     .file("Character/1.json", br#"{"code":1}"#)
///     .build();
/// ```
#[derive(Default)]
pub struct ZipBuilder {
    entries: Vec<(String, Option<Vec<u8>>)>,
    stored: bool,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an explicit directory entry. The name should end in `/`.
    pub fn dir(mut self, name: &str) -> Self {
        self.entries.push((name.to_string(), None));
        self
    }

    /// Add a file entry.
    pub fn file(mut self, name: &str, content: &[u8]) -> Self {
        self.entries.push((name.to_string(), Some(content.to_vec())));
        self
    }

    /// Store entries uncompressed, so file contents appear verbatim in the
    /// encoded bytes.
    pub fn stored(mut self) -> Self {
        self.stored = true;
        self
    }

    /// Encode the archive.
    ///
    /// # Panics
    /// Panics if the zip writer fails, which only happens on invalid names.
    pub fn build(self) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let mut options = SimpleFileOptions::default();
        if self.stored {
            options = options.compression_method(CompressionMethod::Stored);
        }

        for (name, content) in self.entries {
            match content {
                None => writer
                    .add_directory(name.as_str(), options)
                    .unwrap_or_else(|e| panic!("ZipBuilder: failed to add dir {name}: {e}")),
                Some(bytes) => {
                    writer
                        .start_file(name.as_str(), options)
                        .unwrap_or_else(|e| panic!("ZipBuilder: failed to start {name}: {e}"));
                    writer
                        .write_all(&bytes)
                        .unwrap_or_else(|e| panic!("ZipBuilder: failed to write {name}: {e}"));
                }
            }
        }

        writer
            .finish()
            .unwrap_or_else(|e| panic!("ZipBuilder: failed to finish archive: {e}"))
            .into_inner()
    }
}
