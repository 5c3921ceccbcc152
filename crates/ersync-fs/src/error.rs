//! Error types for ersync-fs

use std::path::PathBuf;

/// Result type for ersync-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ersync-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Undecodable archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Archive entry '{name}' escapes the destination directory")]
    UnsafeEntry { name: String },

    #[error("Malformed JSON in {name}: {source}")]
    MalformedJson {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
