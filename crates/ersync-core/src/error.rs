//! Error types for ersync-core

use std::path::PathBuf;

use crate::orchestrator::SyncState;

/// Result type for ersync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a sync run.
///
/// Per-item soft failures never surface here; they become
/// [`crate::ItemOutcome::Skipped`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No game-data commit within the scanned history window
    #[error("Missing checkpoint: no game-data commit in the last {window} commits")]
    CheckpointMissing { window: usize },

    /// A resource name without a valid 14-digit timestamp
    #[error("Invalid identifier: {value}")]
    InvalidIdentifier { value: String },

    /// A URL that could not be parsed or joined
    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    /// Transport failure
    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx status on an unauthenticated download
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    /// Configuration file could not be read or parsed
    #[error("Invalid configuration at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// A run step failed; carries the state the run was in
    #[error("Sync failed during {state}: {source}")]
    StepFailed {
        state: SyncState,
        #[source]
        source: Box<Error>,
    },

    // Transparent wrappers for underlying crate errors
    /// Filesystem or archive error from ersync-fs
    #[error(transparent)]
    Fs(#[from] ersync_fs::Error),

    /// Version-control error from ersync-git
    #[error(transparent)]
    Git(#[from] ersync_git::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The underlying error, looking through [`Error::StepFailed`].
    pub fn root_cause(&self) -> &Error {
        match self {
            Self::StepFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) fn http(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            url: url.into(),
            source,
        }
    }
}
