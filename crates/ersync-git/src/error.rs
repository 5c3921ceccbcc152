//! Error types for ersync-git

use std::path::PathBuf;

/// Result type for ersync-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ersync-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] ersync_fs::Error),

    #[error("No git repository at {path} and no remote URL configured to clone from")]
    RepositoryMissing { path: PathBuf },

    #[error("Remote '{name}' not found")]
    RemoteNotFound { name: String },

    #[error("Remote branch '{remote}/{branch}' not found")]
    RemoteBranchNotFound { remote: String, branch: String },

    #[error("Fetch from '{remote}' failed: {message}")]
    FetchFailed { remote: String, message: String },

    #[error("Push failed: {message}")]
    PushFailed { message: String },

    #[error("Nothing to commit for '{message}'")]
    NothingToCommit { message: String },

    #[error("Path {path} is outside the working tree {workdir}")]
    PathOutsideWorkdir { path: String, workdir: String },
}
