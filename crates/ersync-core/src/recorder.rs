//! Commit recording
//!
//! Staging or committing one item never aborts a run: a failure (most often
//! "nothing changed") is logged and reported as [`ItemOutcome::Skipped`].
//! A failed commit unstages its paths so they do not leak into the next one.

use chrono::{DateTime, FixedOffset};

use ersync_fs::NormalizedPath;
use ersync_git::VcsBackend;

/// Result of processing one work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// A commit was created
    Committed { message: String, commit: String },

    /// The item produced no commit
    Skipped { item: String, reason: String },
}

impl ItemOutcome {
    pub fn skipped(item: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Skipped {
            item: item.into(),
            reason: reason.into(),
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// Stages paths and commits them through a [`VcsBackend`].
pub struct CommitRecorder<'a> {
    backend: &'a dyn VcsBackend,
}

impl<'a> CommitRecorder<'a> {
    pub fn new(backend: &'a dyn VcsBackend) -> Self {
        Self { backend }
    }

    /// Stage `paths` (files or directories, including deletions beneath
    /// them) and commit with `message`.
    ///
    /// `authored_at` overrides the author date; `None` uses the current time.
    pub fn record(
        &self,
        paths: &[NormalizedPath],
        message: &str,
        authored_at: Option<DateTime<FixedOffset>>,
    ) -> ItemOutcome {
        if let Err(e) = self.backend.stage(paths) {
            tracing::warn!(message = %message, error = %e, "Staging failed, skipping commit");
            return ItemOutcome::skipped(message, e.to_string());
        }

        match self.backend.commit(message, authored_at) {
            Ok(commit) => ItemOutcome::Committed {
                message: message.to_string(),
                commit,
            },
            Err(ersync_git::Error::NothingToCommit { .. }) => {
                tracing::info!(message = %message, "No changes, nothing to commit");
                ItemOutcome::skipped(message, "nothing to commit")
            }
            Err(e) => {
                tracing::warn!(message = %message, error = %e, "Commit failed");
                if let Err(reset) = self.backend.unstage(paths) {
                    tracing::warn!(message = %message, error = %reset, "Failed to unstage paths");
                }
                ItemOutcome::skipped(message, e.to_string())
            }
        }
    }
}
