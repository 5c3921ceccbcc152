//! Backend trait for the repository a sync run writes to

use chrono::{DateTime, FixedOffset};
use ersync_fs::NormalizedPath;

use crate::{CommitInfo, Result};

/// Remote and branch a working copy tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSpec {
    /// Remote name, usually `origin`
    pub remote: String,

    /// Branch that is reset to and pushed
    pub branch: String,
}

impl RemoteSpec {
    pub fn new(remote: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
            branch: branch.into(),
        }
    }

    /// Fully qualified remote-tracking ref, e.g. `refs/remotes/origin/master`.
    pub fn tracking_ref(&self) -> String {
        format!("refs/remotes/{}/{}", self.remote, self.branch)
    }

    /// Fully qualified local branch ref, e.g. `refs/heads/master`.
    pub fn local_ref(&self) -> String {
        format!("refs/heads/{}", self.branch)
    }
}

impl Default for RemoteSpec {
    fn default() -> Self {
        Self::new("origin", "master")
    }
}

/// Operations a sync run performs against its target repository.
///
/// Every method is a single, individually failable step. Callers decide
/// which failures are fatal.
pub trait VcsBackend {
    /// Root of the working tree.
    fn workdir(&self) -> &NormalizedPath;

    /// Update remote-tracking refs from the remote.
    fn fetch(&self) -> Result<()>;

    /// Point the local branch at the remote-tracking ref and force the
    /// working tree and index to match it.
    fn reset_hard_to_remote(&self) -> Result<()>;

    /// The most recent `max_count` commits reachable from HEAD, newest first.
    fn recent_commits(&self, max_count: usize) -> Result<Vec<CommitInfo>>;

    /// Stage the given paths. Directories are staged recursively, including
    /// deletions of files that no longer exist under them.
    fn stage(&self, paths: &[NormalizedPath]) -> Result<()>;

    /// Reset the index entries under `paths` to HEAD, leaving the working
    /// tree alone. With no HEAD yet the entries are dropped from the index.
    fn unstage(&self, paths: &[NormalizedPath]) -> Result<()>;

    /// Commit the index on top of HEAD and return the new commit id.
    ///
    /// `authored_at` overrides the author date; the committer date is always
    /// the current time. Fails with [`crate::Error::NothingToCommit`] when the
    /// index matches HEAD.
    fn commit(&self, message: &str, authored_at: Option<DateTime<FixedOffset>>) -> Result<String>;

    /// Publish the local branch to the remote.
    fn push(&self) -> Result<()>;
}
