//! Recent commit history extraction.

use chrono::{DateTime, FixedOffset};
use git2::{ErrorCode, Repository};

use crate::Result;
use crate::helpers::datetime_from_git;

/// Information about a single commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Short commit hash (7 characters)
    pub hash: String,

    /// First line of the commit message
    pub message: String,

    /// Commit author name
    pub author: String,

    /// Author date, which sync commits override with the upstream timestamp
    pub authored_at: DateTime<FixedOffset>,
}

/// Extract the last `max_count` commits reachable from HEAD.
///
/// Returns commits most recent first. An unborn HEAD yields an empty list.
pub fn list_recent_commits(repo: &Repository, max_count: usize) -> Result<Vec<CommitInfo>> {
    let head = match repo.head() {
        Ok(head) => head,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };
    let commit = head.peel_to_commit()?;

    let mut revwalk = repo.revwalk()?;
    revwalk.push(commit.id())?;
    revwalk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)?;

    let mut commits = Vec::with_capacity(max_count);

    for oid_result in revwalk.take(max_count) {
        let oid = oid_result?;
        let commit = repo.find_commit(oid)?;

        let message = commit
            .message()
            .unwrap_or("")
            .lines()
            .next()
            .unwrap_or("")
            .trim()
            .to_string();

        let author = commit.author();

        commits.push(CommitInfo {
            hash: format!("{:.7}", oid),
            message,
            author: author.name().unwrap_or("Unknown").to_string(),
            authored_at: datetime_from_git(author.when()),
        });
    }

    Ok(commits)
}
