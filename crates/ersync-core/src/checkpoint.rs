//! Checkpoint resolution from commit history
//!
//! Game-data commits carry the archive identifier as their message, so the
//! most recent such commit tells a run where the previous one stopped.

use ersync_git::CommitInfo;

use crate::identifier::ArchiveIdentifier;
use crate::{Error, Result};

/// Number of recent commits scanned for a checkpoint.
pub const DEFAULT_CHECKPOINT_WINDOW: usize = 50;

/// Find the most recent game-data identifier among the first `window`
/// commits of `history` (newest first).
///
/// Refuses to guess: no match is [`Error::CheckpointMissing`].
pub fn find_checkpoint(history: &[CommitInfo], window: usize) -> Result<ArchiveIdentifier> {
    history
        .iter()
        .take(window)
        .find_map(|commit| ArchiveIdentifier::game_data(commit.message.as_str()).ok())
        .ok_or(Error::CheckpointMissing { window })
}

/// Candidates still to be synchronized after `checkpoint`, oldest first.
///
/// Candidates up to and including the checkpoint are dropped. A checkpoint
/// that is no longer among the candidates (rotated off the CDN) keeps the
/// whole list, so the run reprocesses from the earliest available archive.
pub fn resolve_pending(
    checkpoint: &ArchiveIdentifier,
    candidates: &[ArchiveIdentifier],
) -> Vec<ArchiveIdentifier> {
    let mut sorted = candidates.to_vec();
    sorted.sort();
    sorted.dedup();

    match sorted
        .iter()
        .position(|c| c.as_str() == checkpoint.as_str())
    {
        Some(index) => sorted.split_off(index + 1),
        None => {
            tracing::warn!(
                checkpoint = %checkpoint,
                candidates = sorted.len(),
                "Checkpoint not among current candidates, reprocessing all"
            );
            sorted
        }
    }
}

/// [`find_checkpoint`] followed by [`resolve_pending`].
pub fn resolve(
    history: &[CommitInfo],
    candidates: &[ArchiveIdentifier],
    window: usize,
) -> Result<Vec<ArchiveIdentifier>> {
    let checkpoint = find_checkpoint(history, window)?;
    tracing::info!(checkpoint = %checkpoint, "Resolved checkpoint");
    Ok(resolve_pending(&checkpoint, candidates))
}
