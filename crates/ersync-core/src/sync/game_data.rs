//! Game-data flow
//!
//! Resumes from the checkpoint commit, then downloads each newer archive,
//! replaces `data/` with its contents and commits it under the archive
//! identifier, dated with the archive's own timestamp.

use crate::Result;
use crate::checkpoint::{find_checkpoint, resolve_pending};
use crate::identifier::{ArchiveIdentifier, WorkItem};
use crate::sync::{FlowKind, FlowReport, SyncContext};

/// Directory, relative to the working tree, holding extracted game data.
pub const DATA_DIR: &str = "data";

/// Directory on the CDN that archive names are relative to.
pub const GAME_DB_PREFIX: &str = "gameDb";

/// Archives currently published on the CDN, oldest first.
fn candidates(ctx: &SyncContext<'_>) -> Result<Vec<ArchiveIdentifier>> {
    let version = ctx.fetcher.latest_game_data_version()?;
    let identifier = ArchiveIdentifier::game_data(format!("{GAME_DB_PREFIX}/{version}"))?;
    Ok(vec![identifier])
}

pub fn sync(ctx: &SyncContext<'_>) -> Result<FlowReport> {
    let mut report = FlowReport::new(FlowKind::GameData);

    let history = ctx.backend.recent_commits(ctx.config.checkpoint_window)?;
    let checkpoint = find_checkpoint(&history, ctx.config.checkpoint_window)?;
    tracing::info!(checkpoint = %checkpoint, "Resolved checkpoint");

    let pending = resolve_pending(&checkpoint, &candidates(ctx)?);
    tracing::info!(
        pending = ?pending.iter().map(ArchiveIdentifier::as_str).collect::<Vec<_>>(),
        "Pending game-data archives"
    );

    let offset = ctx.config.identifier_offset()?;
    let data_dir = ctx.backend.workdir().join(DATA_DIR);
    let recorder = ctx.recorder();

    for identifier in pending {
        let url = ctx.fetcher.game_data_url(&identifier)?;
        let item = WorkItem::new(identifier, offset, url);
        tracing::info!(identifier = %item.identifier, url = %item.url, "Syncing game data");

        let bytes = ctx.fetcher.download(&item.url)?;
        let extracted = ersync_fs::materialize(&bytes, &data_dir)?;
        tracing::info!(
            identifier = %item.identifier,
            files = extracted.file_count(),
            "Extracted archive"
        );

        report.push(recorder.record(
            std::slice::from_ref(&data_dir),
            item.identifier.as_str(),
            Some(item.authored_at),
        ));
    }

    Ok(report)
}
