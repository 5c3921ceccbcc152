//! Free-character flow
//!
//! The rotation per matching mode. Commits carry the run time as author
//! date because the API does not publish one. Snapshots for modes that come
//! back empty or rejected are left as they were.

use serde_json::Value;

use crate::Result;
use crate::recorder::ItemOutcome;
use crate::sync::{FlowKind, FlowReport, SyncContext};
use crate::throttle::RequestThrottle;

/// Directory, relative to the working tree, holding rotation snapshots.
pub const FREE_CHARACTERS_DIR: &str = "freeCharacters";

pub fn sync(ctx: &SyncContext<'_>) -> Result<FlowReport> {
    let mut report = FlowReport::new(FlowKind::FreeCharacters);

    let dir = ctx.backend.workdir().join(FREE_CHARACTERS_DIR);
    ersync_fs::io::ensure_dir(&dir)?;

    let recorder = ctx.recorder();
    let mut throttle = RequestThrottle::new(ctx.config.request_interval());

    for mode in &ctx.config.matching_modes {
        throttle.pause();

        let envelope = ctx.fetcher.free_characters(mode)?;
        let message = format!("{FREE_CHARACTERS_DIR}/{mode}");

        if !envelope.is_success() {
            tracing::error!(
                matching_mode = %mode,
                status = envelope.status,
                code = envelope.code,
                message = %envelope.message,
                "Free-character request rejected, skipping"
            );
            report.push(ItemOutcome::skipped(
                message,
                format!("api code {}: {}", envelope.code, envelope.message),
            ));
            continue;
        }

        let Some(characters) = envelope.payload.characters() else {
            tracing::info!(matching_mode = %mode, "Empty rotation, skipping");
            report.push(ItemOutcome::skipped(message, "empty rotation"));
            continue;
        };

        let content = ersync_fs::json::to_canonical_string(&Value::Array(characters.clone()))?;
        let target = dir.join(&format!("{mode}.json"));
        ersync_fs::io::write_atomic(&target, content.as_bytes())?;
        tracing::info!(matching_mode = %mode, count = characters.len(), "Wrote rotation");

        report.push(recorder.record(&[target], &message, None));
    }

    Ok(report)
}
