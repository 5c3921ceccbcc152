//! Localization flow
//!
//! One bundle per language, overwritten wholesale and committed under its
//! CDN path.

use crate::Result;
use crate::fetcher::resource_path;
use crate::identifier::{ArchiveIdentifier, WorkItem};
use crate::recorder::ItemOutcome;
use crate::sync::{FlowKind, FlowReport, SyncContext};
use crate::throttle::RequestThrottle;

/// Directory, relative to the working tree, holding localization bundles.
pub const L10N_DIR: &str = "l10n";

pub fn sync(ctx: &SyncContext<'_>) -> Result<FlowReport> {
    let mut report = FlowReport::new(FlowKind::Localization);

    let dir = ctx.backend.workdir().join(L10N_DIR);
    ersync_fs::io::ensure_dir(&dir)?;

    let offset = ctx.config.identifier_offset()?;
    let recorder = ctx.recorder();
    let mut throttle = RequestThrottle::new(ctx.config.request_interval());

    for language in &ctx.config.languages {
        throttle.pause();

        let envelope = ctx.fetcher.localization(language)?;
        if !envelope.is_success() {
            tracing::error!(
                language = %language,
                status = envelope.status,
                code = envelope.code,
                message = %envelope.message,
                "Localization request rejected, skipping"
            );
            report.push(ItemOutcome::skipped(
                language.as_str(),
                format!("api code {}: {}", envelope.code, envelope.message),
            ));
            continue;
        }

        let Some(pointer) = envelope.payload.data else {
            tracing::error!(language = %language, "Localization response without a bundle path");
            report.push(ItemOutcome::skipped(language.as_str(), "no bundle path"));
            continue;
        };

        let identifier = ArchiveIdentifier::localization(resource_path(&pointer.l10n_path)?)?;
        let item = WorkItem::new(identifier, offset, pointer.l10n_path);
        tracing::info!(language = %language, identifier = %item.identifier, "Syncing localization");

        let bytes = ctx.fetcher.download(&item.url)?;
        let target = dir.join(&format!("{language}.txt"));
        ersync_fs::io::write_atomic(&target, &bytes)?;

        report.push(recorder.record(
            &[target],
            item.identifier.as_str(),
            Some(item.authored_at),
        ));
    }

    Ok(report)
}
