//! Core orchestration layer for ersync
//!
//! Mirrors upstream game data into a git repository, one commit per upstream
//! publication:
//!
//! - **Game data**: CDN archives, extracted into `data/` and committed under
//!   the archive identifier with the archive's own timestamp
//! - **Localization**: one text bundle per language under `l10n/`
//! - **Free characters**: the rotating free-character list per matching mode
//!   under `freeCharacters/`
//!
//! # Architecture
//!
//! ```text
//!                  ersync-cli
//!                      |
//!                 ersync-core
//!       (orchestrator, flows, checkpoint,
//!        fetcher, throttle, recorder)
//!                 /        \
//!          ersync-fs     ersync-git
//! ```
//!
//! The target repository's own history is the progress ledger: the most
//! recent game-data commit is the checkpoint a run resumes from.

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod identifier;
pub mod orchestrator;
pub mod recorder;
pub mod sync;
pub mod throttle;

pub use checkpoint::{DEFAULT_CHECKPOINT_WINDOW, find_checkpoint, resolve, resolve_pending};
pub use config::SyncConfig;
pub use error::{Error, Result};
pub use fetcher::{
    ApiEnvelope, FreeCharactersPayload, HttpFetcher, LocalizationPayload, LocalizationPointer,
    ResourceFetcher,
};
pub use identifier::{ArchiveIdentifier, ResourceKind, WorkItem};
pub use orchestrator::{RunReport, SyncOrchestrator, SyncState};
pub use recorder::{CommitRecorder, ItemOutcome};
pub use sync::{FlowKind, FlowReport, SyncContext};
pub use throttle::RequestThrottle;
