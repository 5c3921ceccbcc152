//! Sync flows
//!
//! Each flow downloads one kind of upstream resource, writes it into the
//! working tree and records one commit per changed item:
//!
//! - [`game_data`]: checkpointed CDN archives, extracted into `data/`
//! - [`localization`]: one text bundle per language in `l10n/`
//! - [`free_characters`]: one JSON list per matching mode in `freeCharacters/`
//!
//! A flow returns `Err` only for failures that must abort the run. Per-item
//! problems end up in its [`FlowReport`].

pub mod free_characters;
pub mod game_data;
pub mod localization;

use std::fmt;

use ersync_git::VcsBackend;

use crate::config::SyncConfig;
use crate::fetcher::ResourceFetcher;
use crate::recorder::{CommitRecorder, ItemOutcome};

/// The three independent flows, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowKind {
    GameData,
    Localization,
    FreeCharacters,
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GameData => "game-data",
            Self::Localization => "localization",
            Self::FreeCharacters => "free-characters",
        };
        f.write_str(name)
    }
}

/// Per-item outcomes of one flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowReport {
    pub kind: FlowKind,
    pub outcomes: Vec<ItemOutcome>,
}

impl FlowReport {
    pub fn new(kind: FlowKind) -> Self {
        Self {
            kind,
            outcomes: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: ItemOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn committed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_committed()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.committed()
    }
}

/// Borrowed collaborators shared by every flow of one run.
pub struct SyncContext<'a> {
    pub config: &'a SyncConfig,
    pub fetcher: &'a dyn ResourceFetcher,
    pub backend: &'a dyn VcsBackend,
}

impl<'a> SyncContext<'a> {
    pub fn new(
        config: &'a SyncConfig,
        fetcher: &'a dyn ResourceFetcher,
        backend: &'a dyn VcsBackend,
    ) -> Self {
        Self {
            config,
            fetcher,
            backend,
        }
    }

    pub fn recorder(&self) -> CommitRecorder<'a> {
        CommitRecorder::new(self.backend)
    }
}
