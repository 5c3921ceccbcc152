//! Run orchestration
//!
//! One run walks a fixed sequence of states:
//!
//! ```text
//! Init -> ResetToRemote -> SyncGameData -> SyncLocalization
//!      -> SyncFreeCharacters -> Push -> Done
//! ```
//!
//! The first fatal error moves the run to `Failed`; no later step runs, so
//! nothing is pushed. Commits made before the failure stay local only.

use std::fmt;

use ersync_git::{GitRepository, VcsBackend};

use crate::config::SyncConfig;
use crate::fetcher::ResourceFetcher;
use crate::sync::{self, FlowReport, SyncContext};
use crate::{Error, Result};

/// Steps of a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncState {
    Init,
    ResetToRemote,
    SyncGameData,
    SyncLocalization,
    SyncFreeCharacters,
    Push,
    Done,
    Failed,
}

impl SyncState {
    /// Successor on the success path. Terminal states map to themselves.
    pub fn next(self) -> Self {
        match self {
            Self::Init => Self::ResetToRemote,
            Self::ResetToRemote => Self::SyncGameData,
            Self::SyncGameData => Self::SyncLocalization,
            Self::SyncLocalization => Self::SyncFreeCharacters,
            Self::SyncFreeCharacters => Self::Push,
            Self::Push => Self::Done,
            Self::Done => Self::Done,
            Self::Failed => Self::Failed,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::ResetToRemote => "reset-to-remote",
            Self::SyncGameData => "sync-game-data",
            Self::SyncLocalization => "sync-localization",
            Self::SyncFreeCharacters => "sync-free-characters",
            Self::Push => "push",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub final_state: SyncState,
    pub flows: Vec<FlowReport>,
}

impl RunReport {
    pub fn commits(&self) -> usize {
        self.flows.iter().map(FlowReport::committed).sum()
    }
}

/// Drives one sync run.
pub struct SyncOrchestrator<'a> {
    config: &'a SyncConfig,
    fetcher: &'a dyn ResourceFetcher,
}

impl<'a> SyncOrchestrator<'a> {
    pub fn new(config: &'a SyncConfig, fetcher: &'a dyn ResourceFetcher) -> Self {
        Self { config, fetcher }
    }

    /// Open the configured working copy, cloning it first if it is missing
    /// and a remote URL is configured.
    pub fn open_repository(&self) -> Result<GitRepository> {
        let repo = GitRepository::open_or_clone(
            self.config.repo_root(),
            self.config.remote_spec(),
            self.config.remote_url.as_deref(),
        )?;
        Ok(repo.with_identity(self.config.identity()))
    }

    /// Run every step against the configured git working copy.
    pub fn run(&self) -> Result<RunReport> {
        tracing::info!(
            state = %SyncState::Init,
            repo = %self.config.repo_path.display(),
            "Sync step"
        );
        let repo = self
            .open_repository()
            .map_err(|e| fail(SyncState::Init, e))?;
        self.run_from(&repo, SyncState::Init.next())
    }

    /// Run every step after `Init` against an already opened backend.
    pub fn run_with(&self, backend: &dyn VcsBackend) -> Result<RunReport> {
        self.run_from(backend, SyncState::Init.next())
    }

    fn run_from(&self, backend: &dyn VcsBackend, start: SyncState) -> Result<RunReport> {
        let ctx = SyncContext::new(self.config, self.fetcher, backend);
        let mut flows = Vec::new();
        let mut state = start;

        while !state.is_terminal() {
            tracing::info!(state = %state, "Sync step");
            self.step(&ctx, state, &mut flows)
                .map_err(|e| fail(state, e))?;
            state = state.next();
        }

        for flow in &flows {
            tracing::info!(
                flow = %flow.kind,
                committed = flow.committed(),
                skipped = flow.skipped(),
                "Flow finished"
            );
        }

        Ok(RunReport {
            final_state: state,
            flows,
        })
    }

    fn step(
        &self,
        ctx: &SyncContext<'_>,
        state: SyncState,
        flows: &mut Vec<FlowReport>,
    ) -> Result<()> {
        match state {
            SyncState::ResetToRemote => {
                ctx.backend.fetch()?;
                ctx.backend.reset_hard_to_remote()?;
            }
            SyncState::SyncGameData => flows.push(sync::game_data::sync(ctx)?),
            SyncState::SyncLocalization => flows.push(sync::localization::sync(ctx)?),
            SyncState::SyncFreeCharacters => flows.push(sync::free_characters::sync(ctx)?),
            SyncState::Push => ctx.backend.push()?,
            SyncState::Init | SyncState::Done | SyncState::Failed => {}
        }
        Ok(())
    }
}

fn fail(state: SyncState, error: Error) -> Error {
    tracing::error!(state = %state, next = %SyncState::Failed, error = %error, "Sync failed");
    Error::StepFailed {
        state,
        source: Box::new(error),
    }
}
