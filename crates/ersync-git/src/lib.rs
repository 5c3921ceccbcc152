//! Version-control backend for ersync
//!
//! The sync flows treat the target repository as both output and progress
//! ledger. [`VcsBackend`] is the narrow set of operations they need;
//! [`GitRepository`] implements it on top of libgit2.

pub mod backend;
pub mod commits;
pub mod error;
pub mod helpers;
pub mod repository;

pub use backend::{RemoteSpec, VcsBackend};
pub use commits::CommitInfo;
pub use error::{Error, Result};
pub use repository::{GitRepository, Identity};
