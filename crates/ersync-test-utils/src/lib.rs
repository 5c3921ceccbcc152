//! Shared test utilities for the ersync workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`]: bare remote + working clone fixtures with seeded history
//! - [`archive`]: in-memory zip builder

pub mod archive;
pub mod git;
