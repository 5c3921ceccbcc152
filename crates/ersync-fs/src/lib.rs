//! Filesystem layer for ersync
//!
//! Provides path handling, atomic writes, canonical JSON formatting and
//! destructive archive extraction into a working tree.

pub mod archive;
pub mod error;
pub mod io;
pub mod json;
pub mod path;

pub use archive::{MaterializeReport, materialize};
pub use error::{Error, Result};
pub use path::NormalizedPath;
