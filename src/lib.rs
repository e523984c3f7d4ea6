//! Synchronise a directory of `.m3u` playlists with an abstract,
//! filesystem-agnostic playlist representation.
//!
//! In source mode the playlists are read, their entries translated to the
//! orchestrator's path convention and tagged. In sink mode abstract
//! playlists are written back out, after snapshotting the directory.

pub mod backup;
pub mod config;
pub mod error;
pub mod metadata;
pub mod paths;
pub mod playlists;
pub mod sync;

pub use error::{Result, SyncError};
pub use sync::{Engine, JobContext, JobOutput, Mode};

/// Name used for the config directory and the backup tree.
pub const APP_NAME: &str = "m3usync";
