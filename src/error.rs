//! Error types for sync jobs.
//!
//! Per-entry failures (a missing song file, an unreadable tag) are
//! recoverable: the entry is logged and skipped. Backup failures, a missing
//! playlist root and write failures abort the job before anything else is
//! touched.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to scan playlist directory '{path}': {reason}")]
    ScanFailure { path: PathBuf, reason: String },

    #[error("song file does not exist: '{0}'")]
    MissingSourceFile(PathBuf),

    #[error("unsupported file type: '{0}'")]
    UnsupportedFormat(PathBuf),

    #[error("could not load tags from '{path}': {reason}")]
    ExtractionFailure { path: PathBuf, reason: String },

    #[error("could not read playlist '{path}': {source}")]
    PlaylistRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("backup failed at '{path}': {source}")]
    BackupFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("playlist directory does not exist: '{0}'")]
    MissingRoot(PathBuf),

    #[error("invalid playlist filter '{pattern}': {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("could not write playlist '{path}': {source}")]
    PlaylistWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("playlist interchange error: {0}")]
    Interchange(#[from] serde_json::Error),

    #[error("could not access playlist interchange file '{path}': {source}")]
    InterchangeFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SyncError>;

impl SyncError {
    /// Returns true if this error only affects a single entry or playlist
    /// and the job should carry on with its siblings.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SyncError::ScanFailure { .. }
                | SyncError::MissingSourceFile(_)
                | SyncError::UnsupportedFormat(_)
                | SyncError::ExtractionFailure { .. }
                | SyncError::PlaylistRead { .. }
        )
    }

    pub fn backup(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::BackupFailure {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::PlaylistWrite {
            path: path.into(),
            source,
        }
    }

    pub fn interchange_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::InterchangeFile {
            path: path.into(),
            source,
        }
    }
}
