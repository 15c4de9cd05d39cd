//! Error types for gitfleet-sync.

use std::path::PathBuf;

use thiserror::Error;

use gitfleet_core::ConfigError;

/// Conditions that stop a whole run. Per-repository failures are not errors;
/// they are collected into the run report.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The archive directory could not be created before the archive phase.
    #[error("failed to create archive dir {path}: {source}")]
    ArchiveDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A worker task could not be joined.
    #[error("worker task failed: {0}")]
    Join(String),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
