//! Error types for gitfleet-core.

use thiserror::Error;

/// Configuration problems detected before any reconciliation starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An include or exclude pattern failed to compile.
    #[error("invalid {kind} pattern '{pattern}': {source}")]
    InvalidPattern {
        kind: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// `--parallelism 0` would never start a single worker.
    #[error("parallelism must be at least 1")]
    ZeroConcurrency,

    /// The external sync command was blank.
    #[error("sync command must not be empty")]
    EmptyCommand,
}
