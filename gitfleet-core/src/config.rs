//! Explicit run configuration.
//!
//! Values are built once at the edge (the CLI) and threaded into the
//! reconciliation pass and the executor. Nothing below reads process-wide
//! state.

use std::num::NonZeroUsize;
use std::path::{Component, Path, PathBuf};

use crate::error::ConfigError;
use crate::filter::RepoFilter;

/// Default worker ceiling.
pub const DEFAULT_PARALLELISM: usize = 50;

/// Archive directory name used when none is configured.
pub const DEFAULT_ARCHIVE_DIR: &str = ".archive";

/// Settings consumed by the bounded executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Maximum number of units of work in flight at once.
    pub max_concurrency: NonZeroUsize,
    /// Report what would happen without running anything.
    pub dry_run: bool,
    pub verbose: bool,
}

impl RunConfig {
    pub fn new(max_concurrency: usize, dry_run: bool, verbose: bool) -> Result<Self, ConfigError> {
        let max_concurrency =
            NonZeroUsize::new(max_concurrency).ok_or(ConfigError::ZeroConcurrency)?;
        Ok(Self {
            max_concurrency,
            dry_run,
            verbose,
        })
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_concurrency: NonZeroUsize::new(DEFAULT_PARALLELISM).unwrap_or(NonZeroUsize::MIN),
            dry_run: false,
            verbose: false,
        }
    }
}

/// Settings consumed by the reconciliation pass.
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    pub archive_dir: PathBuf,
    pub filter: RepoFilter,
}

impl ReconcileConfig {
    /// Use `archive_dir` when given (cleaned), otherwise `<dir>/.archive`.
    pub fn new(dir: &Path, archive_dir: Option<&Path>, filter: RepoFilter) -> Self {
        let archive_dir = match archive_dir {
            Some(path) => clean_path(path),
            None => clean_path(dir).join(DEFAULT_ARCHIVE_DIR),
        };
        Self {
            archive_dir,
            filter,
        }
    }
}

/// Lexically normalise a path: drop `.` components and trailing separators,
/// fold `name/..` pairs. Does not touch the filesystem.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`.
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}
