//! Reconciliation and bounded execution of repository actions.
//!
//! A run lists the local git directories ([`lister`]), reconciles them with a
//! remote inventory into an action plan ([`reconcile`], [`pipeline`]), then
//! executes the plan phase by phase ([`phases`]) with a bounded worker pool
//! ([`executor`]), collecting per-repository outcomes into a [`RunReport`].

pub mod error;
pub mod executor;
pub mod lister;
pub mod ops;
pub mod phases;
pub mod pipeline;
pub mod reconcile;
pub mod report;

pub use error::SyncError;
pub use executor::{execute, PhaseObserver, SilentObserver, WorkFn};
pub use lister::{is_git_work_tree, list_git_dirs, list_git_dirs_with};
pub use ops::{OpOutput, ProcessOperations, RepoOperations, DEFAULT_SYNC_COMMAND};
pub use phases::{run_blocking, run_phases, Workspace};
pub use pipeline::{plan_local, plan_local_with, plan_remote, plan_remote_with};
pub use reconcile::{classify, reconcile, reconcile_on_disk, Action, LocalPool};
pub use report::{ItemMessage, PhaseReport, RunReport};
