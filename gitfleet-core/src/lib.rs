//! gitfleet core library: domain types, filters, run configuration, errors.
//!
//! - [`types`]: newtypes and domain structs shared by every crate
//! - [`filter`]: include/exclude name filtering
//! - [`config`]: explicit run configuration values
//! - [`error`]: [`ConfigError`]

pub mod config;
pub mod error;
pub mod filter;
pub mod types;

pub use config::{clean_path, ReconcileConfig, RunConfig};
pub use error::ConfigError;
pub use filter::RepoFilter;
pub use types::{
    ActionPlan, Phase, RepoDescriptor, RepoName, RepoOutcome, Severity, WorkItem,
};
