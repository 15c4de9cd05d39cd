//! `gitfleet local`: sync every repository already in a directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use gitfleet_core::config::DEFAULT_ARCHIVE_DIR;
use gitfleet_core::clean_path;
use gitfleet_sync::{plan_local, Workspace};

use super::{GlobalArgs, Runner};
use crate::report;

/// Arguments for `gitfleet local`.
#[derive(Args, Debug)]
pub struct LocalArgs {
    /// Directory whose git repositories are synced.
    pub dir: PathBuf,
}

impl LocalArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let runner = Runner::from_args(global)?;
        let dir = clean_path(&self.dir);
        if !runner.json() {
            println!("{} all git repos in {}", "Syncing".bold(), dir.display());
        }
        let plan = plan_local(&dir)
            .with_context(|| format!("failed to list git directories in {}", dir.display()))?;
        if !runner.json() {
            report::print_plan(&plan);
        }
        let workspace = Workspace::new(dir.clone(), dir.join(DEFAULT_ARCHIVE_DIR));
        runner.execute(plan, &workspace)?;
        Ok(())
    }
}
