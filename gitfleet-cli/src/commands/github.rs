//! `gitfleet github`: reconcile a directory with a GitHub account.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use gitfleet_core::filter::{DEFAULT_EXCLUDE, DEFAULT_INCLUDE};
use gitfleet_core::{clean_path, ReconcileConfig, RepoFilter};
use gitfleet_github::{GithubClient, Protocol};
use gitfleet_sync::{plan_remote, Workspace};

use super::{GlobalArgs, Runner};
use crate::report;

/// Arguments for `gitfleet github`.
#[derive(Args, Debug)]
pub struct GithubArgs {
    /// GitHub user or organisation to mirror.
    pub identity: String,

    /// Directory holding one clone per repository.
    pub dir: PathBuf,

    /// Only consider repositories whose name matches this regex.
    #[arg(long, env = "GITFLEET_INCLUDE", default_value = DEFAULT_INCLUDE)]
    pub include: String,

    /// Ignore repositories whose name matches this regex.
    #[arg(long, env = "GITFLEET_EXCLUDE", default_value = DEFAULT_EXCLUDE)]
    pub exclude: String,

    /// Where archived repositories are moved [default: <dir>/.archive].
    #[arg(long, env = "GITFLEET_ARCHIVE_DIR")]
    pub archive_dir: Option<PathBuf>,

    /// Extra GitHub search qualifiers, e.g. "language:rust".
    #[arg(short, long, env = "GITFLEET_SEARCH", default_value = "")]
    pub search: String,

    /// Clone over ssh or https.
    #[arg(long, env = "GITFLEET_PROTOCOL", default_value = "ssh")]
    pub protocol: Protocol,
}

impl GithubArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let runner = Runner::from_args(global)?;
        let filter = RepoFilter::new(&self.include, &self.exclude)?;
        let dir = clean_path(&self.dir);
        let config = ReconcileConfig::new(&dir, self.archive_dir.as_deref(), filter);
        let workspace = Workspace::new(dir.clone(), config.archive_dir.clone());

        if !runner.json() {
            println!(
                "{} github.com/{} into {}",
                "Reconciling".bold(),
                self.identity,
                dir.display()
            );
            println!("Archive dir: {}", config.archive_dir.display());
        }

        let client = GithubClient::from_env()?.with_protocol(self.protocol);
        let descriptors = client
            .fetch_repos(&self.identity, &self.search)
            .with_context(|| format!("failed to list repositories of '{}'", self.identity))?;

        let plan = plan_remote(&dir, &descriptors, &config)
            .with_context(|| format!("failed to plan run in {}", dir.display()))?;
        if !runner.json() {
            report::print_plan(&plan);
        }

        runner.execute(plan, &workspace)?;
        Ok(())
    }
}
