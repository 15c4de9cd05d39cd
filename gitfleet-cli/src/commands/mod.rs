pub mod github;
pub mod local;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use gitfleet_core::config::DEFAULT_PARALLELISM;
use gitfleet_core::{ActionPlan, RunConfig};
use gitfleet_sync::{run_blocking, ProcessOperations, RunReport, Workspace, DEFAULT_SYNC_COMMAND};

use crate::observer::{ConsoleObserver, OutputMode};
use crate::report;

/// Flags shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Print what would be done without syncing, cloning or moving anything.
    #[arg(short = 'n', long, global = true, env = "GITFLEET_DRY_RUN")]
    pub dry_run: bool,

    /// Print every repository as it is processed, and debug logs.
    #[arg(short, long, global = true, env = "GITFLEET_VERBOSE")]
    pub verbose: bool,

    /// Maximum number of repositories processed at once.
    #[arg(
        long,
        global = true,
        env = "GITFLEET_PARALLELISM",
        default_value_t = DEFAULT_PARALLELISM
    )]
    pub parallelism: usize,

    /// Command run inside each existing repository to update it.
    #[arg(
        long,
        global = true,
        env = "GITFLEET_SYNC_COMMAND",
        default_value = DEFAULT_SYNC_COMMAND
    )]
    pub sync_command: String,

    /// Print the run report as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,
}

/// Everything needed to execute a plan, validated before any remote call.
pub struct Runner {
    config: RunConfig,
    ops: ProcessOperations,
    json: bool,
}

impl Runner {
    pub fn from_args(global: &GlobalArgs) -> Result<Self> {
        let config = RunConfig::new(global.parallelism, global.dry_run, global.verbose)
            .context("invalid --parallelism")?;
        let ops = ProcessOperations::new(&global.sync_command).context("invalid --sync-command")?;
        Ok(Self {
            config,
            ops,
            json: global.json,
        })
    }

    pub fn json(&self) -> bool {
        self.json
    }

    /// Run all phases of `plan`, then print the report.
    pub fn execute(self, plan: ActionPlan, workspace: &Workspace) -> Result<RunReport> {
        let mode = if self.json {
            OutputMode::Quiet
        } else if self.config.verbose {
            OutputMode::Verbose
        } else {
            OutputMode::Progress
        };
        tracing::debug!(
            dir = %workspace.dir.display(),
            archive_dir = %workspace.archive_dir.display(),
            parallelism = self.config.max_concurrency.get(),
            dry_run = self.config.dry_run,
            ?mode,
            "starting run"
        );
        let observer = Arc::new(ConsoleObserver::new(mode, self.config.dry_run));
        let report = run_blocking(plan, workspace, &self.config, Arc::new(self.ops), observer)
            .with_context(|| format!("run in {} failed", workspace.dir.display()))?;

        if self.json {
            report::print_json(&report)?;
        } else {
            report::print_report(&report);
        }
        Ok(report)
    }
}
