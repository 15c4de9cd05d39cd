//! Ordered phase execution: sync, then clone, then archive.
//!
//! Phases never overlap. An archived-upstream repository that was missing
//! locally is cloned in the clone phase and moved away in the archive phase,
//! so the clone phase must be fully drained first.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use gitfleet_core::{ActionPlan, Phase, RepoOutcome, RunConfig, WorkItem};

use crate::error::{io_err, SyncError};
use crate::executor::{execute, PhaseObserver, WorkFn};
use crate::ops::RepoOperations;
use crate::report::{PhaseReport, RunReport};

/// Where repositories live and where archived ones go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub dir: PathBuf,
    pub archive_dir: PathBuf,
}

impl Workspace {
    pub fn new(dir: impl Into<PathBuf>, archive_dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            archive_dir: archive_dir.into(),
        }
    }

    pub fn repo_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn archived_path(&self, name: &str) -> PathBuf {
        self.archive_dir.join(name)
    }
}

/// Execute every phase of `plan` in [`Phase::ORDER`].
///
/// Phases with no items are recorded as empty and produce no observer calls.
/// Only failing to create the archive directory aborts the run.
pub async fn run_phases<O: RepoOperations>(
    plan: ActionPlan,
    workspace: &Workspace,
    config: &RunConfig,
    ops: Arc<O>,
    observer: Arc<dyn PhaseObserver>,
) -> Result<RunReport, SyncError> {
    let mut report = RunReport::new(config.dry_run);

    for (phase, items) in plan.into_phases() {
        if items.is_empty() {
            tracing::debug!(%phase, "nothing to do");
            report.phases.push(PhaseReport::empty(phase));
            continue;
        }
        if phase == Phase::Archive {
            prepare_archive_dir(&workspace.archive_dir, config.dry_run, observer.as_ref())?;
        }
        let work = phase_work(phase, workspace, Arc::clone(&ops));
        let phase_report = execute(phase, items, config, work, Arc::clone(&observer)).await?;
        report.phases.push(phase_report);
    }

    Ok(report)
}

/// [`run_phases`] on a fresh multi-threaded runtime, blocking until done.
pub fn run_blocking<O: RepoOperations>(
    plan: ActionPlan,
    workspace: &Workspace,
    config: &RunConfig,
    ops: Arc<O>,
    observer: Arc<dyn PhaseObserver>,
) -> Result<RunReport, SyncError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .max_blocking_threads(config.max_concurrency.get())
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    runtime.block_on(run_phases(plan, workspace, config, ops, observer))
}

fn phase_work<O: RepoOperations>(phase: Phase, workspace: &Workspace, ops: Arc<O>) -> WorkFn {
    let workspace = workspace.clone();
    match phase {
        Phase::Sync => Arc::new(move |item: &WorkItem| {
            ops.sync(&workspace.repo_path(item.name.as_str()))
                .into_outcome()
        }),
        Phase::Clone => Arc::new(move |item: &WorkItem| match &item.clone_url {
            Some(url) => ops.clone_repo(url, &workspace.dir).into_outcome(),
            None => RepoOutcome::error(format!("no clone URL for {}", item.name)),
        }),
        Phase::Archive => Arc::new(move |item: &WorkItem| {
            let name = item.name.as_str();
            ops.archive(&workspace.repo_path(name), &workspace.archived_path(name))
                .into_outcome()
        }),
    }
}

fn prepare_archive_dir(
    path: &Path,
    dry_run: bool,
    observer: &dyn PhaseObserver,
) -> Result<(), SyncError> {
    if dry_run {
        if !path.exists() {
            observer.notice(&format!("Would create archive dir {}", path.display()));
        }
        return Ok(());
    }
    std::fs::create_dir_all(path).map_err(|source| SyncError::ArchiveDir {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "archive dir ready");
    Ok(())
}
