//! Bounded concurrent execution of one phase.
//!
//! At most `max_concurrency` items run at once. Each item runs on a blocking
//! worker thread and sends its outcome over a channel to a single collector
//! task, which is the only owner of the failure and warning lists and the only
//! caller of [`PhaseObserver::item_completed`].

use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};

use gitfleet_core::{Phase, RepoName, RepoOutcome, RunConfig, Severity, WorkItem};

use crate::error::SyncError;
use crate::report::{ItemMessage, PhaseReport};

/// The action run for every item of a phase.
pub type WorkFn = Arc<dyn Fn(&WorkItem) -> RepoOutcome + Send + Sync>;

/// Progress hooks for a run. All methods default to doing nothing.
pub trait PhaseObserver: Send + Sync {
    fn phase_started(&self, _phase: Phase, _total: usize) {}

    /// Dry run only: `item` would have been dispatched.
    fn item_planned(&self, _phase: Phase, _item: &WorkItem) {}

    fn item_dispatched(&self, _phase: Phase, _repo: &RepoName) {}

    /// Called from the collector, once per item, in completion order.
    fn item_completed(&self, _phase: Phase, _repo: &RepoName, _outcome: &RepoOutcome) {}

    fn phase_finished(&self, _report: &PhaseReport) {}

    /// Free-form run-level message, such as a dry-run notice.
    fn notice(&self, _message: &str) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl PhaseObserver for SilentObserver {}

type Completion = (RepoName, RepoOutcome);

/// Run `work` over `items` with at most `config.max_concurrency` in flight.
///
/// Per-item failures never abort the phase; they are collected into the
/// returned report, sorted by repository name. In dry-run mode nothing is
/// executed and every item is passed to [`PhaseObserver::item_planned`].
pub async fn execute(
    phase: Phase,
    items: Vec<WorkItem>,
    config: &RunConfig,
    work: WorkFn,
    observer: Arc<dyn PhaseObserver>,
) -> Result<PhaseReport, SyncError> {
    let total = items.len();
    observer.phase_started(phase, total);

    if config.dry_run {
        for item in &items {
            observer.item_planned(phase, item);
        }
        let report = PhaseReport {
            total,
            ..PhaseReport::empty(phase)
        };
        observer.phase_finished(&report);
        return Ok(report);
    }

    tracing::info!(%phase, total, limit = config.max_concurrency.get(), "phase started");

    let semaphore = Arc::new(Semaphore::new(config.max_concurrency.get()));
    let (tx, rx) = mpsc::unbounded_channel::<Completion>();
    let collector = tokio::spawn(collect(phase, rx, Arc::clone(&observer)));

    let mut handles = Vec::with_capacity(total);
    for item in items {
        let permit = match Arc::clone(&semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(err) => {
                let _ = tx.send((item.name, RepoOutcome::error(format!("worker pool closed: {err}"))));
                continue;
            }
        };
        observer.item_dispatched(phase, &item.name);

        let name = item.name.clone();
        let tx = tx.clone();
        let work = Arc::clone(&work);
        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let outcome = (*work)(&item);
            let _ = tx.send((item.name, outcome));
        });
        handles.push((name, handle));
    }

    for (name, handle) in handles {
        if let Err(err) = handle.await {
            tracing::debug!(%phase, repo = %name, error = %err, "worker did not complete");
            let _ = tx.send((name, RepoOutcome::error(format!("worker failed: {err}"))));
        }
    }
    drop(tx);

    let (mut failures, mut warnings) = collector
        .await
        .map_err(|e| SyncError::Join(format!("{phase} collector: {e}")))?;
    failures.sort_by(|a, b| a.repo.cmp(&b.repo));
    warnings.sort_by(|a, b| a.repo.cmp(&b.repo));

    let report = PhaseReport {
        phase,
        total,
        failures,
        warnings,
    };
    tracing::info!(
        %phase,
        succeeded = report.succeeded(),
        total,
        warnings = report.warnings.len(),
        "phase finished"
    );
    observer.phase_finished(&report);
    Ok(report)
}

async fn collect(
    phase: Phase,
    mut rx: mpsc::UnboundedReceiver<Completion>,
    observer: Arc<dyn PhaseObserver>,
) -> (Vec<ItemMessage>, Vec<ItemMessage>) {
    let mut failures = Vec::new();
    let mut warnings = Vec::new();
    while let Some((repo, outcome)) = rx.recv().await {
        tracing::debug!(%phase, %repo, severity = %outcome.severity, output = %outcome.message);
        observer.item_completed(phase, &repo, &outcome);
        match outcome.severity {
            Severity::Error => failures.push(ItemMessage::new(repo, outcome.message)),
            Severity::Warning => warnings.push(ItemMessage::new(repo, outcome.message)),
            Severity::Info => {}
        }
    }
    (failures, warnings)
}
