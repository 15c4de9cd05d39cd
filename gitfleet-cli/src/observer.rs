//! Terminal rendering of run progress.

use std::sync::Mutex;

use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};

use gitfleet_core::{Phase, RepoName, RepoOutcome, WorkItem};
use gitfleet_sync::{PhaseObserver, PhaseReport};

/// How much the console should say while phases run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// One progress bar per phase.
    Progress,
    /// One line per dispatched item, no bar.
    Verbose,
    /// Nothing on stdout; used with `--json`.
    Quiet,
}

/// Progress bar in normal mode, coloured per-item lines in verbose and
/// dry-run mode.
pub struct ConsoleObserver {
    mode: OutputMode,
    dry_run: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleObserver {
    pub fn new(mode: OutputMode, dry_run: bool) -> Self {
        Self {
            mode,
            dry_run,
            bar: Mutex::new(None),
        }
    }
}

fn paint(phase: Phase, text: &str) -> ColoredString {
    match phase {
        Phase::Sync => text.green(),
        Phase::Clone => text.cyan(),
        Phase::Archive => text.bright_magenta(),
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{prefix:>9} [{bar:40.cyan/blue}] {pos}/{len} {elapsed}")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

impl PhaseObserver for ConsoleObserver {
    fn phase_started(&self, phase: Phase, total: usize) {
        if self.dry_run || self.mode != OutputMode::Progress {
            return;
        }
        let bar = ProgressBar::new(total as u64);
        bar.set_style(bar_style());
        bar.set_prefix(phase.progressive());
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn item_planned(&self, phase: Phase, item: &WorkItem) {
        if self.mode == OutputMode::Quiet {
            return;
        }
        let verb = format!("Would {}", phase.verb().to_lowercase());
        println!("{} {}", paint(phase, &verb), item.name);
    }

    fn item_dispatched(&self, phase: Phase, repo: &RepoName) {
        if self.mode == OutputMode::Verbose {
            println!("{} {}", paint(phase, phase.progressive()), repo);
        }
    }

    fn item_completed(&self, _phase: Phase, _repo: &RepoName, _outcome: &RepoOutcome) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(bar) = slot.as_ref() {
                bar.inc(1);
            }
        }
    }

    fn phase_finished(&self, _report: &PhaseReport) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }

    fn notice(&self, message: &str) {
        if self.mode != OutputMode::Quiet {
            println!("{}", message.yellow());
        }
    }
}
