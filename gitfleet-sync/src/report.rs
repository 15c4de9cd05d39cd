//! Run reports: per-phase counts plus the collected warnings and errors.

use std::fmt;

use serde::Serialize;

use gitfleet_core::{Phase, RepoName};

/// A warning or error attached to one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemMessage {
    pub repo: RepoName,
    pub message: String,
}

impl ItemMessage {
    pub fn new(repo: impl Into<RepoName>, message: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ItemMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.repo, self.message.trim_end())
    }
}

/// What one phase did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseReport {
    pub phase: Phase,
    /// Items submitted to the phase.
    pub total: usize,
    pub failures: Vec<ItemMessage>,
    pub warnings: Vec<ItemMessage>,
}

impl PhaseReport {
    pub fn empty(phase: Phase) -> Self {
        Self {
            phase,
            total: 0,
            failures: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Items that did not end in an error. Warnings count as successes.
    pub fn succeeded(&self) -> usize {
        self.total.saturating_sub(self.failures.len())
    }

    /// `"3/4 repos cloned"`.
    pub fn summary_line(&self) -> String {
        format!(
            "{}/{} repos {}",
            self.succeeded(),
            self.total,
            self.phase.past()
        )
    }
}

/// Outcome of a whole run, phases in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub dry_run: bool,
    pub phases: Vec<PhaseReport>,
}

impl RunReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            phases: Vec::new(),
        }
    }

    pub fn phase(&self, phase: Phase) -> Option<&PhaseReport> {
        self.phases.iter().find(|p| p.phase == phase)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ItemMessage> {
        self.phases.iter().flat_map(|p| p.warnings.iter())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemMessage> {
        self.phases.iter().flat_map(|p| p.failures.iter())
    }

    pub fn has_failures(&self) -> bool {
        self.phases.iter().any(|p| !p.failures.is_empty())
    }

    /// One count line per phase that had work. Empty for dry runs.
    pub fn summary_lines(&self) -> Vec<String> {
        if self.dry_run {
            return Vec::new();
        }
        self.phases
            .iter()
            .filter(|p| p.total > 0)
            .map(PhaseReport::summary_line)
            .collect()
    }
}
