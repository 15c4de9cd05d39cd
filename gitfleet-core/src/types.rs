//! Domain types for repository reconciliation.
//!
//! A run starts from remote [`RepoDescriptor`]s and the names of local git
//! directories, produces an [`ActionPlan`] of [`WorkItem`]s, and ends with one
//! [`RepoOutcome`] per executed item.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Marker that turns a successful operation into a [`Severity::Warning`].
pub const WARNING_MARKER: &str = "warning: ";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A repository name. Unique key within a reconciliation run and the name of
/// the repository's directory on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoName(pub String);

impl RepoName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RepoName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RepoName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How an executed action turned out.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Classify the result of an external operation.
    ///
    /// A failed operation is always [`Severity::Error`], whatever it printed.
    /// A successful one is a warning when its output carries
    /// [`WARNING_MARKER`], and informational otherwise.
    pub fn classify(output: &str, succeeded: bool) -> Self {
        if !succeeded {
            Severity::Error
        } else if output.contains(WARNING_MARKER) {
            Severity::Warning
        } else {
            Severity::Info
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One of the three sequential execution stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Sync,
    Clone,
    Archive,
}

impl Phase {
    /// Execution order. Clone must finish before archive starts.
    pub const ORDER: [Phase; 3] = [Phase::Sync, Phase::Clone, Phase::Archive];

    /// `"Sync"`, `"Clone"`, `"Archive"`.
    pub fn verb(self) -> &'static str {
        match self {
            Phase::Sync => "Sync",
            Phase::Clone => "Clone",
            Phase::Archive => "Archive",
        }
    }

    /// `"Syncing"`, `"Cloning"`, `"Archiving"`.
    pub fn progressive(self) -> &'static str {
        match self {
            Phase::Sync => "Syncing",
            Phase::Clone => "Cloning",
            Phase::Archive => "Archiving",
        }
    }

    /// `"synced"`, `"cloned"`, `"archived"`.
    pub fn past(self) -> &'static str {
        match self {
            Phase::Sync => "synced",
            Phase::Clone => "cloned",
            Phase::Archive => "archived",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Sync => write!(f, "sync"),
            Phase::Clone => write!(f, "clone"),
            Phase::Archive => write!(f, "archive"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A remote repository record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoDescriptor {
    pub name: RepoName,
    pub clone_url: String,
    /// Remote lifecycle flag; archived repositories are moved out of the
    /// working directory.
    pub archived: bool,
}

impl RepoDescriptor {
    pub fn new(name: impl Into<RepoName>, clone_url: impl Into<String>, archived: bool) -> Self {
        Self {
            name: name.into(),
            clone_url: clone_url.into(),
            archived,
        }
    }
}

/// Result attached to a work item once its action has run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoOutcome {
    pub severity: Severity,
    /// Raw process output or error text.
    pub message: String,
}

impl RepoOutcome {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    /// Build an outcome from an operation's output text and exit status.
    pub fn from_output(output: impl Into<String>, succeeded: bool) -> Self {
        let message = output.into();
        Self {
            severity: Severity::classify(&message, succeeded),
            message,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }
}

/// A unit of work in one phase: the repository name plus whatever the
/// underlying operation needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub name: RepoName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clone_url: Option<String>,
}

impl WorkItem {
    /// A local directory with no remote counterpart.
    pub fn local(name: impl Into<RepoName>) -> Self {
        Self {
            name: name.into(),
            clone_url: None,
        }
    }

    pub fn from_descriptor(descriptor: &RepoDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            clone_url: Some(descriptor.clone_url.clone()),
        }
    }
}

/// The three action sets produced by one reconciliation pass.
///
/// Disjoint, except that a repository may sit in both `to_clone` and
/// `to_archive` when it was archived upstream and never cloned locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub to_sync: Vec<WorkItem>,
    pub to_clone: Vec<WorkItem>,
    pub to_archive: Vec<WorkItem>,
}

impl ActionPlan {
    pub fn items(&self, phase: Phase) -> &[WorkItem] {
        match phase {
            Phase::Sync => &self.to_sync,
            Phase::Clone => &self.to_clone,
            Phase::Archive => &self.to_archive,
        }
    }

    /// Repository names queued for `phase`, in plan order.
    pub fn names(&self, phase: Phase) -> Vec<&str> {
        self.items(phase).iter().map(|i| i.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.to_sync.is_empty() && self.to_clone.is_empty() && self.to_archive.is_empty()
    }

    /// Consume the plan into its phases in execution order.
    pub fn into_phases(self) -> [(Phase, Vec<WorkItem>); 3] {
        [
            (Phase::Sync, self.to_sync),
            (Phase::Clone, self.to_clone),
            (Phase::Archive, self.to_archive),
        ]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
