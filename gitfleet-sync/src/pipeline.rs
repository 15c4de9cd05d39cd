//! Planning: list the working directory and turn it into an [`ActionPlan`].

use std::path::Path;

use gitfleet_core::{ActionPlan, ReconcileConfig, RepoDescriptor, WorkItem};

use crate::error::SyncError;
use crate::lister::{is_git_work_tree, list_git_dirs_with};
use crate::reconcile::reconcile;

/// Plan a run against a remote inventory.
pub fn plan_remote(
    dir: &Path,
    descriptors: &[RepoDescriptor],
    config: &ReconcileConfig,
) -> Result<ActionPlan, SyncError> {
    plan_remote_with(dir, descriptors, config, is_git_work_tree, Path::exists)
}

/// [`plan_remote`] with explicit git-ness and archive-existence probes.
pub fn plan_remote_with<P, E>(
    dir: &Path,
    descriptors: &[RepoDescriptor],
    config: &ReconcileConfig,
    git_probe: P,
    exists: E,
) -> Result<ActionPlan, SyncError>
where
    P: Fn(&Path) -> bool,
    E: Fn(&Path) -> bool,
{
    let local = list_git_dirs_with(dir, git_probe)?;
    tracing::info!(
        dir = %dir.display(),
        local = local.len(),
        remote = descriptors.len(),
        "reconciling"
    );
    let plan = reconcile(descriptors, local, config, exists);
    tracing::info!(
        sync = plan.to_sync.len(),
        clone = plan.to_clone.len(),
        archive = plan.to_archive.len(),
        "plan ready"
    );
    Ok(plan)
}

/// Plan a sync of every git directory under `dir`, with no remote inventory.
pub fn plan_local(dir: &Path) -> Result<ActionPlan, SyncError> {
    plan_local_with(dir, is_git_work_tree)
}

pub fn plan_local_with<P>(dir: &Path, git_probe: P) -> Result<ActionPlan, SyncError>
where
    P: Fn(&Path) -> bool,
{
    let names = list_git_dirs_with(dir, git_probe)?;
    Ok(ActionPlan {
        to_sync: names.into_iter().map(WorkItem::local).collect(),
        ..ActionPlan::default()
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use gitfleet_core::{Phase, RepoFilter};
    use tempfile::TempDir;

    use super::*;

    fn has_dot_git(path: &Path) -> bool {
        path.join(".git").is_dir()
    }

    #[test]
    fn local_plan_syncs_every_git_dir() {
        let root = TempDir::new().expect("tempdir");
        for name in ["b", "a"] {
            fs::create_dir_all(root.path().join(name).join(".git")).expect("git dir");
        }
        fs::create_dir_all(root.path().join("plain")).expect("plain");

        let plan = plan_local_with(root.path(), has_dot_git).expect("plan");
        assert_eq!(plan.names(Phase::Sync), vec!["a", "b"]);
        assert!(plan.to_clone.is_empty());
        assert!(plan.to_archive.is_empty());
    }

    #[test]
    fn remote_plan_lists_then_reconciles() {
        let root = TempDir::new().expect("tempdir");
        for name in ["kept", "orphan"] {
            fs::create_dir_all(root.path().join(name).join(".git")).expect("git dir");
        }
        let config = ReconcileConfig::new(root.path(), None, RepoFilter::allow_all().expect("filter"));
        let descriptors = vec![
            RepoDescriptor::new("kept", "git@giturl/kept", false),
            RepoDescriptor::new("fresh", "git@giturl/fresh", false),
        ];

        let plan =
            plan_remote_with(root.path(), &descriptors, &config, has_dot_git, Path::exists).expect("plan");

        assert_eq!(plan.names(Phase::Sync), vec!["kept"]);
        assert_eq!(plan.names(Phase::Clone), vec!["fresh"]);
        assert_eq!(plan.names(Phase::Archive), vec!["orphan"]);
    }

    #[test]
    fn unreadable_dir_is_fatal() {
        let root = TempDir::new().expect("tempdir");
        let err = plan_local_with(&root.path().join("missing"), has_dot_git).unwrap_err();
        assert!(matches!(err, SyncError::Io { .. }));
    }
}
