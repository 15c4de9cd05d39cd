//! Classification of remote repositories against local directories.
//!
//! [`classify`] decides a single repository; [`reconcile`] runs it over the
//! whole remote inventory and routes every leftover local directory to the
//! archive set.

use std::path::Path;

use gitfleet_core::{ActionPlan, ReconcileConfig, RepoDescriptor, WorkItem};

/// The per-repository decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Present locally and live upstream: update in place.
    Sync,
    /// Live upstream, missing locally.
    Clone,
    /// Present locally, archived upstream: move to the archive directory.
    Archive,
    /// Archived upstream and missing locally: clone, then archive.
    CloneArchive,
}

/// Local directory names still available for matching.
///
/// Each name is consumed by at most one match. Removal keeps the remaining
/// names in listing order so leftovers are archived in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalPool {
    names: Vec<String>,
}

impl LocalPool {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Remove the first entry equal to `name`. Returns whether one was found.
    pub fn take(&mut self, name: &str) -> bool {
        match self.names.iter().position(|n| n == name) {
            Some(index) => {
                self.names.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn into_names(self) -> Vec<String> {
        self.names
    }
}

impl From<Vec<String>> for LocalPool {
    fn from(names: Vec<String>) -> Self {
        Self::new(names)
    }
}

impl<'a> FromIterator<&'a str> for LocalPool {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(str::to_owned).collect())
    }
}

/// Decide what to do with one remote repository, consuming its local
/// directory from `pool` when there is one.
pub fn classify(descriptor: &RepoDescriptor, pool: &mut LocalPool) -> Action {
    let present = pool.take(descriptor.name.as_str());
    match (present, descriptor.archived) {
        (true, true) => Action::Archive,
        (true, false) => Action::Sync,
        (false, false) => Action::Clone,
        (false, true) => Action::CloneArchive,
    }
}

/// Build the sync/clone/archive sets for a run.
///
/// Descriptors the filter rejects are ignored entirely, so their local
/// directories stay in the pool and end up archived like any other orphan.
/// A clone-archive candidate is dropped when `exists` reports that
/// `<archive_dir>/<name>` is already there.
///
/// `to_sync` and `to_clone` follow descriptor order; `to_archive` lists
/// classified repositories first, then orphaned directories in listing order.
pub fn reconcile<E>(
    descriptors: &[RepoDescriptor],
    local: Vec<String>,
    config: &ReconcileConfig,
    exists: E,
) -> ActionPlan
where
    E: Fn(&Path) -> bool,
{
    let mut pool = LocalPool::from(local);
    let mut plan = ActionPlan::default();

    for descriptor in descriptors {
        if !config.filter.allows(descriptor.name.as_str()) {
            tracing::debug!(repo = %descriptor.name, "filtered out");
            continue;
        }
        match classify(descriptor, &mut pool) {
            Action::Sync => plan.to_sync.push(WorkItem::from_descriptor(descriptor)),
            Action::Clone => plan.to_clone.push(WorkItem::from_descriptor(descriptor)),
            Action::Archive => plan.to_archive.push(WorkItem::from_descriptor(descriptor)),
            Action::CloneArchive => {
                let archived_copy = config.archive_dir.join(descriptor.name.as_str());
                if exists(&archived_copy) {
                    tracing::debug!(
                        repo = %descriptor.name,
                        path = %archived_copy.display(),
                        "already archived",
                    );
                } else {
                    plan.to_clone.push(WorkItem::from_descriptor(descriptor));
                    plan.to_archive.push(WorkItem::from_descriptor(descriptor));
                }
            }
        }
    }

    for name in pool.into_names() {
        tracing::debug!(repo = %name, "no remote counterpart, archiving");
        plan.to_archive.push(WorkItem::local(name));
    }

    plan
}

/// [`reconcile`] probing the real filesystem for already-archived copies.
pub fn reconcile_on_disk(
    descriptors: &[RepoDescriptor],
    local: Vec<String>,
    config: &ReconcileConfig,
) -> ActionPlan {
    reconcile(descriptors, local, config, Path::exists)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use gitfleet_core::RepoFilter;

    use super::*;

    fn pool() -> LocalPool {
        ["archivedRepo", "syncRepo", "deletedRepo"]
            .into_iter()
            .collect()
    }

    fn repo(name: &str, archived: bool) -> RepoDescriptor {
        RepoDescriptor::new(name, format!("git@giturl/{name}"), archived)
    }

    #[rstest]
    #[case("archivedRepo", true, Action::Archive, &["syncRepo", "deletedRepo"])]
    #[case("cloneRepo", false, Action::Clone, &["archivedRepo", "syncRepo", "deletedRepo"])]
    #[case("syncRepo", false, Action::Sync, &["archivedRepo", "deletedRepo"])]
    #[case(
        "cloneArchiveRepo",
        true,
        Action::CloneArchive,
        &["archivedRepo", "syncRepo", "deletedRepo"]
    )]
    fn classify_cases(
        #[case] name: &str,
        #[case] archived: bool,
        #[case] expected: Action,
        #[case] remaining: &[&str],
    ) {
        let mut pool = pool();
        let action = classify(&repo(name, archived), &mut pool);
        assert_eq!(action, expected);
        assert_eq!(pool.names(), remaining);
    }

    #[test]
    fn classify_consumes_only_the_first_match() {
        let mut pool: LocalPool = ["dup", "other", "dup"].into_iter().collect();
        assert_eq!(classify(&repo("dup", false), &mut pool), Action::Sync);
        assert_eq!(pool.names(), ["other", "dup"]);
    }

    #[test]
    fn take_on_empty_pool_is_a_miss() {
        let mut pool = LocalPool::default();
        assert!(!pool.take("anything"));
        assert!(pool.is_empty());
    }

    #[test]
    fn reconcile_with_no_local_dirs_clones_everything_live() {
        let config = ReconcileConfig::new(
            Path::new("/work"),
            None,
            RepoFilter::allow_all().expect("filter"),
        );
        let plan = reconcile(
            &[repo("a", false), repo("b", true)],
            vec![],
            &config,
            |_| false,
        );
        assert_eq!(plan.names(gitfleet_core::Phase::Clone), vec!["a", "b"]);
        assert_eq!(plan.names(gitfleet_core::Phase::Archive), vec!["b"]);
        assert!(plan.to_sync.is_empty());
    }

    #[test]
    fn archive_probe_targets_archive_dir() {
        let config = ReconcileConfig::new(
            Path::new("/work"),
            Some(Path::new("/attic")),
            RepoFilter::allow_all().expect("filter"),
        );
        let probed = std::cell::RefCell::new(Vec::new());
        reconcile(&[repo("gone", true)], vec![], &config, |p| {
            probed.borrow_mut().push(p.to_path_buf());
            false
        });
        assert_eq!(*probed.borrow(), vec![Path::new("/attic/gone").to_path_buf()]);
    }
}
