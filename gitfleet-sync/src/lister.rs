//! Local git working tree discovery.

use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{io_err, SyncError};

/// Names of the immediate subdirectories of `root` that are git working
/// trees, sorted by name.
///
/// Plain files and directories where `git rev-parse` fails are skipped.
pub fn list_git_dirs(root: &Path) -> Result<Vec<String>, SyncError> {
    list_git_dirs_with(root, is_git_work_tree)
}

/// [`list_git_dirs`] with a caller-supplied git-ness probe.
pub fn list_git_dirs_with<P>(root: &Path, probe: P) -> Result<Vec<String>, SyncError>
where
    P: Fn(&Path) -> bool,
{
    let mut entries = fs::read_dir(root)
        .map_err(|e| io_err(root, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| io_err(root, e))?;
    entries.sort_by_key(|e| e.file_name());

    let mut names = Vec::new();
    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| io_err(&path, e))?;
        if !file_type.is_dir() {
            tracing::debug!(path = %path.display(), "not a directory");
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            tracing::debug!(path = %path.display(), "skipping non UTF-8 directory name");
            continue;
        };
        if probe(&path) {
            names.push(name);
        } else {
            tracing::debug!(path = %path.display(), "not a git directory");
        }
    }
    Ok(names)
}

/// `git rev-parse` run inside `path` succeeds.
pub fn is_git_work_tree(path: &Path) -> bool {
    Command::new("git")
        .arg("rev-parse")
        .current_dir(path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
