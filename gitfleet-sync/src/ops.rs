//! External per-action operations.
//!
//! The executor only sees [`RepoOperations`]; [`ProcessOperations`] is the
//! production implementation that shells out to git and the sync helper and
//! moves directories with a rename.

use std::path::Path;
use std::process::Command;

use gitfleet_core::{ConfigError, RepoOutcome};

/// Default sync helper.
pub const DEFAULT_SYNC_COMMAND: &str = "hub sync";

/// Raw result of an external operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpOutput {
    pub text: String,
    pub succeeded: bool,
}

impl OpOutput {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            succeeded: true,
        }
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            succeeded: false,
        }
    }

    pub fn into_outcome(self) -> RepoOutcome {
        RepoOutcome::from_output(self.text, self.succeeded)
    }
}

/// The three operations a run can perform on a repository.
///
/// Implementations block for the duration of the operation; the executor
/// runs them on blocking worker threads.
pub trait RepoOperations: Send + Sync + 'static {
    /// Update the existing working tree at `repo_dir` in place.
    fn sync(&self, repo_dir: &Path) -> OpOutput;

    /// Clone `clone_url` into a new directory under `dest_root`.
    fn clone_repo(&self, clone_url: &str, dest_root: &Path) -> OpOutput;

    /// Move `src` to `dst`.
    fn archive(&self, src: &Path, dst: &Path) -> OpOutput;
}

/// Runs real processes: the sync helper, `git clone`, and `rename(2)`.
#[derive(Debug, Clone)]
pub struct ProcessOperations {
    sync_program: String,
    sync_args: Vec<String>,
    git: String,
}

impl ProcessOperations {
    /// `sync_command` is split on whitespace into program and arguments.
    pub fn new(sync_command: &str) -> Result<Self, ConfigError> {
        let mut parts = sync_command.split_whitespace().map(str::to_owned);
        let sync_program = parts.next().ok_or(ConfigError::EmptyCommand)?;
        Ok(Self {
            sync_program,
            sync_args: parts.collect(),
            git: "git".to_string(),
        })
    }

    /// Use a different git executable.
    pub fn with_git(mut self, git: impl Into<String>) -> Self {
        self.git = git.into();
        self
    }

    pub fn sync_program(&self) -> &str {
        &self.sync_program
    }

    pub fn sync_args(&self) -> &[String] {
        &self.sync_args
    }
}

impl RepoOperations for ProcessOperations {
    fn sync(&self, repo_dir: &Path) -> OpOutput {
        run_command(&self.sync_program, &self.sync_args, repo_dir)
    }

    fn clone_repo(&self, clone_url: &str, dest_root: &Path) -> OpOutput {
        run_command(&self.git, &["clone".to_string(), clone_url.to_string()], dest_root)
    }

    fn archive(&self, src: &Path, dst: &Path) -> OpOutput {
        match std::fs::rename(src, dst) {
            Ok(()) => OpOutput::success(""),
            Err(err) => OpOutput::failure(format!(
                "rename {} {}: {err}",
                src.display(),
                dst.display()
            )),
        }
    }
}

/// Run `program args..` in `cwd`, capturing stdout followed by stderr.
fn run_command(program: &str, args: &[String], cwd: &Path) -> OpOutput {
    let output = Command::new(program).args(args).current_dir(cwd).output();
    match output {
        Ok(output) => {
            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            if output.status.success() {
                OpOutput::success(text)
            } else {
                if text.is_empty() {
                    text = output.status.to_string();
                }
                OpOutput::failure(text)
            }
        }
        Err(err) => OpOutput::failure(format!(
            "failed to run {program} in {}: {err}",
            cwd.display()
        )),
    }
}
