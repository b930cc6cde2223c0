//! Git operations by shelling out to the system `git` binary.
//!
//! Inherits the user's git config, hooks, SSH agent and credential store.
//! Mutating commands honour the dry-run flag; read-only ones always run.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::commit::WorkingTreeDiff;
use crate::error::GitError;
use crate::git::VersionControl;

/// `git` invoked in a fixed working directory.
pub struct GitCli {
    workdir: PathBuf,
    dry_run: bool,
    /// Commands announced instead of run, in order.
    announced: RefCell<Vec<String>>,
}

impl GitCli {
    pub fn new(workdir: PathBuf, dry_run: bool) -> Self {
        Self {
            workdir,
            dry_run,
            announced: RefCell::new(Vec::new()),
        }
    }

    /// Mutating commands skipped so far because of dry-run mode.
    pub fn announced(&self) -> Vec<String> {
        self.announced.borrow().clone()
    }

    /// Run a read-only git command and return its stdout.
    fn read(&self, args: &[&str]) -> Result<String, GitError> {
        run_git(&self.workdir, args)
    }

    /// Run a mutating git command, or announce it in dry-run mode.
    ///
    /// `display` is what gets printed; it may differ from `args` when an
    /// argument (a commit message) is too long to show inline.
    fn mutate(&self, args: &[&str], display: &str) -> Result<(), GitError> {
        if self.dry_run {
            println!("{}", dry_run_line(display));
            self.announced.borrow_mut().push(display.to_string());
            return Ok(());
        }
        run_git(&self.workdir, args).map(|_| ())
    }
}

impl VersionControl for GitCli {
    fn diff(&self) -> Result<WorkingTreeDiff, GitError> {
        let staged = self.read(&["diff", "--cached", "--no-color"])?;
        let unstaged = self.read(&["diff", "--no-color"])?;
        let untracked = self.read(&["ls-files", "--others", "--exclude-standard"])?;
        Ok(WorkingTreeDiff::new(staged, unstaged, &untracked))
    }

    fn stage_all(&self) -> Result<(), GitError> {
        self.mutate(&["add", "--all"], "git add --all")
    }

    fn commit(&self, message: &str) -> Result<(), GitError> {
        self.mutate(&["commit", "-m", message], "git commit -m <message>")?;
        if self.dry_run {
            println!("[DRY RUN] Would commit with message:\n{message}");
        }
        Ok(())
    }

    fn push(&self) -> Result<(), GitError> {
        self.mutate(&["push"], "git push")
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

/// The line printed in place of a mutating command during a dry run.
pub fn dry_run_line(command: &str) -> String {
    format!("[DRY RUN] Would execute: {command}")
}

/// Run a git command and return stdout, or a descriptive error.
///
/// Stdin is inherited so credential helpers and hooks can prompt.
fn run_git(workdir: &Path, args: &[&str]) -> Result<String, GitError> {
    let command = display_command(args);
    debug!("Running `{}` in {}", command, workdir.display());

    let output = Command::new("git")
        .args(args)
        .current_dir(workdir)
        .stdin(Stdio::inherit())
        .output()
        .map_err(|source| GitError::SpawnFailed {
            command: command.clone(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(GitError::NonZeroExit {
            command,
            code: output.status.code(),
            stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn display_command(args: &[&str]) -> String {
    let mut parts = vec!["git".to_string()];
    parts.extend(args.iter().map(|a| {
        if a.contains(char::is_whitespace) {
            format!("{a:?}")
        } else {
            a.to_string()
        }
    }));
    parts.join(" ")
}
