//! Version-control access: the `git` CLI for the workflow, git2 for discovery.

pub mod cli;
pub mod repo;

use crate::commit::WorkingTreeDiff;
use crate::error::GitError;

pub use cli::{GitCli, dry_run_line};
pub use repo::{RepoInfo, discover_repo};

/// The four version-control operations the workflow needs.
pub trait VersionControl {
    /// Collect staged, unstaged and untracked changes. Read-only.
    fn diff(&self) -> Result<WorkingTreeDiff, GitError>;

    /// Stage every working-tree change.
    fn stage_all(&self) -> Result<(), GitError>;

    /// Commit the index with `message`.
    fn commit(&self, message: &str) -> Result<(), GitError>;

    /// Push the current branch to its upstream.
    fn push(&self) -> Result<(), GitError>;

    /// Whether mutating operations are only being announced.
    fn is_dry_run(&self) -> bool {
        false
    }
}
