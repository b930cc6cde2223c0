//! Repository discovery using git2-rs.

use std::path::{Path, PathBuf};

use git2::Repository;

use crate::error::ConfigError;

/// Where the workflow runs.
#[derive(Debug, Clone)]
pub struct RepoInfo {
    /// Root of the working tree; every git command runs here.
    pub workdir: PathBuf,
    /// Current branch, `None` for a detached HEAD.
    pub branch: Option<String>,
}

/// Find the repository enclosing `start`, searching parent directories.
pub fn discover_repo(start: &Path) -> Result<RepoInfo, ConfigError> {
    let repo = Repository::discover(start).map_err(ConfigError::NotARepository)?;
    let workdir = repo
        .workdir()
        .ok_or(ConfigError::BareRepository)?
        .to_path_buf();

    Ok(RepoInfo {
        branch: current_branch(&repo),
        workdir,
    })
}

/// Branch name from HEAD, including an unborn branch in a fresh repository.
fn current_branch(repo: &Repository) -> Option<String> {
    if let Ok(head) = repo.head() {
        return if head.is_branch() {
            head.shorthand().map(str::to_string)
        } else {
            None
        };
    }

    repo.find_reference("HEAD")
        .ok()
        .and_then(|r| r.symbolic_target().map(str::to_string))
        .map(|target| target.trim_start_matches("refs/heads/").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;

    fn commit_empty_tree(repo: &Repository) -> git2::Oid {
        let sig = Signature::now("Test", "test@test.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "init", &tree, &[])
            .unwrap()
    }

    #[test]
    fn test_discover_from_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit_empty_tree(&repo);

        let nested = dir.path().join("src").join("deep");
        std::fs::create_dir_all(&nested).unwrap();

        let info = discover_repo(&nested).unwrap();
        assert_eq!(
            info.workdir.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
        assert!(info.branch.is_some());
    }

    #[test]
    fn test_unborn_branch_name() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        repo.set_head("refs/heads/trunk").unwrap();

        let info = discover_repo(dir.path()).unwrap();
        assert_eq!(info.branch.as_deref(), Some("trunk"));
    }

    #[test]
    fn test_detached_head_has_no_branch() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let oid = commit_empty_tree(&repo);
        repo.set_head_detached(oid).unwrap();

        let info = discover_repo(dir.path()).unwrap();
        assert!(info.branch.is_none());
    }

    #[test]
    fn test_bare_repository_rejected() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init_bare(dir.path()).unwrap();
        assert!(matches!(
            discover_repo(dir.path()),
            Err(ConfigError::BareRepository)
        ));
    }
}
