//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use git2::{Oid, Repository, Signature};

/// A throwaway git repository configured so the `git` CLI can commit.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");

        let mut config = repo.config().expect("Failed to open repo config");
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
        config.set_bool("commit.gpgsign", false).unwrap();

        Self { dir, repo }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Write `contents` to `name` relative to the working tree.
    pub fn write_file(&self, name: &str, contents: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(path, contents).expect("Failed to write file");
    }

    /// Add `name` with `contents` and commit it through git2. Returns the OID.
    pub fn commit_file(&self, name: &str, contents: &str, message: &str) -> Oid {
        self.write_file(name, contents);

        let sig = Signature::now("Test User", "test@example.com").unwrap();
        let mut index = self.repo.index().expect("Failed to get index");
        index.add_path(Path::new(name)).expect("Failed to add file");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Number of commits reachable from HEAD (0 for an unborn branch).
    pub fn commit_count(&self) -> usize {
        let Ok(head) = self.repo.head() else {
            return 0;
        };
        let mut walk = self.repo.revwalk().unwrap();
        walk.push(head.target().unwrap()).unwrap();
        walk.count()
    }

    /// Full message of the HEAD commit.
    pub fn head_message(&self) -> String {
        let commit = self.repo.head().unwrap().peel_to_commit().unwrap();
        commit.message().unwrap_or_default().to_string()
    }

    /// Paths currently staged in the index, relative to the working tree.
    pub fn staged_paths(&self) -> Vec<String> {
        let statuses = self.repo.statuses(None).unwrap();
        statuses
            .iter()
            .filter(|s| {
                s.status().intersects(
                    git2::Status::INDEX_NEW
                        | git2::Status::INDEX_MODIFIED
                        | git2::Status::INDEX_DELETED,
                )
            })
            .filter_map(|s| s.path().map(str::to_string))
            .collect()
    }

    /// Add a bare repository as `origin` and push the current branch to it
    /// with upstream tracking. Returns the bare repository's directory.
    pub fn with_origin(&self) -> tempfile::TempDir {
        let remote = tempfile::tempdir().expect("Failed to create remote dir");
        Repository::init_bare(remote.path()).expect("Failed to init bare repo");

        let url = remote.path().to_string_lossy().to_string();
        self.git(&["remote", "add", "origin", &url]);
        self.git(&["push", "-u", "origin", "HEAD"]);
        remote
    }

    /// Run the git CLI in the repository, panicking on failure.
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .current_dir(self.dir.path())
            .args(args)
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }
}
