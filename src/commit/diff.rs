//! Pending changes in the working tree, as collected from `git`.

use std::collections::HashSet;

/// Maximum characters of diff text handed to the model before truncation.
pub const MAX_DIFF_LENGTH: usize = 30_000;

/// Raw change-set for one workflow run.
///
/// Immutable once collected; regeneration reuses the same value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingTreeDiff {
    /// `git diff --cached`
    pub staged: String,
    /// `git diff`
    pub unstaged: String,
    /// `git ls-files --others --exclude-standard`
    pub untracked: Vec<String>,
}

/// Diff text prepared for a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptDiff {
    pub text: String,
    pub truncated: bool,
}

impl WorkingTreeDiff {
    pub fn new(staged: String, unstaged: String, untracked_listing: &str) -> Self {
        let untracked = untracked_listing
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            staged,
            unstaged,
            untracked,
        }
    }

    /// True when there is nothing to stage or commit.
    pub fn is_empty(&self) -> bool {
        self.staged.trim().is_empty()
            && self.unstaged.trim().is_empty()
            && self.untracked.is_empty()
    }

    /// Number of files touched: distinct `diff --git` headers plus untracked paths.
    ///
    /// A partially staged file shows up in both diffs with the same header
    /// and is counted once.
    pub fn file_count(&self) -> usize {
        let tracked: HashSet<&str> = self
            .staged
            .lines()
            .chain(self.unstaged.lines())
            .filter(|l| l.starts_with("diff --git "))
            .collect();
        tracked.len() + self.untracked.len()
    }

    /// Added and removed line counts, ignoring the `+++`/`---` file headers.
    pub fn line_stats(&self) -> (usize, usize) {
        let mut additions = 0;
        let mut deletions = 0;
        for line in self.staged.lines().chain(self.unstaged.lines()) {
            if line.starts_with("+++") || line.starts_with("---") {
                continue;
            }
            if line.starts_with('+') {
                additions += 1;
            } else if line.starts_with('-') {
                deletions += 1;
            }
        }
        (additions, deletions)
    }

    /// Staged then unstaged diff text, capped at [`MAX_DIFF_LENGTH`].
    pub fn prompt_text(&self) -> PromptDiff {
        let mut text = String::with_capacity(self.staged.len() + self.unstaged.len() + 1);
        text.push_str(self.staged.trim_end());
        if !text.is_empty() && !self.unstaged.trim().is_empty() {
            text.push('\n');
        }
        text.push_str(self.unstaged.trim_end());

        let truncated = text.len() > MAX_DIFF_LENGTH;
        if truncated {
            let mut end = MAX_DIFF_LENGTH;
            while end > 0 && !text.is_char_boundary(end) {
                end -= 1;
            }
            text.truncate(end);
        }

        PromptDiff { text, truncated }
    }
}
