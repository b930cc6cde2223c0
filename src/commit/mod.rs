//! AI-generated commit messages: diff model, prompt, generation and lint.

pub mod diff;
pub mod lint;
pub mod message;
pub mod prompt;

pub use diff::{MAX_DIFF_LENGTH, PromptDiff, WorkingTreeDiff};
pub use lint::{LintWarning, lint_message, parse_conventional};
pub use message::{clean_message, generate_commit_message};
pub use prompt::build_commit_prompt;
