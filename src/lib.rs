//! pushcode - stage, commit and push with a generated commit message.
//!
//! # Overview
//!
//! pushcode collects the pending working-tree changes, asks Gemini for a
//! commit message, lets the operator accept, edit or regenerate it, then
//! stages, commits and (after confirmation) pushes. With `--dry-run` every
//! mutating git command is announced instead of executed.

pub mod commit;
pub mod config;
pub mod editor;
pub mod error;
pub mod git;
pub mod llm;
pub mod operator;
pub mod review;
pub mod workflow;

// Re-export commonly used types
pub use commit::{LintWarning, WorkingTreeDiff};
pub use config::GeminiConfig;
pub use editor::{ExternalEditor, MessageEditor};
pub use error::{ConfigError, EditorError, GenerationError, GitError, WorkflowError};
pub use git::{GitCli, VersionControl};
pub use llm::{GeminiClient, TextGenerator};
pub use operator::{Operator, TerminalOperator};
pub use review::{ReviewChoice, ReviewOutcome};
pub use workflow::{Stage, Workflow, WorkflowOutcome};
