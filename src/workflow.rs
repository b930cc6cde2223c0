//! The commit pipeline: diff, generate, review, stage, commit, push.
//!
//! Every external failure becomes a yes/no retry question; declining ends
//! the run cleanly. Only terminal I/O errors escape as `Err`.

use std::fmt;

use tracing::{debug, info};

use crate::commit::{WorkingTreeDiff, generate_commit_message};
use crate::editor::MessageEditor;
use crate::error::{GitError, WorkflowError};
use crate::git::VersionControl;
use crate::llm::TextGenerator;
use crate::operator::Operator;
use crate::review::{ReviewOutcome, run_review};

/// Pipeline stage, used to report where a run was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Diff,
    Generate,
    Stage,
    Commit,
    Push,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Diff => write!(f, "diff"),
            Stage::Generate => write!(f, "generate"),
            Stage::Stage => write!(f, "stage"),
            Stage::Commit => write!(f, "commit"),
            Stage::Push => write!(f, "push"),
        }
    }
}

/// How a run ended. All of these are clean exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// Working tree was clean.
    NoChanges,
    /// Operator cancelled during review.
    Cancelled,
    /// Operator declined to retry a failed stage.
    Abandoned(Stage),
    /// Committed; operator declined to push.
    Committed,
    /// Committed and pushed.
    Pushed,
}

/// Wires the pipeline's collaborators together.
pub struct Workflow<'a> {
    vcs: &'a dyn VersionControl,
    generator: &'a dyn TextGenerator,
    editor: &'a dyn MessageEditor,
}

impl<'a> Workflow<'a> {
    pub fn new(
        vcs: &'a dyn VersionControl,
        generator: &'a dyn TextGenerator,
        editor: &'a dyn MessageEditor,
    ) -> Self {
        Self {
            vcs,
            generator,
            editor,
        }
    }

    /// Run the pipeline to completion.
    pub async fn run(&self, operator: &mut dyn Operator) -> Result<WorkflowOutcome, WorkflowError> {
        let (diff, message) = loop {
            // ── Stage 1: Diff ──
            println!("Getting git diff...");
            let diff = match self.vcs.diff() {
                Ok(diff) => diff,
                Err(e) => {
                    println!("Failed to get git diff: {e}");
                    if operator.confirm("Would you like to try again?")? {
                        continue;
                    }
                    return Ok(WorkflowOutcome::Abandoned(Stage::Diff));
                }
            };

            if diff.is_empty() {
                println!("No changes detected. Exiting.");
                return Ok(WorkflowOutcome::NoChanges);
            }
            print_diff_summary(&diff);

            // ── Stage 2: Generate ──
            println!("Generating commit message with Gemini...");
            match generate_commit_message(&diff, self.generator).await {
                Ok(message) => break (diff, message),
                Err(e) => {
                    println!("Error generating commit message: {e}");
                    if operator.confirm("Failed to generate commit message. Try again?")? {
                        continue;
                    }
                    return Ok(WorkflowOutcome::Abandoned(Stage::Generate));
                }
            }
        };

        // ── Stage 3: Review ──
        let message =
            match run_review(message, &diff, operator, self.editor, self.generator).await? {
                ReviewOutcome::Accepted(message) => message,
                ReviewOutcome::Cancelled => {
                    println!("Commit generation cancelled. Exiting.");
                    return Ok(WorkflowOutcome::Cancelled);
                }
            };

        // ── Stage 4: Stage and commit ──
        println!("Staging all changes...");
        if !retry_step(operator, "staging", || self.vcs.stage_all())? {
            return Ok(WorkflowOutcome::Abandoned(Stage::Stage));
        }
        if !self.vcs.is_dry_run() {
            println!("Changes staged.");
        }

        println!("Committing changes...");
        if !retry_step(operator, "committing", || self.vcs.commit(&message))? {
            return Ok(WorkflowOutcome::Abandoned(Stage::Commit));
        }
        if !self.vcs.is_dry_run() {
            println!("Changes committed successfully.");
        }
        info!("Committed: {}", message.lines().next().unwrap_or_default());

        // ── Stage 5: Push gate ──
        if !operator.confirm("Commit successful. Do you want to push to remote?")? {
            println!("Push cancelled. Exiting.");
            return Ok(WorkflowOutcome::Committed);
        }

        println!("Pushing changes...");
        if !retry_step(operator, "pushing", || self.vcs.push())? {
            println!("Push abandoned. The commit remains local.");
            return Ok(WorkflowOutcome::Abandoned(Stage::Push));
        }

        if self.vcs.is_dry_run() {
            println!("[DRY RUN] Would have pushed changes.");
            println!("--- pushcode dry run completed ---");
        } else {
            println!("Changes pushed successfully.");
            println!("--- pushcode completed ---");
        }
        Ok(WorkflowOutcome::Pushed)
    }
}

/// Run `step` until it succeeds or the operator declines a retry.
///
/// Returns `Ok(false)` when the operator gives up.
fn retry_step<F>(operator: &mut dyn Operator, what: &str, mut step: F) -> Result<bool, WorkflowError>
where
    F: FnMut() -> Result<(), GitError>,
{
    loop {
        match step() {
            Ok(()) => return Ok(true),
            Err(e) => {
                println!("Failed {what} changes: {e}");
                if !operator.confirm(&format!("Would you like to try {what} again?"))? {
                    return Ok(false);
                }
                debug!("Retrying {}", what);
            }
        }
    }
}

fn print_diff_summary(diff: &WorkingTreeDiff) {
    let (additions, deletions) = diff.line_stats();
    println!(
        "Git diff obtained: {} file(s), +{} -{}",
        diff.file_count(),
        additions,
        deletions
    );
}
