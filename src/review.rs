//! Operator review of a generated commit message.
//!
//! [`Review`] is the state machine and does no I/O. [`run_review`] drives it
//! with an [`Operator`], an editor and the generator.

use tracing::debug;

use crate::commit::{WorkingTreeDiff, generate_commit_message, lint_message};
use crate::editor::MessageEditor;
use crate::error::{EditorError, GenerationError, WorkflowError};
use crate::llm::TextGenerator;
use crate::operator::Operator;

/// Review loop states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    Generated,
    Editing,
    Regenerating,
    Accepted,
    Cancelled,
}

impl ReviewState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ReviewState::Accepted | ReviewState::Cancelled)
    }
}

/// A validated menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewChoice {
    Accept,
    Edit,
    Regenerate,
    Cancel,
}

impl ReviewChoice {
    /// Menu line shown at the prompt.
    pub const MENU: &'static str = "Options: (a)ccept and commit, (e)dit, (r)e-generate, (c)ancel";

    /// Parse operator input. Accepts the single letter or the full word,
    /// case-insensitively; anything else is `None`.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "a" | "accept" => Some(ReviewChoice::Accept),
            "e" | "edit" => Some(ReviewChoice::Edit),
            "r" | "regenerate" | "re-generate" => Some(ReviewChoice::Regenerate),
            "c" | "cancel" => Some(ReviewChoice::Cancel),
            _ => None,
        }
    }
}

/// What the driver has to do after a choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewAction {
    /// Open the editor on the current message, then call [`Review::edited`].
    Edit,
    /// Generate again, then call [`Review::regenerated`].
    Regenerate,
    /// Review is over.
    Done,
}

/// Result of an edit session as seen by the operator.
#[derive(Debug)]
pub enum EditOutcome {
    Changed,
    Unchanged,
    /// The operator emptied the buffer; the previous message is kept.
    Blank,
    /// The editor failed; the previous message is kept.
    Failed(EditorError),
}

/// How the review ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    Accepted(String),
    Cancelled,
}

/// The review state machine. Exactly one message is current at any time.
#[derive(Debug, Clone)]
pub struct Review {
    state: ReviewState,
    message: String,
    /// State to fall back to when a regeneration fails.
    resume: ReviewState,
}

impl Review {
    pub fn new(message: String) -> Self {
        Self {
            state: ReviewState::Generated,
            message,
            resume: ReviewState::Generated,
        }
    }

    pub fn state(&self) -> ReviewState {
        self.state
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Apply an operator choice. Ignored once the review has ended.
    pub fn choose(&mut self, choice: ReviewChoice) -> ReviewAction {
        if self.state.is_terminal() {
            return ReviewAction::Done;
        }

        match choice {
            ReviewChoice::Accept => {
                self.state = ReviewState::Accepted;
                ReviewAction::Done
            }
            ReviewChoice::Cancel => {
                self.state = ReviewState::Cancelled;
                ReviewAction::Done
            }
            ReviewChoice::Edit => {
                self.state = ReviewState::Editing;
                ReviewAction::Edit
            }
            ReviewChoice::Regenerate => {
                self.resume = self.state;
                self.state = ReviewState::Regenerating;
                ReviewAction::Regenerate
            }
        }
    }

    /// Record the result of an edit session.
    pub fn edited(&mut self, result: Result<String, EditorError>) -> EditOutcome {
        match result {
            Ok(text) if text.trim().is_empty() => EditOutcome::Blank,
            Ok(text) if text == self.message => EditOutcome::Unchanged,
            Ok(text) => {
                self.message = text;
                EditOutcome::Changed
            }
            Err(e) => EditOutcome::Failed(e),
        }
    }

    /// Record the result of a regeneration. On failure the message and the
    /// displayed state are what they were before the choice.
    pub fn regenerated(
        &mut self,
        result: Result<String, GenerationError>,
    ) -> Result<(), GenerationError> {
        match result {
            Ok(message) => {
                self.message = message;
                Ok(())
            }
            Err(e) => {
                self.state = self.resume;
                Err(e)
            }
        }
    }

    /// The final outcome, once the state is terminal.
    pub fn outcome(&self) -> Option<ReviewOutcome> {
        match self.state {
            ReviewState::Accepted => Some(ReviewOutcome::Accepted(self.message.clone())),
            ReviewState::Cancelled => Some(ReviewOutcome::Cancelled),
            _ => None,
        }
    }
}

/// Show the message and loop on operator choices until accept or cancel.
pub async fn run_review(
    message: String,
    diff: &WorkingTreeDiff,
    operator: &mut dyn Operator,
    editor: &dyn MessageEditor,
    generator: &dyn TextGenerator,
) -> Result<ReviewOutcome, WorkflowError> {
    let mut review = Review::new(message);

    loop {
        if let Some(outcome) = review.outcome() {
            return Ok(outcome);
        }

        print_message(review.message());
        let choice = operator.choose()?;
        debug!("Review choice {:?} in state {:?}", choice, review.state());

        match review.choose(choice) {
            ReviewAction::Done => {}
            ReviewAction::Edit => match review.edited(editor.edit(review.message())) {
                EditOutcome::Changed => println!("Message edited."),
                EditOutcome::Unchanged => println!("Message unchanged."),
                EditOutcome::Blank => println!("Edited message was empty. Keeping current message."),
                EditOutcome::Failed(e) => {
                    println!("Error: {e}. Keeping current message.");
                }
            },
            ReviewAction::Regenerate => {
                println!("Re-generating commit message...");
                let result = generate_commit_message(diff, generator).await;
                if let Err(e) = review.regenerated(result) {
                    println!("Could not re-generate ({e}). Keeping current message.");
                }
            }
        }
    }
}

fn print_message(message: &str) {
    println!();
    println!("--- Generated Commit Message ---");
    println!("{message}");
    println!("--------------------------------");
    for warning in lint_message(message) {
        println!("  [WARN] {warning}");
    }
}
