//! Interactive operator prompts.

use std::io;

use dialoguer::{Confirm, Input};

use crate::review::ReviewChoice;

/// The person at the terminal.
///
/// Every blocking question the workflow asks goes through here, so the
/// workflow can be driven by a script in tests.
pub trait Operator {
    /// Ask for a review menu choice, re-prompting until it is valid.
    fn choose(&mut self) -> io::Result<ReviewChoice>;

    /// Ask a yes/no question.
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Prompts on the controlling terminal with dialoguer.
#[derive(Debug, Default)]
pub struct TerminalOperator;

impl Operator for TerminalOperator {
    fn choose(&mut self) -> io::Result<ReviewChoice> {
        loop {
            let input: String = Input::new()
                .with_prompt(ReviewChoice::MENU)
                .validate_with(|input: &String| -> Result<(), &str> {
                    ReviewChoice::parse(input)
                        .map(|_| ())
                        .ok_or("Invalid option.")
                })
                .interact_text()
                .map_err(io::Error::other)?;

            if let Some(choice) = ReviewChoice::parse(&input) {
                return Ok(choice);
            }
        }
    }

    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        Confirm::new()
            .with_prompt(question)
            .interact()
            .map_err(io::Error::other)
    }
}
