//! Formatting checks for commit messages.
//!
//! Findings are advisory: the review loop shows them next to the message
//! but never blocks acceptance on them.

use std::fmt;

use regex_lite::Regex;

use crate::commit::prompt::CONVENTIONAL_TYPES;

pub const MAX_SUBJECT_LENGTH: usize = 50;
pub const MAX_BODY_LINE_LENGTH: usize = 72;

/// Conventional Commits header: `type(scope)!: description`.
const CONVENTIONAL_PATTERN: &str = r"^(\w+)(?:\(([^)]+)\))?(!)?\s*:\s*(.*)$";

/// Parsed Conventional Commits prefix of a subject line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalPrefix {
    pub commit_type: String,
    pub scope: Option<String>,
    pub breaking: bool,
    pub description: String,
}

/// Parse a Conventional Commits subject. Returns `None` when the subject
/// has no known type prefix.
pub fn parse_conventional(subject: &str) -> Option<ConventionalPrefix> {
    let re = Regex::new(CONVENTIONAL_PATTERN).ok()?;
    let caps = re.captures(subject)?;

    let commit_type = caps.get(1)?.as_str().to_lowercase();
    if !CONVENTIONAL_TYPES.contains(&commit_type.as_str()) {
        return None;
    }

    Some(ConventionalPrefix {
        commit_type,
        scope: caps.get(2).map(|m| m.as_str().to_string()),
        breaking: caps.get(3).is_some(),
        description: caps.get(4).map(|m| m.as_str().to_string()).unwrap_or_default(),
    })
}

/// A single formatting problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintWarning {
    EmptySubject,
    SubjectTooLong(usize),
    TrailingPeriod,
    NotCapitalized,
    MissingBlankLine,
    BodyLineTooLong { line: usize, length: usize },
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintWarning::EmptySubject => write!(f, "Subject line is empty"),
            LintWarning::SubjectTooLong(len) => write!(
                f,
                "Subject is {len} characters (limit {MAX_SUBJECT_LENGTH})"
            ),
            LintWarning::TrailingPeriod => write!(f, "Subject ends with a period"),
            LintWarning::NotCapitalized => write!(f, "Subject does not start with a capital letter"),
            LintWarning::MissingBlankLine => {
                write!(f, "Body is not separated from the subject by a blank line")
            }
            LintWarning::BodyLineTooLong { line, length } => write!(
                f,
                "Line {line} is {length} characters (wrap at {MAX_BODY_LINE_LENGTH})"
            ),
        }
    }
}

/// Check a message against the subject/body conventions.
pub fn lint_message(message: &str) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    let mut lines = message.lines();

    let subject = lines.next().unwrap_or("").trim_end();
    if subject.trim().is_empty() {
        warnings.push(LintWarning::EmptySubject);
        return warnings;
    }

    let subject_len = subject.chars().count();
    if subject_len > MAX_SUBJECT_LENGTH {
        warnings.push(LintWarning::SubjectTooLong(subject_len));
    }

    if subject.ends_with('.') {
        warnings.push(LintWarning::TrailingPeriod);
    }

    // A conventional prefix is lowercase by convention; only the plain form
    // must be capitalized.
    if parse_conventional(subject).is_none()
        && subject.chars().next().is_some_and(|c| c.is_lowercase())
    {
        warnings.push(LintWarning::NotCapitalized);
    }

    if let Some(second) = lines.next()
        && !second.trim().is_empty()
    {
        warnings.push(LintWarning::MissingBlankLine);
    }

    for (idx, line) in message.lines().enumerate().skip(1) {
        let length = line.chars().count();
        if length > MAX_BODY_LINE_LENGTH {
            warnings.push(LintWarning::BodyLineTooLong {
                line: idx + 1,
                length,
            });
        }
    }

    warnings
}
