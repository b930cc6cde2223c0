//! External editor sessions for commit messages.

use std::fs;
use std::io::Write;
use std::process::Command;

use tempfile::TempPath;
use tracing::debug;

use crate::error::EditorError;

/// Something that lets the operator rewrite a message.
pub trait MessageEditor {
    /// Return the edited message. Errors leave the caller's message untouched.
    fn edit(&self, current: &str) -> Result<String, EditorError>;
}

/// Runs the operator's `$EDITOR` on a temporary file.
pub struct ExternalEditor {
    command: String,
}

impl ExternalEditor {
    /// `command` is a full command line such as `nano` or `code --wait`.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Split the command line into program and leading arguments.
    fn program_and_args(&self) -> Result<(String, Vec<String>), EditorError> {
        let mut parts = split_command_line(&self.command)?.into_iter();
        let program = parts.next().ok_or(EditorError::EmptyCommand)?;
        Ok((program, parts.collect()))
    }
}

/// Split a command line on whitespace, honouring single and double quotes
/// and backslash escapes outside single quotes.
///
/// Covers editor settings such as `"/Applications/Sublime Text.app/subl" -w`;
/// variable expansion and other shell syntax are not interpreted.
fn split_command_line(line: &str) -> Result<Vec<String>, EditorError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('"'), '\\') | (None, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_word = true;
            }
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(EditorError::UnclosedQuote(line.to_string()));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

impl MessageEditor for ExternalEditor {
    fn edit(&self, current: &str) -> Result<String, EditorError> {
        let (program, args) = self.program_and_args()?;
        let resolved = which::which(&program).map_err(|_| EditorError::NotFound(program.clone()))?;

        // Removed when `buffer` drops, whichever way this function returns.
        let buffer = write_buffer(current)?;
        debug!("Opening {} with {}", buffer.display(), resolved.display());

        let status = Command::new(&resolved)
            .args(&args)
            .arg(&*buffer)
            .status()
            .map_err(|source| EditorError::SpawnFailed {
                program: program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(EditorError::NonZeroExit {
                program,
                code: status.code(),
            });
        }

        let edited = fs::read_to_string(&*buffer).map_err(EditorError::TempFile)?;
        Ok(edited.trim().to_string())
    }
}

/// Write `contents` to a fresh temp file that is deleted when the returned
/// path is dropped.
fn write_buffer(contents: &str) -> Result<TempPath, EditorError> {
    let mut file = tempfile::Builder::new()
        .prefix("COMMIT_EDITMSG")
        .suffix(".txt")
        .tempfile()
        .map_err(EditorError::TempFile)?;

    file.write_all(contents.as_bytes())
        .map_err(EditorError::TempFile)?;
    file.flush().map_err(EditorError::TempFile)?;

    // Close our handle so editors that replace the file on save still work.
    Ok(file.into_temp_path())
}
