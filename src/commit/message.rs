//! Commit message generation via the text-generation service.

use tracing::debug;

use crate::commit::diff::WorkingTreeDiff;
use crate::commit::prompt::build_commit_prompt;
use crate::error::GenerationError;
use crate::llm::TextGenerator;

/// Generate a commit message for `diff`.
///
/// One request per call. The raw response is cleaned with
/// [`clean_message`]; a response that is empty after cleaning is an error.
pub async fn generate_commit_message(
    diff: &WorkingTreeDiff,
    generator: &dyn TextGenerator,
) -> Result<String, GenerationError> {
    let prompt = build_commit_prompt(diff);
    debug!("Commit prompt length: {} chars", prompt.len());

    let raw = generator.generate(&prompt).await?;
    let message = clean_message(&raw);

    if message.is_empty() {
        debug!("Raw response: {}", raw);
        return Err(GenerationError::EmptyResponse);
    }

    Ok(message)
}

/// Trim the response and unwrap it if the model fenced it in a code block.
pub fn clean_message(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Some(rest) = trimmed.strip_prefix("```")
        && let Some(inner) = rest.strip_suffix("```")
    {
        // Drop an info string such as ```text or ```git on the opening line.
        let body = match inner.split_once('\n') {
            Some((first, remainder)) if !first.trim().contains(' ') => remainder,
            _ => inner,
        };
        return body.trim().to_string();
    }

    trimmed.to_string()
}
