//! Prompt construction for AI-generated commit messages.

use crate::commit::diff::WorkingTreeDiff;

/// Conventional Commits types the model may use as a subject prefix.
pub const CONVENTIONAL_TYPES: [&str; 11] = [
    "feat", "fix", "chore", "docs", "refactor", "style", "test", "build", "ci", "perf", "revert",
];

/// Untracked paths listed in the prompt; the rest are summarised in one line.
pub const MAX_UNTRACKED_LISTED: usize = 50;

/// Build the fixed instructional prompt with the diff embedded.
///
/// The same diff always yields the same prompt, so regeneration only
/// varies by the model's sampling.
pub fn build_commit_prompt(diff: &WorkingTreeDiff) -> String {
    let prompt_diff = diff.prompt_text();

    let truncation_note = if prompt_diff.truncated {
        "\n\nNote: The diff was truncated due to size. Focus on the visible changes."
    } else {
        ""
    };

    let untracked_section = if diff.untracked.is_empty() {
        String::new()
    } else {
        let mut files = diff
            .untracked
            .iter()
            .take(MAX_UNTRACKED_LISTED)
            .map(|p| format!("- {p}"))
            .collect::<Vec<_>>()
            .join("\n");
        let hidden = diff.untracked.len().saturating_sub(MAX_UNTRACKED_LISTED);
        if hidden > 0 {
            files.push_str(&format!("\n- ... and {hidden} more"));
        }
        format!("\n\n## New Untracked Files\n{files}")
    };

    let types = CONVENTIONAL_TYPES
        .iter()
        .map(|t| format!("{t}:"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You are an experienced software engineer writing a concise, clear Git commit message.
Read the diff below and write one commit message that follows these rules.

## Subject Line
- At most 50 characters.
- Start with a capital letter.
- Do NOT end with a period.
- Use the imperative mood ("Add feature", "Fix bug", "Refactor parser").
- When it fits, use a Conventional Commits type prefix: {types}

## Body (optional)
- Separate it from the subject with one blank line.
- Wrap lines at 72 characters.
- Explain WHAT the change does and WHY it was needed, not HOW.
- Use bullet points for multiple points, separated by blank lines.

## Diff
```diff
{diff_text}
```{truncation_note}{untracked_section}

Generate only the commit message."#,
        diff_text = prompt_diff.text,
    )
}
