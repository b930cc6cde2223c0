//! Error types for pushcode modules using thiserror.

use thiserror::Error;

/// Fatal startup errors: nothing in the workflow runs after one of these.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Gemini API key not found. Set GOOGLE_API_KEY (or GEMINI_API_KEY) in your environment or in a .env file in the project root"
    )]
    MissingApiKey,

    #[error("git executable not found on PATH")]
    GitNotInstalled,

    #[error("Not a git repository (or any parent directory): {0}")]
    NotARepository(#[source] git2::Error),

    #[error("Repository has no working directory (bare repository?)")]
    BareRepository,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Errors from git invocations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to run `{command}`: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {}: {stderr}",
        code.map_or("unknown status".to_string(), |c| format!("code {c}")))]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Errors from the text-generation service.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Gemini request failed: {0}")]
    RequestFailed(#[source] reqwest::Error),

    #[error("Gemini request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Gemini API returned HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    #[error("Gemini returned a response that could not be parsed: {0}")]
    InvalidResponse(String),

    #[error("Gemini blocked the prompt: {0}")]
    Blocked(String),

    #[error("Gemini returned no usable text")]
    EmptyResponse,
}

/// Errors from an external editor session.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Editor '{0}' not found on PATH")]
    NotFound(String),

    #[error("EDITOR is set but empty")]
    EmptyCommand,

    #[error("EDITOR has an unclosed quote: {0}")]
    UnclosedQuote(String),

    #[error("Failed to start editor '{program}': {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Editor '{program}' exited with {}",
        code.map_or("a signal".to_string(), |c| format!("code {c}")))]
    NonZeroExit { program: String, code: Option<i32> },

    #[error("Temporary message file error: {0}")]
    TempFile(#[source] std::io::Error),
}

/// Errors that end the workflow without an operator decision.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Terminal prompt failed: {0}")]
    Prompt(#[from] std::io::Error),
}
