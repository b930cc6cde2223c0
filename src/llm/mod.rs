//! Remote text generation.

pub mod gemini;

use async_trait::async_trait;

use crate::error::GenerationError;

pub use gemini::GeminiClient;

/// A service that turns a prompt into text.
///
/// This abstraction allows driving the workflow with a fake in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send one prompt and return the raw response text.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
