//! Startup configuration read from the environment.
//!
//! Everything here is resolved once in `main` and handed to the components
//! that need it; nothing reads the environment after startup.

use std::env;
use std::fmt;
use std::time::Duration;

use tracing::warn;

use crate::error::ConfigError;

/// Primary API key variable.
pub const API_KEY_ENV_VAR: &str = "GOOGLE_API_KEY";

/// Accepted alternative for the API key.
pub const API_KEY_FALLBACK_ENV_VAR: &str = "GEMINI_API_KEY";

/// Model override.
pub const MODEL_ENV_VAR: &str = "PUSHCODE_MODEL";

/// Base URL override (proxies, tests).
pub const API_URL_ENV_VAR: &str = "PUSHCODE_API_URL";

/// Request timeout override, in seconds.
pub const TIMEOUT_ENV_VAR: &str = "PUSHCODE_TIMEOUT";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_EDITOR: &str = "nano";

/// Connection settings for the Gemini API.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

// Never print the key.
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Build the configuration from environment variables.
    ///
    /// `model_override` (from `--model`) wins over `PUSHCODE_MODEL`.
    pub fn from_env(model_override: Option<&str>) -> Result<Self, ConfigError> {
        let api_key = non_empty_var(API_KEY_ENV_VAR)
            .or_else(|| non_empty_var(API_KEY_FALLBACK_ENV_VAR))
            .ok_or(ConfigError::MissingApiKey)?;

        let model = model_override
            .map(str::to_string)
            .or_else(|| non_empty_var(MODEL_ENV_VAR))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = non_empty_var(API_URL_ENV_VAR)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api_key,
            model,
            base_url,
            timeout: get_timeout(),
        })
    }
}

/// Editor command line from `EDITOR`, defaulting to nano.
pub fn editor_command() -> String {
    non_empty_var("EDITOR").unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

/// Get the configured request timeout.
///
/// Logs a warning if the environment variable is set but contains
/// an invalid value (non-numeric or negative).
fn get_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
