//! Error types for the LLM client.

use thiserror::Error;

/// Result type for LLM client operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// LLM client errors.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Configuration error (no API keys, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Provider refused the request because of quota or rate limits
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Any other non-2xx response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),

    /// The provider answered but produced no text
    #[error("Empty response from model")]
    EmptyResponse,
}

impl LlmError {
    /// Classify a failed HTTP response.
    ///
    /// Gemini reports exhausted quota as 429 with `RESOURCE_EXHAUSTED`, some
    /// proxies return other statuses with a quota message in the body.
    pub(crate) fn from_status(status: u16, body: String) -> Self {
        let lower = body.to_lowercase();
        if status == 429 || lower.contains("resource_exhausted") || lower.contains("quota") {
            LlmError::RateLimited(body)
        } else {
            LlmError::Api {
                status,
                message: body,
            }
        }
    }

    /// True when retrying later (or with another key) may succeed.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, LlmError::RateLimited(_))
    }
}
