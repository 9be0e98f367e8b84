// AI implementation backed by the OpenAI-compatible LLM client
//
// This is the infrastructure implementation of BaseAI.
// Business logic (what to prompt for) lives in domain layers.

use anyhow::Result;
use async_trait::async_trait;
use llm_client::{LlmClient, LlmError};

use super::BaseAI;

#[async_trait]
impl BaseAI for LlmClient {
    /// A blank completion comes back as `Ok("")` so callers can apply
    /// their own empty-reply handling.
    async fn complete(&self, prompt: &str) -> Result<String> {
        match LlmClient::complete(self, prompt).await {
            Ok(text) => Ok(text),
            Err(LlmError::EmptyResponse) => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }
}

/// True when an AI failure came from quota or rate limiting.
///
/// Typed client errors are checked first; anything else falls back to the
/// provider's wording.
pub fn is_rate_limit_error(error: &anyhow::Error) -> bool {
    if let Some(llm) = error.downcast_ref::<LlmError>() {
        return llm.is_rate_limited();
    }
    let text = error.to_string().to_lowercase();
    text.contains("quota") || text.contains("429")
}
