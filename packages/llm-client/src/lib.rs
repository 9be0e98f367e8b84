//! OpenAI-compatible chat completions client.
//!
//! Talks to any endpoint that speaks the `/chat/completions` wire format. The
//! default base URL is Gemini's OpenAI compatibility layer, and requests rotate
//! through a pool of API keys.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm_client::{LlmClient, ChatRequest, Message};
//!
//! let client = LlmClient::from_env()?;
//!
//! let answer = client.complete("Summarise this transcript: ...").await?;
//!
//! let response = client.chat_completion(
//!     ChatRequest::new(client.model())
//!         .message(Message::system("You write quizzes."))
//!         .message(Message::user("Three questions on photosynthesis")),
//! ).await?;
//! ```

pub mod error;
pub mod keys;
pub mod types;

pub use error::{LlmError, Result};
pub use keys::KeyPool;
pub use types::*;

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Gemini's OpenAI-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Default model for quiz generation and classification.
pub const DEFAULT_MODEL: &str = "gemini-flash-latest";

/// Chat completions client.
#[derive(Clone)]
pub struct LlmClient {
    http_client: Client,
    keys: KeyPool,
    base_url: String,
    model: String,
}

impl LlmClient {
    /// Create a client over the given key pool.
    pub fn new(keys: KeyPool) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            keys,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Create from `GEMINI_API_KEYS` (comma-separated) or `GEMINI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let list = std::env::var("GEMINI_API_KEYS").ok();
        let single = std::env::var("GEMINI_API_KEY").ok();
        let keys = KeyPool::from_list(list.as_deref(), single.as_deref())
            .ok_or_else(|| LlmError::Config("GEMINI_API_KEYS / GEMINI_API_KEY not set".into()))?;
        Ok(Self::new(keys))
    }

    /// Set a custom base URL (OpenAI, proxies, local servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model used by [`LlmClient::complete`].
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Single-turn completion with the configured model.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest::new(self.model.clone()).message(Message::user(prompt));
        Ok(self.chat_completion(request).await?.content)
    }

    /// Chat completion.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.keys.pick())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, model = %request.model, "LLM request failed");
                LlmError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "LLM API error");
            return Err(LlmError::from_status(status.as_u16(), error_text));
        }

        let raw: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let content = raw
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            response_length = content.len(),
            "LLM chat completion"
        );

        Ok(ChatResponse {
            content,
            usage: raw.usage,
        })
    }
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("keys", &self.keys)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::ServerGuard) -> LlmClient {
        LlmClient::new(KeyPool::new(["k-test"]).unwrap())
            .with_base_url(server.url())
            .with_model("test-model")
    }

    #[test]
    fn test_client_builder() {
        let client = LlmClient::new(KeyPool::new(["k"]).unwrap())
            .with_base_url("https://custom.api.com/v1/")
            .with_model("gpt-4o-mini");

        assert_eq!(client.base_url(), "https://custom.api.com/v1");
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[tokio::test]
    async fn complete_returns_trimmed_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer k-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"content":"  hello  "}}],
                    "usage":{"prompt_tokens":3,"completion_tokens":1,"total_tokens":4}}"#,
            )
            .create_async()
            .await;

        let answer = client_for(&server).complete("hi").await.unwrap();

        assert_eq!(answer, "hello");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn quota_errors_map_to_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body(r#"{"error":{"message":"Quota exceeded"}}"#)
            .create_async()
            .await;

        let err = client_for(&server).complete("hi").await.unwrap_err();
        assert!(err.is_rate_limited());
    }

    #[tokio::test]
    async fn blank_content_is_an_empty_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"content":"   "}}]}"#)
            .create_async()
            .await;

        let err = client_for(&server).complete("hi").await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[tokio::test]
    async fn server_errors_keep_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("internal")
            .create_async()
            .await;

        match client_for(&server).complete("hi").await.unwrap_err() {
            LlmError::Api { status, .. } => assert_eq!(status, 500),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
