// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use youtube_client::{ContentSource, VideoContent, VideoId, YoutubeError};

use super::{BaseAI, BaseContentSource, ServerDeps};
use crate::domains::auth::JwtService;
use crate::stores::MemoryStore;

// =============================================================================
// Mock AI
// =============================================================================

enum MockReply {
    Text(String),
    Error(String),
}

/// Replies are consumed in order; once they run out the default reply is used.
pub struct MockAI {
    replies: Arc<Mutex<Vec<MockReply>>>,
    default_reply: String,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            default_reply: String::new(),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a text reply.
    pub fn with_response(self, text: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Text(text.to_string()));
        self
    }

    /// Queue a failure with the given message.
    pub fn with_error(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Error(message.to_string()));
        self
    }

    /// Reply used after the queue is drained.
    pub fn with_default_response(mut self, text: &str) -> Self {
        self.default_reply = text.to_string();
        self
    }

    /// Get all prompts that were sent
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Ok(self.default_reply.clone());
        }
        match replies.remove(0) {
            MockReply::Text(text) => Ok(text),
            MockReply::Error(message) => Err(anyhow::anyhow!(message)),
        }
    }
}

// =============================================================================
// Mock Content Source
// =============================================================================

/// Serves the same content for every video, or fails with an error log.
pub struct MockContentSource {
    content: Option<VideoContent>,
    error_log: Vec<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockContentSource {
    pub fn transcript(text: &str) -> Self {
        Self {
            content: Some(VideoContent {
                text: text.to_string(),
                source: ContentSource::Transcript,
                title: None,
            }),
            error_log: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn metadata(title: &str, text: &str) -> Self {
        Self {
            content: Some(VideoContent {
                text: text.to_string(),
                source: ContentSource::Metadata,
                title: Some(title.to_string()),
            }),
            error_log: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn unavailable(error_log: &[&str]) -> Self {
        Self {
            content: None,
            error_log: error_log.iter().map(|s| s.to_string()).collect(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Video ids requested so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseContentSource for MockContentSource {
    async fn fetch_content(&self, video_id: &VideoId) -> youtube_client::Result<VideoContent> {
        self.calls.lock().unwrap().push(video_id.to_string());
        match &self.content {
            Some(content) => Ok(content.clone()),
            None => Err(YoutubeError::ContentUnavailable {
                error_log: self.error_log.clone(),
            }),
        }
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

pub const TEST_JWT_SECRET: &str = "test-secret-for-video-quiz";
pub const TEST_JWT_ISSUER: &str = "video-quiz-test";

/// Builder for ServerDeps wired to in-memory and mock services.
pub struct TestDependencies {
    pub store: Arc<MemoryStore>,
    pub ai: Option<Arc<MockAI>>,
    pub content: Arc<MockContentSource>,
    pub jwt_service: Arc<JwtService>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            ai: Some(Arc::new(MockAI::new())),
            content: Arc::new(MockContentSource::unavailable(&["transcript: not mocked"])),
            jwt_service: Arc::new(JwtService::new(TEST_JWT_SECRET, TEST_JWT_ISSUER.to_string())),
        }
    }

    pub fn with_ai(mut self, ai: MockAI) -> Self {
        self.ai = Some(Arc::new(ai));
        self
    }

    pub fn without_ai(mut self) -> Self {
        self.ai = None;
        self
    }

    pub fn with_content(mut self, content: MockContentSource) -> Self {
        self.content = Arc::new(content);
        self
    }

    pub fn into_server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.store.clone(),
            self.ai.clone().map(|ai| ai as Arc<dyn BaseAI>),
            self.content.clone(),
            self.jwt_service.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
