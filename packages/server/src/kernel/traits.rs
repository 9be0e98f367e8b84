// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (classification, scoring, caching policy) lives in the domains
// and is written against these traits.
//
// Naming convention: Base* for service traits, *Store for persistence.

use anyhow::Result;
use async_trait::async_trait;
use youtube_client::{VideoContent, VideoId};

use crate::common::{AptitudeQuestionId, CustomQuizAttemptId, CustomQuizId, UserId};
use crate::domains::aptitude::models::{AptitudeAnswer, AptitudeLevel, AptitudeQuestion};
use crate::domains::custom_quiz::models::{CustomQuiz, CustomQuizAttempt};
use crate::domains::quiz::models::{QuizHistoryEntry, QuizKey, QuizScore, VideoQuiz};

// =============================================================================
// AI Trait (Infrastructure - Generic LLM capabilities)
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Complete a prompt with an LLM (returns raw text response)
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Complete a prompt expecting JSON (returns raw text; parse with
    /// `parse_llm_json` in calling code)
    async fn complete_json(&self, prompt: &str) -> Result<String> {
        self.complete(prompt).await
    }
}

// =============================================================================
// Content Source Trait (Infrastructure - video text retrieval)
// =============================================================================

#[async_trait]
pub trait BaseContentSource: Send + Sync {
    /// Transcript or metadata text for a video.
    ///
    /// Keeps the typed error so callers can report the per-strategy log.
    async fn fetch_content(&self, video_id: &VideoId) -> youtube_client::Result<VideoContent>;
}

// =============================================================================
// Store Traits (Infrastructure - persistence)
// =============================================================================

#[async_trait]
pub trait QuizCache: Send + Sync {
    async fn find_quiz(&self, key: &QuizKey) -> Result<Option<VideoQuiz>>;

    /// Insert a generated quiz. When another request stored the same key
    /// first, the existing row is returned instead.
    async fn insert_quiz(&self, quiz: VideoQuiz) -> Result<VideoQuiz>;

    async fn record_history(&self, entry: QuizHistoryEntry) -> Result<()>;

    /// Newest first.
    async fn list_history(&self, user_id: UserId, limit: i64) -> Result<Vec<QuizHistoryEntry>>;

    async fn insert_score(&self, score: QuizScore) -> Result<()>;

    /// Most recent score a user saved for a quiz key.
    async fn latest_score(&self, user_id: UserId, key: &QuizKey) -> Result<Option<QuizScore>>;

    /// Cheap liveness probe for the health endpoint.
    async fn ping(&self) -> Result<()>;
}

#[async_trait]
pub trait CustomQuizStore: Send + Sync {
    async fn code_exists(&self, code: &str) -> Result<bool>;

    async fn insert_custom_quiz(&self, quiz: CustomQuiz) -> Result<()>;

    /// `code` is expected uppercase.
    async fn find_custom_quiz(&self, code: &str) -> Result<Option<CustomQuiz>>;

    /// Newest first.
    async fn list_custom_quizzes_by_owner(&self, owner_id: UserId) -> Result<Vec<CustomQuiz>>;

    async fn set_custom_quiz_active(&self, id: CustomQuizId, active: bool) -> Result<()>;

    /// Returns false when the user already has an attempt on this quiz.
    async fn insert_attempt(&self, attempt: CustomQuizAttempt) -> Result<bool>;

    async fn find_attempt(&self, code: &str, user_id: UserId) -> Result<Option<CustomQuizAttempt>>;

    /// Newest first.
    async fn list_attempts(&self, code: &str) -> Result<Vec<CustomQuizAttempt>>;

    /// Returns false when no attempt with that id belongs to the quiz.
    async fn delete_attempt(&self, code: &str, id: CustomQuizAttemptId) -> Result<bool>;
}

#[async_trait]
pub trait AptitudeStore: Send + Sync {
    async fn count_aptitude_questions(&self, level: AptitudeLevel) -> Result<i64>;

    async fn insert_aptitude_questions(&self, questions: Vec<AptitudeQuestion>) -> Result<()>;

    /// Random sample of at most `limit` questions.
    async fn sample_aptitude_questions(
        &self,
        level: AptitudeLevel,
        limit: i64,
    ) -> Result<Vec<AptitudeQuestion>>;

    async fn find_aptitude_question(
        &self,
        id: AptitudeQuestionId,
    ) -> Result<Option<AptitudeQuestion>>;

    async fn insert_aptitude_answer(&self, answer: AptitudeAnswer) -> Result<()>;
}

/// Everything the server persists.
pub trait Store: QuizCache + CustomQuizStore + AptitudeStore {}

impl<T> Store for T where T: QuizCache + CustomQuizStore + AptitudeStore {}
