//! In-memory storage implementation for testing and development.

use anyhow::Result;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::common::{AptitudeQuestionId, CustomQuizAttemptId, CustomQuizId, UserId};
use crate::domains::aptitude::models::{AptitudeAnswer, AptitudeLevel, AptitudeQuestion};
use crate::domains::custom_quiz::models::{CustomQuiz, CustomQuizAttempt};
use crate::domains::quiz::models::{QuizHistoryEntry, QuizKey, QuizScore, VideoQuiz};
use crate::kernel::{AptitudeStore, CustomQuizStore, QuizCache};

/// In-memory storage for every server table.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart.
pub struct MemoryStore {
    quizzes: RwLock<HashMap<QuizKey, VideoQuiz>>,
    history: RwLock<Vec<QuizHistoryEntry>>,
    scores: RwLock<Vec<QuizScore>>,
    custom_quizzes: RwLock<HashMap<String, CustomQuiz>>,
    attempts: RwLock<Vec<CustomQuizAttempt>>,
    aptitude_questions: RwLock<Vec<AptitudeQuestion>>,
    aptitude_answers: RwLock<Vec<AptitudeAnswer>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self {
            quizzes: RwLock::new(HashMap::new()),
            history: RwLock::new(Vec::new()),
            scores: RwLock::new(Vec::new()),
            custom_quizzes: RwLock::new(HashMap::new()),
            attempts: RwLock::new(Vec::new()),
            aptitude_questions: RwLock::new(Vec::new()),
            aptitude_answers: RwLock::new(Vec::new()),
        }
    }

    /// Get the number of cached video quizzes.
    pub async fn quiz_count(&self) -> usize {
        self.quizzes.read().await.len()
    }

    /// Get the number of saved video quiz scores.
    pub async fn score_count(&self) -> usize {
        self.scores.read().await.len()
    }

    /// Get the number of recorded aptitude answers.
    pub async fn aptitude_answer_count(&self) -> usize {
        self.aptitude_answers.read().await.len()
    }
}

#[async_trait]
impl QuizCache for MemoryStore {
    async fn find_quiz(&self, key: &QuizKey) -> Result<Option<VideoQuiz>> {
        Ok(self.quizzes.read().await.get(key).cloned())
    }

    async fn insert_quiz(&self, quiz: VideoQuiz) -> Result<VideoQuiz> {
        let mut quizzes = self.quizzes.write().await;
        Ok(quizzes.entry(quiz.key()).or_insert(quiz).clone())
    }

    async fn record_history(&self, entry: QuizHistoryEntry) -> Result<()> {
        self.history.write().await.push(entry);
        Ok(())
    }

    async fn list_history(&self, user_id: UserId, limit: i64) -> Result<Vec<QuizHistoryEntry>> {
        let mut entries: Vec<QuizHistoryEntry> = self
            .history
            .read()
            .await
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.generated_at.cmp(&a.generated_at).then(b.id.cmp(&a.id)));
        entries.truncate(limit.max(0) as usize);
        Ok(entries)
    }

    async fn insert_score(&self, score: QuizScore) -> Result<()> {
        self.scores.write().await.push(score);
        Ok(())
    }

    async fn latest_score(&self, user_id: UserId, key: &QuizKey) -> Result<Option<QuizScore>> {
        Ok(self
            .scores
            .read()
            .await
            .iter()
            .filter(|s| {
                s.user_id == user_id
                    && s.video_id == key.video_id
                    && s.num_questions == key.num_questions
                    && s.difficulty == key.difficulty
            })
            .max_by(|a, b| a.completed_at.cmp(&b.completed_at).then(a.id.cmp(&b.id)))
            .cloned())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl CustomQuizStore for MemoryStore {
    async fn code_exists(&self, code: &str) -> Result<bool> {
        Ok(self.custom_quizzes.read().await.contains_key(code))
    }

    async fn insert_custom_quiz(&self, quiz: CustomQuiz) -> Result<()> {
        let mut quizzes = self.custom_quizzes.write().await;
        if quizzes.contains_key(&quiz.code) {
            anyhow::bail!("quiz code {} already exists", quiz.code);
        }
        quizzes.insert(quiz.code.clone(), quiz);
        Ok(())
    }

    async fn find_custom_quiz(&self, code: &str) -> Result<Option<CustomQuiz>> {
        Ok(self.custom_quizzes.read().await.get(code).cloned())
    }

    async fn list_custom_quizzes_by_owner(&self, owner_id: UserId) -> Result<Vec<CustomQuiz>> {
        let mut quizzes: Vec<CustomQuiz> = self
            .custom_quizzes
            .read()
            .await
            .values()
            .filter(|q| q.owner_id == owner_id)
            .cloned()
            .collect();
        quizzes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(quizzes)
    }

    async fn set_custom_quiz_active(&self, id: CustomQuizId, active: bool) -> Result<()> {
        if let Some(quiz) = self
            .custom_quizzes
            .write()
            .await
            .values_mut()
            .find(|q| q.id == id)
        {
            quiz.active = active;
        }
        Ok(())
    }

    async fn insert_attempt(&self, attempt: CustomQuizAttempt) -> Result<bool> {
        let mut attempts = self.attempts.write().await;
        let duplicate = attempts
            .iter()
            .any(|a| a.quiz_id == attempt.quiz_id && a.user_id == attempt.user_id);
        if duplicate {
            return Ok(false);
        }
        attempts.push(attempt);
        Ok(true)
    }

    async fn find_attempt(&self, code: &str, user_id: UserId) -> Result<Option<CustomQuizAttempt>> {
        Ok(self
            .attempts
            .read()
            .await
            .iter()
            .find(|a| a.quiz_code == code && a.user_id == user_id)
            .cloned())
    }

    async fn list_attempts(&self, code: &str) -> Result<Vec<CustomQuizAttempt>> {
        let mut attempts: Vec<CustomQuizAttempt> = self
            .attempts
            .read()
            .await
            .iter()
            .filter(|a| a.quiz_code == code)
            .cloned()
            .collect();
        attempts.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then(b.id.cmp(&a.id)));
        Ok(attempts)
    }

    async fn delete_attempt(&self, code: &str, id: CustomQuizAttemptId) -> Result<bool> {
        let mut attempts = self.attempts.write().await;
        let before = attempts.len();
        attempts.retain(|a| !(a.id == id && a.quiz_code == code));
        Ok(attempts.len() < before)
    }
}

#[async_trait]
impl AptitudeStore for MemoryStore {
    async fn count_aptitude_questions(&self, level: AptitudeLevel) -> Result<i64> {
        Ok(self
            .aptitude_questions
            .read()
            .await
            .iter()
            .filter(|q| q.difficulty == level)
            .count() as i64)
    }

    async fn insert_aptitude_questions(&self, questions: Vec<AptitudeQuestion>) -> Result<()> {
        self.aptitude_questions.write().await.extend(questions);
        Ok(())
    }

    async fn sample_aptitude_questions(
        &self,
        level: AptitudeLevel,
        limit: i64,
    ) -> Result<Vec<AptitudeQuestion>> {
        let questions = self.aptitude_questions.read().await;
        let matching: Vec<&AptitudeQuestion> =
            questions.iter().filter(|q| q.difficulty == level).collect();
        Ok(matching
            .choose_multiple(&mut rand::thread_rng(), limit.max(0) as usize)
            .map(|q| (*q).clone())
            .collect())
    }

    async fn find_aptitude_question(
        &self,
        id: AptitudeQuestionId,
    ) -> Result<Option<AptitudeQuestion>> {
        Ok(self
            .aptitude_questions
            .read()
            .await
            .iter()
            .find(|q| q.id == id)
            .cloned())
    }

    async fn insert_aptitude_answer(&self, answer: AptitudeAnswer) -> Result<()> {
        self.aptitude_answers.write().await.push(answer);
        Ok(())
    }
}
