use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use youtube_client::ContentSource;

use crate::common::{QuizHistoryId, QuizScoreId, UserId, VideoQuizId};

/// Smallest quiz that can be requested.
pub const MIN_QUESTIONS: i32 = 3;
/// Largest quiz that can be requested.
pub const MAX_QUESTIONS: i32 = 20;
/// Used when the requested count is missing or not an integer.
pub const DEFAULT_QUESTIONS: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Exact match on the lowercase name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Unknown or missing values fall back to medium.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or_default()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cache key: one stored quiz per (video, count, difficulty).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuizKey {
    pub video_id: String,
    pub num_questions: i32,
    pub difficulty: Difficulty,
}

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct: usize,
    #[serde(default)]
    pub explanation: String,
}

/// The payload clients render: questions plus HTML study notes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuizContent {
    pub questions: Vec<Question>,
    #[serde(default)]
    pub notes: String,
}

/// A generated quiz in the cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoQuiz {
    pub id: VideoQuizId,
    pub video_id: String,
    pub video_url: String,
    pub num_questions: i32,
    pub difficulty: Difficulty,
    pub questions: Vec<Question>,
    pub notes: String,
    /// SHA-256 of the normalized source text
    pub content_hash: String,
    pub content_source: ContentSource,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl VideoQuiz {
    pub fn key(&self) -> QuizKey {
        QuizKey {
            video_id: self.video_id.clone(),
            num_questions: self.num_questions,
            difficulty: self.difficulty,
        }
    }

    pub fn content(&self) -> QuizContent {
        QuizContent {
            questions: self.questions.clone(),
            notes: self.notes.clone(),
        }
    }

    /// `"idx" -> correct option`, as recorded alongside scores.
    pub fn correct_answers(&self) -> BTreeMap<String, usize> {
        correct_answer_map(&self.questions)
    }
}

pub fn correct_answer_map(questions: &[Question]) -> BTreeMap<String, usize> {
    questions
        .iter()
        .enumerate()
        .map(|(idx, q)| (idx.to_string(), q.correct))
        .collect()
}

/// A user generated (or re-opened from cache) a quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizHistoryEntry {
    pub id: QuizHistoryId,
    pub user_id: UserId,
    pub username: String,
    pub quiz_id: VideoQuizId,
    pub video_id: String,
    pub video_url: String,
    pub num_questions: i32,
    pub difficulty: Difficulty,
    pub generated_at: DateTime<Utc>,
}

impl QuizHistoryEntry {
    pub fn key(&self) -> QuizKey {
        QuizKey {
            video_id: self.video_id.clone(),
            num_questions: self.num_questions,
            difficulty: self.difficulty,
        }
    }
}

/// A completed video quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizScore {
    pub id: QuizScoreId,
    pub user_id: UserId,
    pub username: String,
    pub video_id: String,
    pub video_url: Option<String>,
    pub num_questions: i32,
    pub difficulty: Difficulty,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: f64,
    /// As submitted by the client: `"idx" -> chosen option`
    pub user_answers: serde_json::Value,
    pub correct_answers: BTreeMap<String, usize>,
    pub completed_at: DateTime<Utc>,
}

/// `score / total * 100`, rounded to two decimals; 0 for an empty quiz.
pub fn percentage(score: i32, total: i32) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (f64::from(score) / f64::from(total) * 10_000.0).round() / 100.0
}
