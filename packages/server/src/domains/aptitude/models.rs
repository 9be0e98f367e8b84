use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::{AptitudeAnswerId, AptitudeQuestionId, UserId};
use crate::domains::quiz::models::Question;

/// Largest practice set served at once.
pub const MAX_PRACTICE_QUESTIONS: i64 = 50;
pub const DEFAULT_PRACTICE_QUESTIONS: i64 = 10;

/// Largest single generation request.
pub const MAX_GENERATE_COUNT: i64 = 1000;
pub const DEFAULT_GENERATE_COUNT: i64 = 100;
/// Bank size per level after which generation is refused.
pub const MAX_BANK_SIZE: i64 = 10_000;
/// Questions requested from the LLM per call.
pub const GENERATION_BATCH_SIZE: i64 = 10;

/// Aptitude banks exist for two levels only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AptitudeLevel {
    #[default]
    Easy,
    Medium,
}

impl AptitudeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AptitudeLevel::Easy => "easy",
            AptitudeLevel::Medium => "medium",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "easy" => Some(AptitudeLevel::Easy),
            "medium" => Some(AptitudeLevel::Medium),
            _ => None,
        }
    }
}

impl fmt::Display for AptitudeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AptitudeQuestion {
    pub id: AptitudeQuestionId,
    pub difficulty: AptitudeLevel,
    #[serde(flatten)]
    pub question: Question,
    pub created_at: DateTime<Utc>,
}

impl AptitudeQuestion {
    pub fn new(difficulty: AptitudeLevel, question: Question) -> Self {
        Self {
            id: AptitudeQuestionId::new(),
            difficulty,
            question,
            created_at: Utc::now(),
        }
    }
}

/// One practice answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AptitudeAnswer {
    pub id: AptitudeAnswerId,
    pub user_id: UserId,
    pub username: String,
    pub question_id: AptitudeQuestionId,
    pub difficulty: AptitudeLevel,
    pub selected_option: i64,
    pub correct_option: i64,
    pub is_correct: bool,
    pub answered_at: DateTime<Utc>,
}
