use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::{CustomQuizAttemptId, CustomQuizId, UserId};

pub const QUIZ_CODE_LEN: usize = 6;
const QUIZ_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Attempts listed per quiz on the owner's dashboard.
pub const DASHBOARD_ATTEMPTS: usize = 25;

/// Random share code, e.g. `K3QZ9A`.
pub fn generate_quiz_code() -> String {
    let mut rng = rand::thread_rng();
    (0..QUIZ_CODE_LEN)
        .map(|_| QUIZ_CODE_ALPHABET[rng.gen_range(0..QUIZ_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Codes are stored uppercase; lookups accept any case.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// A quiz shared by code.
///
/// `quiz_data` is kept as the creator supplied it (`{"questions": [...]}` plus
/// whatever else the client sent) and returned verbatim to attempters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomQuiz {
    pub id: CustomQuizId,
    pub code: String,
    pub owner_id: UserId,
    pub owner_username: String,
    pub title: String,
    pub video_url: Option<String>,
    pub num_questions: i32,
    /// `easy|medium|hard`, or `custom` for hand-written quizzes
    pub difficulty: String,
    pub quiz_data: Value,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl CustomQuiz {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    pub fn questions(&self) -> &[Value] {
        self.quiz_data
            .get("questions")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomQuizAttempt {
    pub id: CustomQuizAttemptId,
    pub quiz_id: CustomQuizId,
    pub quiz_code: String,
    pub user_id: UserId,
    pub username: String,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: f64,
    pub user_answers: Value,
    pub correct_answers: Value,
    pub submitted_at: DateTime<Utc>,
}

/// Score tally for one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Tally {
    pub score: i32,
    pub total: i32,
    /// `"idx" -> correct option` as stored with the attempt
    pub correct_answers: Value,
}

/// An answer given as a number or numeric string.
pub fn answer_index(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Compare `user_answers["idx"]` with each question's `correct` (default 0).
pub fn score_answers(questions: &[Value], user_answers: &Value) -> Tally {
    let mut score = 0;
    let mut correct_answers = serde_json::Map::new();

    for (idx, question) in questions.iter().enumerate() {
        let key = idx.to_string();
        let correct = question.get("correct").and_then(answer_index).unwrap_or(0);
        correct_answers.insert(key.clone(), Value::from(correct));

        let chosen = user_answers.get(&key).and_then(answer_index);
        if chosen == Some(correct) {
            score += 1;
        }
    }

    Tally {
        score,
        total: questions.len() as i32,
        correct_answers: Value::Object(correct_answers),
    }
}
