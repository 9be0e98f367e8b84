//! LLM quiz generation and response normalization.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::models::{Question, QuizContent, DEFAULT_QUESTIONS, MAX_QUESTIONS, MIN_QUESTIONS};
use crate::common::utils::{parse_llm_json, JsonRepairError};
use crate::common::AppError;
use crate::kernel::{is_rate_limit_error, BaseAI};

pub const RATE_LIMITED_MESSAGE: &str =
    "AI generation is temporarily unavailable due to rate limits. Please try again later.";
pub const NO_QUESTIONS_MESSAGE: &str = "AI did not return any questions.";

/// Read a requested question count.
///
/// Numbers and numeric strings are accepted; anything else (or nothing)
/// means the default. Integers outside the allowed range are rejected.
pub fn parse_num_questions(value: Option<&Value>) -> Result<i32, AppError> {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match parsed {
        None => Ok(DEFAULT_QUESTIONS),
        Some(n) if (i64::from(MIN_QUESTIONS)..=i64::from(MAX_QUESTIONS)).contains(&n) => {
            Ok(n as i32)
        }
        Some(_) => Err(AppError::bad_request(format!(
            "Number of questions must be between {} and {}.",
            MIN_QUESTIONS, MAX_QUESTIONS
        ))),
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawQuiz {
    #[serde(default)]
    questions: Vec<Value>,
    #[serde(default)]
    notes: Value,
}

/// Index of the correct option: a number, a numeric string, or a letter `A`-`Z`.
fn coerce_correct(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n as usize),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(n) = s.parse::<usize>() {
                return Some(n);
            }
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphabetic() => {
                    Some((c.to_ascii_uppercase() as u8 - b'A') as usize)
                }
                _ => None,
            }
        }
        _ => None,
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// One LLM question, or `None` when it cannot be asked as-is.
pub fn coerce_question(value: &Value) -> Option<Question> {
    let question = value.get("question").and_then(value_text)?;
    if question.is_empty() {
        return None;
    }

    let options: Vec<String> = value
        .get("options")?
        .as_array()?
        .iter()
        .filter_map(value_text)
        .collect();
    if options.len() < 2 {
        return None;
    }

    let correct = value.get("correct").and_then(coerce_correct)?;
    if correct >= options.len() {
        return None;
    }

    let explanation = value
        .get("explanation")
        .and_then(value_text)
        .unwrap_or_default();

    Some(Question {
        question,
        options,
        correct,
        explanation,
    })
}

/// Keep valid questions, at most `limit` of them.
pub fn normalize_questions(raw: &[Value], limit: usize) -> Vec<Question> {
    let questions: Vec<Question> = raw.iter().filter_map(coerce_question).take(limit).collect();
    let dropped = raw.len().min(limit).saturating_sub(questions.len());
    if dropped > 0 {
        debug!(dropped, "Dropped malformed questions");
    }
    questions
}

fn notes_text(notes: Value) -> String {
    match notes {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn parse_error(e: JsonRepairError) -> AppError {
    AppError::InvalidAiResponse {
        message: format!(
            "Failed to parse quiz JSON. The AI response was not in valid JSON format. Error: {}",
            e
        ),
        raw_response: e.raw_preview().to_string(),
    }
}

/// Send a generation prompt and turn the reply into at most `num_questions`
/// questions plus notes.
pub async fn generate_quiz(
    ai: &dyn BaseAI,
    prompt: &str,
    num_questions: i32,
) -> Result<QuizContent, AppError> {
    let raw = match ai.complete_json(prompt).await {
        Ok(raw) => raw,
        Err(e) if is_rate_limit_error(&e) => {
            warn!(error = %e, "Quiz generation rate limited");
            return Err(AppError::unavailable(RATE_LIMITED_MESSAGE));
        }
        Err(e) => return Err(AppError::Internal(e.context("Quiz generation failed"))),
    };

    let parsed: RawQuiz = parse_llm_json(&raw).map_err(parse_error)?;
    let questions = normalize_questions(&parsed.questions, num_questions.max(0) as usize);
    if questions.is_empty() {
        return Err(AppError::InvalidAiResponse {
            message: NO_QUESTIONS_MESSAGE.to_string(),
            raw_response: raw.chars().take(500).collect(),
        });
    }

    Ok(QuizContent {
        questions,
        notes: notes_text(parsed.notes),
    })
}
