//! Aptitude practice bank: admin seeding through the LLM, random practice
//! sets, per-question answer checking.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::models::{
    AptitudeAnswer, AptitudeLevel, AptitudeQuestion, DEFAULT_GENERATE_COUNT,
    DEFAULT_PRACTICE_QUESTIONS, GENERATION_BATCH_SIZE, MAX_BANK_SIZE, MAX_GENERATE_COUNT,
    MAX_PRACTICE_QUESTIONS,
};
use crate::common::utils::parse_llm_json;
use crate::common::{Actor, AppError, AptitudeAnswerId, AptitudeQuestionId};
use crate::domains::quiz::generator::normalize_questions;
use crate::kernel::{BaseAI, ServerDeps};

fn level_instruction(level: AptitudeLevel) -> &'static str {
    match level {
        AptitudeLevel::Easy => "Easy: Simple arithmetic, basic logic, straightforward reasoning questions suitable for beginners.",
        AptitudeLevel::Medium => "Medium: Moderate complexity involving problem-solving, data interpretation, and analytical thinking.",
    }
}

pub fn aptitude_prompt(count: i64, level: AptitudeLevel) -> String {
    format!(
        "Generate {count} aptitude test questions. Difficulty: {instruction}\n\n\
Return ONLY valid JSON (no markdown, no prose) in this exact format:\n\
{{\n\
  \"questions\": [\n\
    {{\n\
      \"question\": \"Question text here\",\n\
      \"options\": [\"Option A\", \"Option B\", \"Option C\", \"Option D\"],\n\
      \"correct\": 0,\n\
      \"explanation\": \"Brief explanation\"\n\
    }}\n\
  ]\n\
}}\n\n\
Rules:\n\
- Generate exactly {count} questions.\n\
- Each question must have exactly 4 options.\n\
- 'correct' must be index 0-3.\n\
- Questions should cover: quantitative aptitude, logical reasoning, verbal ability, data interpretation.\n",
        instruction = level_instruction(level),
    )
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PracticeQuery {
    pub difficulty: Option<String>,
    pub num_questions: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PracticeSet {
    pub questions: Vec<AptitudeQuestion>,
    pub difficulty: AptitudeLevel,
    pub count: usize,
}

/// Random questions for a practice session.
///
/// Unknown levels mean easy; counts outside 1..=50 (or unparseable) mean 10.
pub async fn sample_questions(
    deps: &ServerDeps,
    query: PracticeQuery,
) -> Result<PracticeSet, AppError> {
    let level = query
        .difficulty
        .as_deref()
        .and_then(AptitudeLevel::parse)
        .unwrap_or_default();
    let limit = query
        .num_questions
        .as_deref()
        .and_then(|n| n.trim().parse::<i64>().ok())
        .filter(|n| (1..=MAX_PRACTICE_QUESTIONS).contains(n))
        .unwrap_or(DEFAULT_PRACTICE_QUESTIONS);

    let questions = deps.store.sample_aptitude_questions(level, limit).await?;
    if questions.is_empty() {
        return Err(AppError::not_found(format!(
            "No {} questions available. Please generate questions first.",
            level
        )));
    }

    Ok(PracticeSet {
        count: questions.len(),
        questions,
        difficulty: level,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    pub count: Option<i64>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub generated: usize,
    pub difficulty: AptitudeLevel,
    pub total_in_db: i64,
}

#[derive(Debug, Default, Deserialize)]
struct GeneratedBatch {
    #[serde(default)]
    questions: Vec<Value>,
}

async fn generate_batch(
    ai: &dyn BaseAI,
    level: AptitudeLevel,
    size: i64,
) -> anyhow::Result<Vec<AptitudeQuestion>> {
    let raw = ai.complete_json(&aptitude_prompt(size, level)).await?;
    let batch: GeneratedBatch = parse_llm_json(&raw)?;
    Ok(normalize_questions(&batch.questions, size as usize)
        .into_iter()
        .map(|q| AptitudeQuestion::new(level, q))
        .collect())
}

/// Seed the bank for one level. Admin only.
///
/// Questions are requested in batches; a failed batch is logged and skipped.
pub async fn generate_questions(
    deps: &ServerDeps,
    actor: &Actor,
    request: GenerateRequest,
) -> Result<GenerateResponse, AppError> {
    actor.require_admin()?;

    let level = AptitudeLevel::parse(request.difficulty.as_deref().unwrap_or("easy"))
        .ok_or_else(|| AppError::bad_request("Invalid difficulty"))?;
    let count = request.count.unwrap_or(DEFAULT_GENERATE_COUNT);
    if !(1..=MAX_GENERATE_COUNT).contains(&count) {
        return Err(AppError::bad_request("Count must be between 1 and 1000"));
    }

    let existing = deps.store.count_aptitude_questions(level).await?;
    if existing >= MAX_BANK_SIZE {
        return Err(AppError::bad_request(format!(
            "Already have {} {} questions. Maximum is {}.",
            existing, level, MAX_BANK_SIZE
        )));
    }

    let ai = deps.ai().ok_or_else(|| {
        AppError::unavailable("AI generation is unavailable. Please configure the Gemini API key.")
    })?;

    let mut generated = 0;
    let mut offset = 0;
    while offset < count {
        let size = GENERATION_BATCH_SIZE.min(count - offset);
        offset += size;

        match generate_batch(ai, level, size).await {
            Ok(questions) if !questions.is_empty() => {
                let n = questions.len();
                deps.store.insert_aptitude_questions(questions).await?;
                generated += n;
            }
            Ok(_) => warn!(level = %level, size, "Aptitude batch produced no usable questions"),
            Err(e) => warn!(level = %level, size, error = %e, "Aptitude batch failed"),
        }
    }

    let total_in_db = deps.store.count_aptitude_questions(level).await?;
    info!(level = %level, requested = count, generated, total_in_db, "Generated aptitude questions");

    Ok(GenerateResponse {
        success: true,
        generated,
        difficulty: level,
        total_in_db,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnswerRequest {
    pub question_id: Option<String>,
    /// Number or numeric string
    pub selected_option: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerResponse {
    pub success: bool,
    pub is_correct: bool,
    pub correct_option: i64,
    pub explanation: String,
}

/// Check one practice answer and record it.
pub async fn submit_answer(
    deps: &ServerDeps,
    actor: &Actor,
    request: AnswerRequest,
) -> Result<AnswerResponse, AppError> {
    let missing = || AppError::bad_request("Missing data");

    let question_id = request
        .question_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(missing)?;
    let selected = match request.selected_option {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(missing)?;

    let question_id = AptitudeQuestionId::parse(question_id.trim())
        .map_err(|_| AppError::not_found("Question not found"))?;
    let question = deps
        .store
        .find_aptitude_question(question_id)
        .await?
        .ok_or_else(|| AppError::not_found("Question not found"))?;

    let correct_option = question.question.correct as i64;
    let is_correct = selected == correct_option;

    deps.store
        .insert_aptitude_answer(AptitudeAnswer {
            id: AptitudeAnswerId::new(),
            user_id: actor.user_id,
            username: actor.username.clone(),
            question_id,
            difficulty: question.difficulty,
            selected_option: selected,
            correct_option,
            is_correct,
            answered_at: Utc::now(),
        })
        .await?;

    Ok(AnswerResponse {
        success: true,
        is_correct,
        correct_option,
        explanation: question.question.explanation,
    })
}
