//! Shareable custom quizzes: create, attempt once per user, manage attempts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::models::{
    generate_quiz_code, normalize_code, score_answers, CustomQuiz, CustomQuizAttempt,
    DASHBOARD_ATTEMPTS,
};
use crate::common::{Actor, AppError, CustomQuizAttemptId, CustomQuizId};
use crate::domains::quiz::generator::{generate_quiz, parse_num_questions};
use crate::domains::quiz::models::{percentage, Difficulty, QuizContent};
use crate::domains::quiz::prompts::topic_quiz_prompt;
use crate::kernel::ServerDeps;

pub const CODE_NOT_FOUND: &str = "Quiz code not found";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCustomQuizRequest {
    #[serde(default)]
    pub quiz_data: Value,
    pub title: Option<String>,
    pub video_url: Option<String>,
    pub num_questions: Option<i32>,
    pub difficulty: Option<String>,
}

/// Store a quiz under a fresh share code and return the code.
pub async fn create_custom_quiz(
    deps: &ServerDeps,
    actor: &Actor,
    request: CreateCustomQuizRequest,
) -> Result<String, AppError> {
    let question_count = request
        .quiz_data
        .get("questions")
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0);
    if question_count == 0 {
        return Err(AppError::bad_request("No quiz data provided"));
    }

    let code = loop {
        let candidate = generate_quiz_code();
        if !deps.store.code_exists(&candidate).await? {
            break candidate;
        }
    };

    let quiz = CustomQuiz {
        id: CustomQuizId::new(),
        code: code.clone(),
        owner_id: actor.user_id,
        owner_username: actor.username.clone(),
        title: request
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| "Custom Quiz".to_string()),
        video_url: request.video_url.filter(|u| !u.trim().is_empty()),
        num_questions: request
            .num_questions
            .filter(|n| *n > 0)
            .unwrap_or(question_count as i32),
        difficulty: request
            .difficulty
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| "custom".to_string()),
        quiz_data: request.quiz_data,
        active: true,
        created_at: Utc::now(),
    };
    deps.store.insert_custom_quiz(quiz).await?;

    info!(code = %code, owner = %actor.user_id, questions = question_count, "Created custom quiz");
    Ok(code)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopicQuizRequest {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub num_questions: Option<Value>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

/// Ask the LLM for a quiz on a free-text topic. Nothing is stored; the
/// client reviews the questions and calls [`create_custom_quiz`].
pub async fn generate_topic_quiz(
    deps: &ServerDeps,
    request: TopicQuizRequest,
) -> Result<QuizContent, AppError> {
    let topic = request.topic.trim();
    if topic.is_empty() {
        return Err(AppError::bad_request("Please provide a topic for the quiz."));
    }
    let num_questions = parse_num_questions(request.num_questions.as_ref())?;
    let difficulty = Difficulty::parse_or_default(request.difficulty.as_deref());

    let ai = deps.ai().ok_or_else(|| {
        AppError::unavailable("AI generation is unavailable. Please configure the Gemini API key.")
    })?;
    let prompt = topic_quiz_prompt(topic, num_questions, difficulty);
    generate_quiz(ai, &prompt, num_questions).await
}

/// What an attempter receives.
#[derive(Debug, Clone, Serialize)]
pub struct CustomQuizView {
    pub code: String,
    pub title: String,
    pub video_url: Option<String>,
    pub num_questions: i32,
    pub difficulty: String,
    pub quiz_data: Value,
}

async fn load_quiz(deps: &ServerDeps, code: &str) -> Result<CustomQuiz, AppError> {
    deps.store
        .find_custom_quiz(&normalize_code(code))
        .await?
        .ok_or_else(|| AppError::not_found(CODE_NOT_FOUND))
}

async fn load_owned_quiz(
    deps: &ServerDeps,
    actor: &Actor,
    code: &str,
    denied: &str,
) -> Result<CustomQuiz, AppError> {
    let quiz = load_quiz(deps, code).await?;
    if !quiz.is_owned_by(actor.user_id) {
        return Err(AppError::forbidden(denied));
    }
    Ok(quiz)
}

/// Open a quiz for attempting.
pub async fn fetch_for_attempt(
    deps: &ServerDeps,
    actor: &Actor,
    code: &str,
) -> Result<CustomQuizView, AppError> {
    let quiz = load_quiz(deps, code).await?;

    if !quiz.active && !quiz.is_owned_by(actor.user_id) {
        return Err(AppError::forbidden(
            "This quiz is no longer accepting attempts.",
        ));
    }

    if deps
        .store
        .find_attempt(&quiz.code, actor.user_id)
        .await?
        .is_some()
    {
        return Err(AppError::forbidden(
            "You have already attempted this quiz. Please ask the creator to reset your attempt if you wish to try again.",
        ));
    }

    Ok(CustomQuizView {
        code: quiz.code,
        title: quiz.title,
        video_url: quiz.video_url,
        num_questions: quiz.num_questions,
        difficulty: quiz.difficulty,
        quiz_data: quiz.quiz_data,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitAttemptRequest {
    #[serde(default)]
    pub user_answers: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitAttemptResponse {
    pub score: i32,
    pub total_questions: i32,
    pub percentage: f64,
}

const ALREADY_ATTEMPTED: &str =
    "You have already attempted this quiz. Only one attempt is allowed.";

/// Score and record the caller's single attempt.
pub async fn submit_attempt(
    deps: &ServerDeps,
    actor: &Actor,
    code: &str,
    request: SubmitAttemptRequest,
) -> Result<SubmitAttemptResponse, AppError> {
    let quiz = load_quiz(deps, code).await?;
    if !quiz.active {
        return Err(AppError::forbidden(
            "This quiz is not currently accepting attempts.",
        ));
    }

    if deps
        .store
        .find_attempt(&quiz.code, actor.user_id)
        .await?
        .is_some()
    {
        return Err(AppError::forbidden(ALREADY_ATTEMPTED));
    }

    let user_answers = match request.user_answers {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    let tally = score_answers(quiz.questions(), &user_answers);
    let percentage = percentage(tally.score, tally.total);

    let attempt = CustomQuizAttempt {
        id: CustomQuizAttemptId::new(),
        quiz_id: quiz.id,
        quiz_code: quiz.code.clone(),
        user_id: actor.user_id,
        username: actor.username.clone(),
        score: tally.score,
        total_questions: tally.total,
        percentage,
        user_answers,
        correct_answers: tally.correct_answers,
        submitted_at: Utc::now(),
    };

    // A concurrent submit can win between the check and the insert.
    if !deps.store.insert_attempt(attempt).await? {
        return Err(AppError::forbidden(ALREADY_ATTEMPTED));
    }

    info!(code = %quiz.code, user = %actor.user_id, score = tally.score, total = tally.total, "Recorded custom quiz attempt");
    Ok(SubmitAttemptResponse {
        score: tally.score,
        total_questions: tally.total,
        percentage,
    })
}

/// All attempts on an owned quiz, newest first.
pub async fn list_attempts(
    deps: &ServerDeps,
    actor: &Actor,
    code: &str,
) -> Result<Vec<CustomQuizAttempt>, AppError> {
    let quiz = load_owned_quiz(deps, actor, code, "Not authorized to view attempts").await?;
    Ok(deps.store.list_attempts(&quiz.code).await?)
}

/// Flip whether an owned quiz accepts attempts; returns the new state.
pub async fn toggle_active(deps: &ServerDeps, actor: &Actor, code: &str) -> Result<bool, AppError> {
    let quiz = load_owned_quiz(deps, actor, code, "Not authorized to modify this quiz").await?;
    let active = !quiz.active;
    deps.store.set_custom_quiz_active(quiz.id, active).await?;
    info!(code = %quiz.code, active, "Toggled custom quiz");
    Ok(active)
}

/// Remove an attempt so the student can try again.
pub async fn delete_attempt(
    deps: &ServerDeps,
    actor: &Actor,
    code: &str,
    attempt_id: &str,
) -> Result<(), AppError> {
    let quiz = load_owned_quiz(
        deps,
        actor,
        code,
        "Not authorized to modify attempts for this quiz",
    )
    .await?;

    let attempt_id = CustomQuizAttemptId::parse(attempt_id)
        .map_err(|_| AppError::bad_request("Invalid attempt id"))?;

    if !deps.store.delete_attempt(&quiz.code, attempt_id).await? {
        return Err(AppError::not_found("Attempt not found"));
    }
    info!(code = %quiz.code, attempt_id = %attempt_id, "Deleted custom quiz attempt");
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct AttemptSummary {
    pub attempt_id: CustomQuizAttemptId,
    pub username: String,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: f64,
    pub submitted_at: DateTime<Utc>,
}

impl From<&CustomQuizAttempt> for AttemptSummary {
    fn from(attempt: &CustomQuizAttempt) -> Self {
        Self {
            attempt_id: attempt.id,
            username: attempt.username.clone(),
            score: attempt.score,
            total_questions: attempt.total_questions,
            percentage: attempt.percentage,
            submitted_at: attempt.submitted_at,
        }
    }
}

/// Owner dashboard row.
#[derive(Debug, Clone, Serialize)]
pub struct OwnedQuizSummary {
    #[serde(flatten)]
    pub quiz: CustomQuiz,
    pub attempts_count: usize,
    pub attempts: Vec<AttemptSummary>,
}

/// Quizzes created by the caller, newest first, with recent attempts.
pub async fn list_my_quizzes(
    deps: &ServerDeps,
    actor: &Actor,
) -> Result<Vec<OwnedQuizSummary>, AppError> {
    let quizzes = deps.store.list_custom_quizzes_by_owner(actor.user_id).await?;

    let mut summaries = Vec::with_capacity(quizzes.len());
    for quiz in quizzes {
        let attempts = deps.store.list_attempts(&quiz.code).await?;
        summaries.push(OwnedQuizSummary {
            attempts_count: attempts.len(),
            attempts: attempts
                .iter()
                .take(DASHBOARD_ATTEMPTS)
                .map(AttemptSummary::from)
                .collect(),
            quiz,
        });
    }
    Ok(summaries)
}
