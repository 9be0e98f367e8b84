//! Video quiz actions: generate (or serve from cache), save scores, history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use youtube_client::{ContentSource, VideoId, YoutubeError};

use super::classifier::classify;
use super::generator::{generate_quiz, parse_num_questions};
use super::models::{
    percentage, Difficulty, QuizContent, QuizHistoryEntry, QuizKey, QuizScore, VideoQuiz,
};
use super::prompts::video_quiz_prompt;
use crate::common::utils::generate_content_hash;
use crate::common::{Actor, AppError, QuizHistoryId, QuizScoreId, VideoQuizId};
use crate::kernel::ServerDeps;

pub const AI_UNAVAILABLE_MESSAGE: &str =
    "AI quiz generation is unavailable. Please configure the Gemini API key.";

/// Default number of history entries listed.
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoQuizRequest {
    #[serde(default)]
    pub yt_url: String,
    /// Number or numeric string
    #[serde(default)]
    pub num_questions: Option<Value>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoQuizResponse {
    pub response: QuizContent,
    pub cached: bool,
    pub content_source: ContentSource,
}

fn content_error(err: YoutubeError) -> AppError {
    match err {
        YoutubeError::ContentUnavailable { error_log } => {
            let details = if error_log.is_empty() {
                "Unknown error".to_string()
            } else {
                error_log.join("<br>")
            };
            AppError::not_found(format!(
                "No transcript/captions found, and unable to retrieve video metadata.<br>Debug details:<br>{}",
                details
            ))
        }
        YoutubeError::InvalidUrl | YoutubeError::MissingVideoId => {
            AppError::bad_request(err.to_string())
        }
        other => AppError::not_found(format!("Unable to retrieve video content: {}", other)),
    }
}

fn not_educational(reason: &str) -> AppError {
    AppError::bad_request(format!(
        "This video does not appear to be educational content. {}<br><br>Please use educational videos such as tutorials, courses, lectures, how-to guides, documentaries, or academic content.",
        reason
    ))
}

async fn record_history(deps: &ServerDeps, actor: &Actor, quiz: &VideoQuiz) {
    let entry = QuizHistoryEntry {
        id: QuizHistoryId::new(),
        user_id: actor.user_id,
        username: actor.username.clone(),
        quiz_id: quiz.id,
        video_id: quiz.video_id.clone(),
        video_url: quiz.video_url.clone(),
        num_questions: quiz.num_questions,
        difficulty: quiz.difficulty,
        generated_at: Utc::now(),
    };
    if let Err(e) = deps.store.record_history(entry).await {
        warn!(error = %e, video_id = %quiz.video_id, "Failed to record quiz history");
    }
}

/// Build a quiz for a video, reusing the stored quiz for the same key.
pub async fn generate_video_quiz(
    deps: &ServerDeps,
    actor: &Actor,
    request: VideoQuizRequest,
) -> Result<VideoQuizResponse, AppError> {
    let video_url = request.yt_url.trim().to_string();
    let video_id = VideoId::from_url(&video_url).map_err(content_error)?;
    let num_questions = parse_num_questions(request.num_questions.as_ref())?;
    let difficulty = Difficulty::parse_or_default(request.difficulty.as_deref());

    let key = QuizKey {
        video_id: video_id.to_string(),
        num_questions,
        difficulty,
    };

    if let Some(quiz) = deps.store.find_quiz(&key).await? {
        info!(video_id = %video_id, num_questions, difficulty = %difficulty, "Serving cached quiz");
        record_history(deps, actor, &quiz).await;
        return Ok(VideoQuizResponse {
            response: quiz.content(),
            cached: true,
            content_source: quiz.content_source,
        });
    }

    let content = deps
        .content
        .fetch_content(&video_id)
        .await
        .map_err(content_error)?;

    let classification = classify(deps.ai(), &content.text).await;
    if !classification.is_educational {
        info!(video_id = %video_id, reason = %classification.reason, "Rejected non-educational video");
        return Err(not_educational(&classification.reason));
    }

    let ai = deps
        .ai()
        .ok_or_else(|| AppError::unavailable(AI_UNAVAILABLE_MESSAGE))?;
    let prompt = video_quiz_prompt(&content.text, content.source, num_questions, difficulty);
    let generated = generate_quiz(ai, &prompt, num_questions).await?;

    let quiz = VideoQuiz {
        id: VideoQuizId::new(),
        video_id: key.video_id.clone(),
        video_url,
        num_questions,
        difficulty,
        questions: generated.questions,
        notes: generated.notes,
        content_hash: generate_content_hash(&content.text),
        content_source: content.source,
        created_by: Some(actor.user_id),
        created_at: Utc::now(),
    };

    let stored = match deps.store.insert_quiz(quiz.clone()).await {
        Ok(stored) => stored,
        Err(e) => {
            warn!(error = %e, video_id = %video_id, "Failed to store generated quiz");
            quiz
        }
    };
    record_history(deps, actor, &stored).await;

    info!(
        video_id = %video_id,
        questions = stored.questions.len(),
        source = content.source.as_str(),
        "Generated video quiz"
    );

    Ok(VideoQuizResponse {
        response: stored.content(),
        cached: false,
        content_source: stored.content_source,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveScoreRequest {
    pub video_id: Option<String>,
    pub video_url: Option<String>,
    pub num_questions: Option<i32>,
    pub difficulty: Option<String>,
    pub score: Option<i32>,
    pub total_questions: Option<i32>,
    #[serde(default)]
    pub user_answers: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveScoreResponse {
    pub success: bool,
    pub message: String,
    pub score: i32,
    pub total: i32,
    pub percentage: f64,
}

/// Record a finished video quiz.
pub async fn save_quiz_score(
    deps: &ServerDeps,
    actor: &Actor,
    request: SaveScoreRequest,
) -> Result<SaveScoreResponse, AppError> {
    let missing = || AppError::bad_request("Missing required fields");

    let video_id = request
        .video_id
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(missing)?;
    let num_questions = request.num_questions.filter(|n| *n != 0).ok_or_else(missing)?;
    let difficulty = request
        .difficulty
        .as_deref()
        .and_then(Difficulty::parse)
        .ok_or_else(missing)?;
    let score = request.score.ok_or_else(missing)?;
    let total = request
        .total_questions
        .filter(|n| *n != 0)
        .ok_or_else(missing)?;

    if score < 0 || total < 0 || score > total {
        return Err(AppError::bad_request(
            "Score must be between 0 and the total number of questions",
        ));
    }

    let key = QuizKey {
        video_id,
        num_questions,
        difficulty,
    };
    let quiz = deps
        .store
        .find_quiz(&key)
        .await?
        .ok_or_else(|| AppError::not_found("Quiz not found"))?;

    let percentage = percentage(score, total);
    let record = QuizScore {
        id: QuizScoreId::new(),
        user_id: actor.user_id,
        username: actor.username.clone(),
        video_id: key.video_id,
        video_url: request.video_url.or_else(|| Some(quiz.video_url.clone())),
        num_questions,
        difficulty,
        score,
        total_questions: total,
        percentage,
        user_answers: match request.user_answers {
            Value::Null => Value::Object(Default::default()),
            other => other,
        },
        correct_answers: quiz.correct_answers(),
        completed_at: Utc::now(),
    };
    deps.store.insert_score(record).await?;

    Ok(SaveScoreResponse {
        success: true,
        message: "Score saved successfully".to_string(),
        score,
        total,
        percentage,
    })
}

/// A history entry joined with the user's latest score for that quiz.
#[derive(Debug, Clone, Serialize)]
pub struct UserQuizSummary {
    #[serde(flatten)]
    pub entry: QuizHistoryEntry,
    pub score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_questions: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub completed: bool,
}

/// The caller's generated quizzes, newest first.
pub async fn list_user_quizzes(
    deps: &ServerDeps,
    actor: &Actor,
    limit: Option<i64>,
) -> Result<Vec<UserQuizSummary>, AppError> {
    let limit = limit.filter(|l| *l > 0).unwrap_or(DEFAULT_HISTORY_LIMIT);
    let history = deps.store.list_history(actor.user_id, limit).await?;

    let mut summaries = Vec::with_capacity(history.len());
    for entry in history {
        let score = deps.store.latest_score(actor.user_id, &entry.key()).await?;
        summaries.push(match score {
            Some(s) => UserQuizSummary {
                entry,
                score: Some(s.score),
                total_questions: Some(s.total_questions),
                percentage: Some(s.percentage),
                completed_at: Some(s.completed_at),
                completed: true,
            },
            None => UserQuizSummary {
                entry,
                score: None,
                total_questions: None,
                percentage: None,
                completed_at: None,
                completed: false,
            },
        });
    }

    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::UserId;
    use crate::kernel::{MockAI, MockContentSource, QuizCache, TestDependencies};
    use axum::http::StatusCode;
    use serde_json::json;

    const URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
    const LECTURE: &str = "Welcome to this lecture on photosynthesis. We explain how plants convert light energy into chemical energy.";

    fn quiz_reply(n: usize) -> String {
        let questions: Vec<Value> = (0..n)
            .map(|i| {
                json!({
                    "question": format!("Question {}", i + 1),
                    "options": ["A", "B", "C", "D"],
                    "correct": i % 4,
                    "explanation": "Because"
                })
            })
            .collect();
        json!({"questions": questions, "notes": "<h3>Photosynthesis</h3>"}).to_string()
    }

    fn actor() -> Actor {
        Actor::new(UserId::new(), "ada", false)
    }

    fn request(n: Value, difficulty: &str) -> VideoQuizRequest {
        VideoQuizRequest {
            yt_url: URL.to_string(),
            num_questions: Some(n),
            difficulty: Some(difficulty.to_string()),
        }
    }

    #[tokio::test]
    async fn test_generates_then_serves_from_cache() {
        let ai = MockAI::new()
            .with_response(r#"{"is_educational": true, "reason": "Lecture"}"#)
            .with_response(&quiz_reply(5));
        let test_deps = TestDependencies::new()
            .with_ai(ai)
            .with_content(MockContentSource::transcript(LECTURE));
        let deps = test_deps.into_server_deps();
        let actor = actor();

        let first = generate_video_quiz(&deps, &actor, request(json!(5), "easy"))
            .await
            .unwrap();
        assert!(!first.cached);
        assert_eq!(first.content_source, ContentSource::Transcript);
        assert_eq!(first.response.questions.len(), 5);

        let second = generate_video_quiz(&deps, &actor, request(json!("5"), "easy"))
            .await
            .unwrap();
        assert!(second.cached);
        assert_eq!(second.response, first.response);

        // cache hit skips content fetch and the LLM
        assert_eq!(test_deps.content.calls().len(), 1);
        assert_eq!(test_deps.ai.as_ref().unwrap().call_count(), 2);

        let stored = test_deps
            .store
            .find_quiz(&QuizKey {
                video_id: "dQw4w9WgXcQ".into(),
                num_questions: 5,
                difficulty: Difficulty::Easy,
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.content_hash, generate_content_hash(LECTURE));
        assert_eq!(stored.created_by, Some(actor.user_id));
    }

    #[tokio::test]
    async fn test_different_difficulty_is_a_different_key() {
        let ai = MockAI::new().with_default_response(&quiz_reply(5));
        let test_deps = TestDependencies::new()
            .with_ai(ai)
            .with_content(MockContentSource::transcript(LECTURE));
        let deps = test_deps.into_server_deps();
        let actor = actor();

        // A quiz reply is not a verdict, so the keyword heuristic classifies.
        generate_video_quiz(&deps, &actor, request(json!(5), "easy"))
            .await
            .unwrap();
        let hard = generate_video_quiz(&deps, &actor, request(json!(5), "hard"))
            .await
            .unwrap();
        assert!(!hard.cached);
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected() {
        let deps = TestDependencies::new().into_server_deps();
        let err = generate_video_quiz(
            &deps,
            &actor(),
            VideoQuizRequest {
                yt_url: "https://vimeo.com/123".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Please paste a full, valid YouTube video link.");
    }

    #[tokio::test]
    async fn test_out_of_range_count_is_rejected() {
        let deps = TestDependencies::new().into_server_deps();
        let err = generate_video_quiz(&deps, &actor(), request(json!(25), "easy"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Number of questions must be between 3 and 20.");
    }

    #[tokio::test]
    async fn test_unavailable_content_reports_log() {
        let test_deps = TestDependencies::new().with_content(MockContentSource::unavailable(&[
            "transcript: no captions",
            "watch_page: no usable metadata",
        ]));
        let deps = test_deps.into_server_deps();

        let err = generate_video_quiz(&deps, &actor(), request(json!(5), "medium"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err
            .to_string()
            .ends_with("Debug details:<br>transcript: no captions<br>watch_page: no usable metadata"));
    }

    #[tokio::test]
    async fn test_non_educational_video_is_rejected() {
        let ai = MockAI::new()
            .with_response(r#"{"is_educational": false, "reason": "Music video."}"#);
        let test_deps = TestDependencies::new()
            .with_ai(ai)
            .with_content(MockContentSource::metadata(
                "Summer Hits",
                "Video Title: Summer Hits\n\nVideo Description:\nThe official music video for our new summer single.",
            ));
        let deps = test_deps.into_server_deps();

        let err = generate_video_quiz(&deps, &actor(), request(json!(5), "medium"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err
            .to_string()
            .starts_with("This video does not appear to be educational content. Music video.<br><br>"));
        assert_eq!(test_deps.ai.as_ref().unwrap().call_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_ai_returns_unavailable() {
        let test_deps = TestDependencies::new()
            .without_ai()
            .with_content(MockContentSource::transcript(LECTURE));
        let deps = test_deps.into_server_deps();

        let err = generate_video_quiz(&deps, &actor(), request(json!(5), "medium"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_save_score_and_history() {
        let ai = MockAI::new()
            .with_response(r#"{"is_educational": true, "reason": "ok"}"#)
            .with_response(&quiz_reply(3));
        let test_deps = TestDependencies::new()
            .with_ai(ai)
            .with_content(MockContentSource::transcript(LECTURE));
        let deps = test_deps.into_server_deps();
        let actor = actor();

        generate_video_quiz(&deps, &actor, request(json!(3), "medium"))
            .await
            .unwrap();

        let history = list_user_quizzes(&deps, &actor, None).await.unwrap();
        assert_eq!(history.len(), 1);
        assert!(!history[0].completed);

        let saved = save_quiz_score(
            &deps,
            &actor,
            SaveScoreRequest {
                video_id: Some("dQw4w9WgXcQ".into()),
                video_url: None,
                num_questions: Some(3),
                difficulty: Some("medium".into()),
                score: Some(2),
                total_questions: Some(3),
                user_answers: json!({"0": 0, "1": 1, "2": 3}),
            },
        )
        .await
        .unwrap();
        assert_eq!(saved.percentage, 66.67);
        assert_eq!(saved.message, "Score saved successfully");

        let history = list_user_quizzes(&deps, &actor, Some(10)).await.unwrap();
        assert!(history[0].completed);
        assert_eq!(history[0].score, Some(2));
        assert_eq!(history[0].total_questions, Some(3));
    }

    #[tokio::test]
    async fn test_save_score_validation() {
        let deps = TestDependencies::new().into_server_deps();
        let actor = actor();

        let err = save_quiz_score(&deps, &actor, SaveScoreRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields");

        let err = save_quiz_score(
            &deps,
            &actor,
            SaveScoreRequest {
                video_id: Some("dQw4w9WgXcQ".into()),
                num_questions: Some(5),
                difficulty: Some("easy".into()),
                score: Some(1),
                total_questions: Some(5),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Quiz not found");

        let err = save_quiz_score(
            &deps,
            &actor,
            SaveScoreRequest {
                video_id: Some("dQw4w9WgXcQ".into()),
                num_questions: Some(5),
                difficulty: Some("easy".into()),
                score: Some(6),
                total_questions: Some(5),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
