use axum::{
    extract::{Extension, Query},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::common::AppError;
use crate::domains::quiz::actions::{SaveScoreResponse, VideoQuizResponse};
use crate::domains::quiz::{self, SaveScoreRequest, VideoQuizRequest};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

/// POST /api/videoquiz
pub async fn video_quiz_handler(
    Extension(deps): Extension<ServerDeps>,
    user: AuthUser,
    Json(request): Json<VideoQuizRequest>,
) -> Result<Json<VideoQuizResponse>, AppError> {
    let response = quiz::generate_video_quiz(&deps, &user.actor(), request).await?;
    Ok(Json(response))
}

/// POST /api/save-quiz-score
pub async fn save_quiz_score_handler(
    Extension(deps): Extension<ServerDeps>,
    user: AuthUser,
    Json(request): Json<SaveScoreRequest>,
) -> Result<Json<SaveScoreResponse>, AppError> {
    let response = quiz::save_quiz_score(&deps, &user.actor(), request).await?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// GET /api/user-quizzes
pub async fn user_quizzes_handler(
    Extension(deps): Extension<ServerDeps>,
    user: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Value>, AppError> {
    let quizzes = quiz::list_user_quizzes(&deps, &user.actor(), query.limit).await?;
    Ok(Json(json!({ "quizzes": quizzes })))
}
