use axum::{
    extract::{Extension, Path},
    Json,
};
use serde_json::{json, Value};

use crate::common::AppError;
use crate::domains::custom_quiz::actions::{
    CreateCustomQuizRequest, CustomQuizView, SubmitAttemptRequest, SubmitAttemptResponse,
    TopicQuizRequest,
};
use crate::domains::custom_quiz;
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

/// POST /api/custom-quizzes
pub async fn create_custom_quiz_handler(
    Extension(deps): Extension<ServerDeps>,
    user: AuthUser,
    Json(request): Json<CreateCustomQuizRequest>,
) -> Result<Json<Value>, AppError> {
    let code = custom_quiz::create_custom_quiz(&deps, &user.actor(), request).await?;
    Ok(Json(json!({ "code": code })))
}

/// POST /api/customquiz/generate
pub async fn topic_quiz_handler(
    Extension(deps): Extension<ServerDeps>,
    _user: AuthUser,
    Json(request): Json<TopicQuizRequest>,
) -> Result<Json<Value>, AppError> {
    let quiz_data = custom_quiz::generate_topic_quiz(&deps, request).await?;
    Ok(Json(json!({ "quiz_data": quiz_data })))
}

/// GET /api/my-custom-quizzes
pub async fn my_custom_quizzes_handler(
    Extension(deps): Extension<ServerDeps>,
    user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let quizzes = custom_quiz::list_my_quizzes(&deps, &user.actor()).await?;
    Ok(Json(json!({ "quizzes": quizzes })))
}

/// GET /api/custom-quizzes/:code
pub async fn custom_quiz_handler(
    Extension(deps): Extension<ServerDeps>,
    user: AuthUser,
    Path(code): Path<String>,
) -> Result<Json<CustomQuizView>, AppError> {
    Ok(Json(
        custom_quiz::fetch_for_attempt(&deps, &user.actor(), &code).await?,
    ))
}

/// POST /api/custom-quizzes/:code/submit
pub async fn submit_custom_quiz_handler(
    Extension(deps): Extension<ServerDeps>,
    user: AuthUser,
    Path(code): Path<String>,
    Json(request): Json<SubmitAttemptRequest>,
) -> Result<Json<SubmitAttemptResponse>, AppError> {
    Ok(Json(
        custom_quiz::submit_attempt(&deps, &user.actor(), &code, request).await?,
    ))
}

/// GET /api/custom-quizzes/:code/attempts
pub async fn custom_quiz_attempts_handler(
    Extension(deps): Extension<ServerDeps>,
    user: AuthUser,
    Path(code): Path<String>,
) -> Result<Json<Value>, AppError> {
    let attempts = custom_quiz::list_attempts(&deps, &user.actor(), &code).await?;
    Ok(Json(json!({ "attempts": attempts })))
}

/// DELETE /api/custom-quizzes/:code/attempts/:attempt_id
pub async fn delete_custom_quiz_attempt_handler(
    Extension(deps): Extension<ServerDeps>,
    user: AuthUser,
    Path((code, attempt_id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    custom_quiz::delete_attempt(&deps, &user.actor(), &code, &attempt_id).await?;
    Ok(Json(json!({ "success": true })))
}

/// POST /api/custom-quizzes/:code/toggle-active
pub async fn toggle_custom_quiz_handler(
    Extension(deps): Extension<ServerDeps>,
    user: AuthUser,
    Path(code): Path<String>,
) -> Result<Json<Value>, AppError> {
    let active = custom_quiz::toggle_active(&deps, &user.actor(), &code).await?;
    Ok(Json(json!({ "active": active })))
}
