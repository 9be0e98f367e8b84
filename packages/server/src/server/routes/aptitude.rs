use axum::{
    extract::{Extension, Query},
    Json,
};

use crate::common::AppError;
use crate::domains::aptitude::actions::{
    AnswerRequest, AnswerResponse, GenerateRequest, GenerateResponse, PracticeQuery, PracticeSet,
};
use crate::domains::aptitude;
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

/// GET /api/aptitude/questions
pub async fn aptitude_questions_handler(
    Extension(deps): Extension<ServerDeps>,
    _user: AuthUser,
    Query(query): Query<PracticeQuery>,
) -> Result<Json<PracticeSet>, AppError> {
    Ok(Json(aptitude::sample_questions(&deps, query).await?))
}

/// POST /api/aptitude/generate-questions (admin)
pub async fn aptitude_generate_handler(
    Extension(deps): Extension<ServerDeps>,
    user: AuthUser,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    Ok(Json(
        aptitude::generate_questions(&deps, &user.actor(), request).await?,
    ))
}

/// POST /api/aptitude/submit-answer
pub async fn aptitude_answer_handler(
    Extension(deps): Extension<ServerDeps>,
    user: AuthUser,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    Ok(Json(
        aptitude::submit_answer(&deps, &user.actor(), request).await?,
    ))
}
