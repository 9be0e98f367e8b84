use axum::{extract::Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::common::AppError;
use crate::domains::chat;
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// POST /api/chat
pub async fn chat_handler(
    Extension(deps): Extension<ServerDeps>,
    _user: AuthUser,
    Json(request): Json<ChatRequest>,
) -> Result<Json<Value>, AppError> {
    let answer = chat::ask(deps.ai(), &request.message).await?;
    Ok(Json(json!({ "response": answer })))
}
