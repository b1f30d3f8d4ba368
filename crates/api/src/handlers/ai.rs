//! AI legal assistant.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::require_text;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
    /// URL, `/files/...` path, or file name of a document to discuss.
    pub document_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
    pub truncated: bool,
    pub model: String,
}

/// POST /api/v1/ai/legal/chat
pub async fn chat(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    require_text("prompt", &input.prompt)?;
    let assistant = state
        .assistant
        .as_deref()
        .ok_or(AppError::ServiceUnavailable("AI assistant"))?;

    tracing::info!(
        actor = %user.actor,
        with_document = input.document_url.is_some(),
        "Legal assistant request"
    );
    let answer = assistant
        .answer(input.prompt.trim(), input.document_url.as_deref())
        .await?;

    Ok(Json(ChatResponse {
        answer: answer.answer,
        truncated: answer.truncated,
        model: answer.model,
    }))
}
