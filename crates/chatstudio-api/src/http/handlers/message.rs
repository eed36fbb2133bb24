//! Message log HTTP handlers.
//!
//! Endpoints:
//! - GET  /api/v1/sessions/{id}/messages - Session history, oldest first
//! - POST /api/v1/sessions/{id}/messages - Append one message verbatim

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use chatstudio_core::service::store::parse_role;
use chatstudio_types::chat::{ChatMessage, MessageMetadata};

use super::parse_id;
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for a raw append. The role arrives as text so unknown
/// roles get the validation envelope rather than a deserializer rejection.
#[derive(Debug, Deserialize)]
pub struct AppendMessageRequest {
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub metadata: MessageMetadata,
}

/// GET /api/v1/sessions/{id}/messages - List messages of a session.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ChatMessage>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session_id = parse_id(&id)?;
    let messages = state.store.get_messages(session_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(messages, request_id, elapsed)
            .with_link("self", &format!("/api/v1/sessions/{session_id}/messages")),
    ))
}

/// POST /api/v1/sessions/{id}/messages - Append a message without redaction
/// or inference.
pub async fn append_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AppendMessageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ChatMessage>>), AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session_id = parse_id(&id)?;
    let role = parse_role(&body.role)?;

    let message = {
        let _gate = state.turn_gate.lock().await;
        state
            .store
            .add_message(session_id, role, &body.content, body.metadata)
            .await?
    };
    let elapsed = start.elapsed().as_millis() as u64;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(message, request_id, elapsed)),
    ))
}
