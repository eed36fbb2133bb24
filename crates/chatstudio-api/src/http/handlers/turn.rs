//! Turn HTTP handler.
//!
//! - POST /api/v1/sessions/{id}/turns - Run one turn through the controller

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use secrecy::ExposeSecret;
use serde::Deserialize;
use uuid::Uuid;

use chatstudio_infra::secret::resolve_api_key;
use chatstudio_types::chat::{ReasoningEffort, TurnOutcome, TurnRequest, TurnStatus};

use super::parse_id;
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for a turn. Omitted fields fall back to the studio config.
#[derive(Debug, Deserialize)]
pub struct RunTurnRequest {
    #[serde(default)]
    pub system: Option<String>,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub reasoning_effort: Option<ReasoningEffort>,
    #[serde(default)]
    pub anonymize: Option<bool>,
    #[serde(default)]
    pub save_only: bool,
    /// Credential for this turn only; falls back to `OPENAI_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// POST /api/v1/sessions/{id}/turns - Run one turn.
///
/// Responds 201 with the messages written. A failed send still leaves the
/// system/user messages in the log; the error envelope reports the cause.
pub async fn run_turn(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<RunTurnRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TurnOutcome>>), AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session_id = parse_id(&id)?;
    let request = TurnRequest {
        system: body.system,
        prompt: body.prompt,
        model: body.model.unwrap_or_else(|| state.config.model.clone()),
        temperature: body.temperature.unwrap_or(state.config.temperature),
        reasoning_effort: body.reasoning_effort.unwrap_or(state.config.reasoning_effort),
        anonymize: body.anonymize.unwrap_or(state.config.anonymize),
        save_only: body.save_only,
    };
    let api_key = resolve_api_key(body.api_key.as_deref(), &state.credentials);

    let outcome = {
        let _gate = state.turn_gate.lock().await;
        state
            .turns
            .run_turn(
                session_id,
                &request,
                api_key.as_ref().map(|k| k.expose_secret()),
            )
            .await?
    };
    let elapsed = start.elapsed().as_millis() as u64;

    tracing::debug!(
        session_id,
        sent = outcome.status == TurnStatus::Sent,
        elapsed_ms = elapsed,
        "Turn completed"
    );

    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::success(outcome, request_id, elapsed)
                .with_link("messages", &format!("/api/v1/sessions/{session_id}/messages")),
        ),
    ))
}
