//! Session HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/projects/{id}/sessions - Create a session in a project
//! - GET  /api/v1/projects/{id}/sessions - List sessions of a project
//! - GET  /api/v1/sessions/{id}          - Get a single session
//! - GET  /api/v1/sessions/{id}/export   - Download the session as JSON Lines

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use chatstudio_core::chat::export::{JSONL_CONTENT_TYPE, export_file_name};
use chatstudio_types::project::{CreateSessionRequest, Session};

use super::parse_id;
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/projects/{id}/sessions - Create a session.
pub async fn create_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Session>>), AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let project_id = parse_id(&id)?;
    let session = state.store.create_session(project_id, &body.title).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let href = format!("/api/v1/sessions/{}", session.id);
    let messages_href = format!("{href}/messages");
    let resp = ApiResponse::success(session, request_id, elapsed)
        .with_link("self", &href)
        .with_link("messages", &messages_href);

    Ok((StatusCode::CREATED, Json(resp)))
}

/// GET /api/v1/projects/{id}/sessions - List sessions of a project.
pub async fn list_sessions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Session>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let project_id = parse_id(&id)?;
    let sessions = state.store.list_sessions(project_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(sessions, request_id, elapsed)
            .with_link("self", &format!("/api/v1/projects/{project_id}/sessions")),
    ))
}

/// GET /api/v1/sessions/{id} - Get a session by id.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Session>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session_id = parse_id(&id)?;
    let session = state.store.get_session(session_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let project_href = format!("/api/v1/projects/{}", session.project_id);
    Ok(Json(
        ApiResponse::success(session, request_id, elapsed)
            .with_link("self", &format!("/api/v1/sessions/{session_id}"))
            .with_link("project", &project_href)
            .with_link("messages", &format!("/api/v1/sessions/{session_id}/messages")),
    ))
}

/// GET /api/v1/sessions/{id}/export - JSON Lines attachment.
pub async fn export_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let session_id = parse_id(&id)?;
    let body = state.store.export_session(session_id).await?;

    let disposition = format!("attachment; filename=\"{}\"", export_file_name(session_id));
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, JSONL_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
