//! Project HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/projects       - Create a project
//! - GET  /api/v1/projects       - List projects
//! - GET  /api/v1/projects/{id}  - Get a single project

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use chatstudio_types::project::{CreateProjectRequest, Project};

use super::parse_id;
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/projects - Create a new project.
pub async fn create_project(
    State(state): State<AppState>,
    Json(body): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Project>>), AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let project = state
        .store
        .create_project(&body.name, &body.description)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let href = format!("/api/v1/projects/{}", project.id);
    let sessions_href = format!("{href}/sessions");
    let resp = ApiResponse::success(project, request_id, elapsed)
        .with_link("self", &href)
        .with_link("sessions", &sessions_href);

    Ok((StatusCode::CREATED, Json(resp)))
}

/// GET /api/v1/projects - List all projects.
pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Project>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let projects = state.store.list_projects().await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(projects, request_id, elapsed).with_link("self", "/api/v1/projects"),
    ))
}

/// GET /api/v1/projects/{id} - Get a project by id.
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Project>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let project_id = parse_id(&id)?;
    let project = state.store.get_project(project_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let href = format!("/api/v1/projects/{project_id}");
    let sessions_href = format!("{href}/sessions");
    Ok(Json(
        ApiResponse::success(project, request_id, elapsed)
            .with_link("self", &href)
            .with_link("sessions", &sessions_href),
    ))
}
