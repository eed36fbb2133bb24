//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use chatstudio_types::error::StudioError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Domain errors from the store and the turn controller.
    Studio(StudioError),
    /// Malformed request input caught by the HTTP layer itself.
    Validation(String),
}

impl From<StudioError> for AppError {
    fn from(e: StudioError) -> Self {
        AppError::Studio(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, String, String) {
        match self {
            AppError::Studio(StudioError::Validation(msg)) | AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR".to_string(),
                msg.clone(),
            ),
            AppError::Studio(e @ StudioError::NotFound { entity, .. }) => (
                StatusCode::NOT_FOUND,
                format!("{}_NOT_FOUND", entity.to_uppercase()),
                e.to_string(),
            ),
            AppError::Studio(StudioError::Configuration(msg)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "CONFIGURATION_ERROR".to_string(),
                msg.clone(),
            ),
            AppError::Studio(e @ StudioError::ExternalService(_)) => (
                StatusCode::BAD_GATEWAY,
                "EXTERNAL_SERVICE_ERROR".to_string(),
                e.to_string(),
            ),
            AppError::Studio(e @ StudioError::Storage(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR".to_string(),
                e.to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(%code, "{message}");
        }

        let body = json!({
            "data": null,
            "meta": {
                "request_id": uuid::Uuid::now_v7().to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
