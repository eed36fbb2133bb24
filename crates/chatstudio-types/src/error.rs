use thiserror::Error;

use crate::llm::LlmError;

/// Errors surfaced to the caller of any studio operation.
///
/// None of these are fatal: the store stays usable for further turns
/// after any single failure.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("external service error: {0}")]
    ExternalService(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl StudioError {
    pub fn project_not_found(id: i64) -> Self {
        StudioError::NotFound {
            entity: "project",
            id,
        }
    }

    pub fn session_not_found(id: i64) -> Self {
        StudioError::NotFound {
            entity: "session",
            id,
        }
    }
}

impl From<LlmError> for StudioError {
    fn from(e: LlmError) -> Self {
        StudioError::ExternalService(e.to_string())
    }
}

impl From<RepositoryError> for StudioError {
    fn from(e: RepositoryError) -> Self {
        StudioError::Storage(e.to_string())
    }
}

/// Errors from repository operations (used by trait definitions in chatstudio-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}
