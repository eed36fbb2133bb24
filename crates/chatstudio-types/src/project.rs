//! Project and conversation session types.
//!
//! A project groups conversations for one chatbot use case (tone, purpose,
//! constraints). Both are created once and never mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level grouping for a chatbot use case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// One conversation thread within a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Request to create a new project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Request to create a new session under a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub title: String,
}
