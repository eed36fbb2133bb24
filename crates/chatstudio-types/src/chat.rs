//! Message and turn types for Chatbot Studio.
//!
//! Messages form an append-only log per session, ordered by `created_at`.
//! A turn is one user submission and produces up to three messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::llm::{MessageRole, ReasoningEffort};

/// Free-form structured metadata attached to a message
/// (temperature, reasoning effort, model name, latency, ...).
pub type MessageMetadata = serde_json::Map<String, serde_json::Value>;

/// A single message within a session. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub session_id: i64,
    pub role: MessageRole,
    pub content: String,
    #[serde(default)]
    pub metadata: MessageMetadata,
    pub created_at: DateTime<Utc>,
}

/// Everything the shell collects for one turn, except the credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRequest {
    /// Optional system-role text; blank text is ignored.
    pub system: Option<String>,
    pub prompt: String,
    pub model: String,
    pub temperature: f64,
    pub reasoning_effort: ReasoningEffort,
    /// Redact emails and phone numbers from the prompt before storing it.
    pub anonymize: bool,
    /// Persist the prompt without calling the model.
    pub save_only: bool,
}

/// Terminal state of a turn that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    SendSkipped,
    Sent,
}

/// Messages written by a completed turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub status: TurnStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_message: Option<ChatMessage>,
    pub user_message: ChatMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant_message: Option<ChatMessage>,
}
