//! ChatRepository trait definition.
//!
//! Provides create/read operations for sessions and the append-only message
//! log. Follows the same RPITIT pattern as `ProjectRepository`.

use chatstudio_types::chat::{ChatMessage, MessageMetadata, MessageRole};
use chatstudio_types::error::RepositoryError;
use chatstudio_types::project::Session;

/// Repository trait for session and message persistence.
pub trait ChatRepository: Send + Sync {
    /// Create a new session under a project.
    ///
    /// Returns `RepositoryError::NotFound` if the project does not exist.
    fn create_session(
        &self,
        project_id: i64,
        title: &str,
    ) -> impl std::future::Future<Output = Result<Session, RepositoryError>> + Send;

    /// Get a session by its id.
    fn get_session(
        &self,
        session_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Session>, RepositoryError>> + Send;

    /// List sessions for a project, in creation order.
    fn list_sessions(
        &self,
        project_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Session>, RepositoryError>> + Send;

    /// Append a message to a session. The store assigns id and `created_at`.
    ///
    /// Returns `RepositoryError::NotFound` if the session does not exist.
    fn append_message(
        &self,
        session_id: i64,
        role: MessageRole,
        content: &str,
        metadata: &MessageMetadata,
    ) -> impl std::future::Future<Output = Result<ChatMessage, RepositoryError>> + Send;

    /// Get messages for a session, ordered by created_at ASC (id breaks ties).
    fn get_messages(
        &self,
        session_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;
}
