//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `chatstudio-core` using sqlx with split
//! read/write pools. Follows the same patterns as `SqliteProjectRepository`:
//! raw queries, private Row structs, reader for SELECTs, writer for INSERTs.

use chatstudio_core::chat::repository::ChatRepository;
use chatstudio_types::chat::{ChatMessage, MessageMetadata, MessageRole};
use chatstudio_types::error::RepositoryError;
use chatstudio_types::project::Session;
use chrono::{SubsecRound, Utc};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, map_insert_error, map_query_error, parse_datetime};

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct SessionRow {
    id: i64,
    project_id: i64,
    title: String,
    created_at: String,
}

impl SessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            project_id: row.try_get("project_id")?,
            title: row.try_get("title")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_session(self) -> Result<Session, RepositoryError> {
        Ok(Session {
            id: self.id,
            project_id: self.project_id,
            title: self.title,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

struct MessageRow {
    id: i64,
    session_id: i64,
    role: String,
    content: String,
    metadata: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            metadata: row.try_get("metadata")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let metadata: MessageMetadata = serde_json::from_str(&self.metadata)
            .map_err(|e| RepositoryError::Query(format!("invalid metadata: {e}")))?;

        Ok(ChatMessage {
            id: self.id,
            session_id: self.session_id,
            role,
            content: self.content,
            metadata,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// ChatRepository implementation
// ---------------------------------------------------------------------------

impl ChatRepository for SqliteChatRepository {
    async fn create_session(
        &self,
        project_id: i64,
        title: &str,
    ) -> Result<Session, RepositoryError> {
        let created_at = Utc::now().trunc_subsecs(6);

        let result = sqlx::query(
            "INSERT INTO sessions (project_id, title, created_at) VALUES (?, ?, ?)",
        )
        .bind(project_id)
        .bind(title)
        .bind(format_datetime(&created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(map_insert_error)?;

        Ok(Session {
            id: result.last_insert_rowid(),
            project_id,
            title: title.to_string(),
            created_at,
        })
    }

    async fn get_session(&self, session_id: i64) -> Result<Option<Session>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM sessions WHERE id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_query_error)?;

        match row {
            Some(row) => {
                let session_row =
                    SessionRow::from_row(&row).map_err(map_query_error)?;
                Ok(Some(session_row.into_session()?))
            }
            None => Ok(None),
        }
    }

    async fn list_sessions(&self, project_id: i64) -> Result<Vec<Session>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM sessions WHERE project_id = ? ORDER BY id ASC")
            .bind(project_id)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_query_error)?;

        let mut sessions = Vec::with_capacity(rows.len());
        for row in &rows {
            let session_row =
                SessionRow::from_row(row).map_err(map_query_error)?;
            sessions.push(session_row.into_session()?);
        }

        Ok(sessions)
    }

    async fn append_message(
        &self,
        session_id: i64,
        role: MessageRole,
        content: &str,
        metadata: &MessageMetadata,
    ) -> Result<ChatMessage, RepositoryError> {
        let metadata_json = serde_json::to_string(metadata)
            .map_err(|e| RepositoryError::Query(format!("invalid metadata: {e}")))?;
        let now = format_datetime(&Utc::now());

        // created_at never goes below the session's latest entry, so the log
        // stays non-decreasing even if the wall clock steps back.
        let row = sqlx::query(
            r#"INSERT INTO messages (session_id, role, content, metadata, created_at)
               VALUES (?, ?, ?, ?, MAX(?, COALESCE((SELECT MAX(created_at) FROM messages WHERE session_id = ?), '')))
               RETURNING id, created_at"#,
        )
        .bind(session_id)
        .bind(role.to_string())
        .bind(content)
        .bind(&metadata_json)
        .bind(&now)
        .bind(session_id)
        .fetch_one(&self.pool.writer)
        .await
        .map_err(map_insert_error)?;

        let id: i64 = row
            .try_get("id")
            .map_err(map_query_error)?;
        let created_at: String = row
            .try_get("created_at")
            .map_err(map_query_error)?;

        Ok(ChatMessage {
            id,
            session_id,
            role,
            content: content.to_string(),
            metadata: metadata.clone(),
            created_at: parse_datetime(&created_at)?,
        })
    }

    async fn get_messages(&self, session_id: i64) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM messages WHERE session_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_query_error)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row =
                MessageRow::from_row(row).map_err(map_query_error)?;
            messages.push(msg_row.into_message()?);
        }

        Ok(messages)
    }
}
