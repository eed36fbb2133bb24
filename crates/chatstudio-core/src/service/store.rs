//! Store service: validated create/list/read over projects, sessions and
//! the message log.
//!
//! Repositories only persist. This service owns the contract callers see:
//! empty names and titles are rejected, references to unknown projects or
//! sessions fail with `NotFound`, and storage failures surface as
//! `StudioError::Storage`.

use chatstudio_types::chat::{ChatMessage, MessageMetadata, MessageRole};
use chatstudio_types::error::{RepositoryError, StudioError};
use chatstudio_types::project::{Project, Session};
use tracing::{debug, info};

use crate::chat::export;
use crate::chat::repository::ChatRepository;
use crate::repository::project::ProjectRepository;

/// Validated access to the studio's persistent store.
///
/// Generic over the repository traits so that chatstudio-core never depends
/// on chatstudio-infra.
pub struct StoreService<P: ProjectRepository, C: ChatRepository> {
    project_repo: P,
    chat_repo: C,
}

impl<P: ProjectRepository, C: ChatRepository> StoreService<P, C> {
    pub fn new(project_repo: P, chat_repo: C) -> Self {
        Self {
            project_repo,
            chat_repo,
        }
    }

    // --- Projects ---

    /// Create a project. The name is trimmed and must not be empty.
    pub async fn create_project(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Project, StudioError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StudioError::Validation(
                "project name cannot be empty".to_string(),
            ));
        }

        let project = self.project_repo.create(name, description).await?;
        info!(project_id = project.id, name = %project.name, "Project created");
        Ok(project)
    }

    /// All projects, in creation order.
    pub async fn list_projects(&self) -> Result<Vec<Project>, StudioError> {
        Ok(self.project_repo.list().await?)
    }

    pub async fn get_project(&self, project_id: i64) -> Result<Project, StudioError> {
        self.project_repo
            .get(project_id)
            .await?
            .ok_or_else(|| StudioError::project_not_found(project_id))
    }

    // --- Sessions ---

    /// Create a session under an existing project. The title is trimmed and
    /// must not be empty.
    pub async fn create_session(
        &self,
        project_id: i64,
        title: &str,
    ) -> Result<Session, StudioError> {
        self.get_project(project_id).await?;

        let title = title.trim();
        if title.is_empty() {
            return Err(StudioError::Validation(
                "session title cannot be empty".to_string(),
            ));
        }

        let session = self
            .chat_repo
            .create_session(project_id, title)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => StudioError::project_not_found(project_id),
                other => other.into(),
            })?;
        info!(session_id = session.id, project_id, title = %session.title, "Session created");
        Ok(session)
    }

    /// Sessions of a project, in creation order. Unknown projects have none.
    pub async fn list_sessions(&self, project_id: i64) -> Result<Vec<Session>, StudioError> {
        Ok(self.chat_repo.list_sessions(project_id).await?)
    }

    pub async fn get_session(&self, session_id: i64) -> Result<Session, StudioError> {
        self.chat_repo
            .get_session(session_id)
            .await?
            .ok_or_else(|| StudioError::session_not_found(session_id))
    }

    // --- Messages ---

    /// Append a message to an existing session.
    pub async fn add_message(
        &self,
        session_id: i64,
        role: MessageRole,
        content: &str,
        metadata: MessageMetadata,
    ) -> Result<ChatMessage, StudioError> {
        self.get_session(session_id).await?;

        let message = self
            .chat_repo
            .append_message(session_id, role, content, &metadata)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => StudioError::session_not_found(session_id),
                other => other.into(),
            })?;
        debug!(message_id = message.id, session_id, role = %role, "Message appended");
        Ok(message)
    }

    /// Messages of a session, oldest first. Unknown sessions have none.
    pub async fn get_messages(&self, session_id: i64) -> Result<Vec<ChatMessage>, StudioError> {
        Ok(self.chat_repo.get_messages(session_id).await?)
    }

    /// Render an existing session's history as JSON lines.
    pub async fn export_session(&self, session_id: i64) -> Result<Vec<u8>, StudioError> {
        self.get_session(session_id).await?;
        let messages = self.get_messages(session_id).await?;
        export::to_jsonl(&messages)
            .map_err(|e| StudioError::Storage(format!("failed to serialize export: {e}")))
    }
}

/// Parse a role received as text. Only the exact lowercase names
/// `system`, `user` and `assistant` are accepted.
pub fn parse_role(role: &str) -> Result<MessageRole, StudioError> {
    role.parse::<MessageRole>().map_err(StudioError::Validation)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    use chrono::Utc;

    /// In-memory repositories shared by the core tests.
    #[derive(Default)]
    pub(crate) struct MemoryRepo {
        projects: Mutex<Vec<Project>>,
        sessions: Mutex<Vec<Session>>,
        messages: Mutex<Vec<ChatMessage>>,
    }

    impl ProjectRepository for std::sync::Arc<MemoryRepo> {
        async fn create(&self, name: &str, description: &str) -> Result<Project, RepositoryError> {
            let mut projects = self.projects.lock().unwrap();
            let project = Project {
                id: projects.len() as i64 + 1,
                name: name.to_string(),
                description: description.to_string(),
                created_at: Utc::now(),
            };
            projects.push(project.clone());
            Ok(project)
        }

        async fn get(&self, id: i64) -> Result<Option<Project>, RepositoryError> {
            Ok(self.projects.lock().unwrap().iter().find(|p| p.id == id).cloned())
        }

        async fn list(&self) -> Result<Vec<Project>, RepositoryError> {
            Ok(self.projects.lock().unwrap().clone())
        }
    }

    impl ChatRepository for std::sync::Arc<MemoryRepo> {
        async fn create_session(
            &self,
            project_id: i64,
            title: &str,
        ) -> Result<Session, RepositoryError> {
            let mut sessions = self.sessions.lock().unwrap();
            let session = Session {
                id: sessions.len() as i64 + 1,
                project_id,
                title: title.to_string(),
                created_at: Utc::now(),
            };
            sessions.push(session.clone());
            Ok(session)
        }

        async fn get_session(&self, session_id: i64) -> Result<Option<Session>, RepositoryError> {
            Ok(self
                .sessions
                .lock()
                .unwrap()
                .iter()
                .find(|s| s.id == session_id)
                .cloned())
        }

        async fn list_sessions(&self, project_id: i64) -> Result<Vec<Session>, RepositoryError> {
            Ok(self
                .sessions
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.project_id == project_id)
                .cloned()
                .collect())
        }

        async fn append_message(
            &self,
            session_id: i64,
            role: MessageRole,
            content: &str,
            metadata: &MessageMetadata,
        ) -> Result<ChatMessage, RepositoryError> {
            let mut messages = self.messages.lock().unwrap();
            let message = ChatMessage {
                id: messages.len() as i64 + 1,
                session_id,
                role,
                content: content.to_string(),
                metadata: metadata.clone(),
                created_at: Utc::now(),
            };
            messages.push(message.clone());
            Ok(message)
        }

        async fn get_messages(&self, session_id: i64) -> Result<Vec<ChatMessage>, RepositoryError> {
            Ok(self
                .messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.session_id == session_id)
                .cloned()
                .collect())
        }
    }

    pub(crate) type MemoryStore =
        StoreService<std::sync::Arc<MemoryRepo>, std::sync::Arc<MemoryRepo>>;

    pub(crate) fn memory_store() -> MemoryStore {
        let repo = std::sync::Arc::new(MemoryRepo::default());
        StoreService::new(repo.clone(), repo)
    }

    #[tokio::test]
    async fn test_create_project_then_list() {
        let store = memory_store();
        let a = store.create_project("Sales assistant", "Upbeat").await.unwrap();
        let b = store.create_project("  Support bot  ", "").await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(b.name, "Support bot");

        let names: Vec<String> = store
            .list_projects()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Sales assistant", "Support bot"]);
    }

    #[tokio::test]
    async fn test_create_project_rejects_blank_name() {
        let store = memory_store();
        let err = store.create_project("   ", "desc").await.unwrap_err();
        assert!(matches!(err, StudioError::Validation(_)));
        assert!(store.list_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_session_unknown_project() {
        let store = memory_store();
        let err = store.create_session(99, "Tone tests").await.unwrap_err();
        assert!(matches!(err, StudioError::NotFound { entity: "project", id: 99 }));
    }

    #[tokio::test]
    async fn test_create_session_rejects_blank_title() {
        let store = memory_store();
        let project = store.create_project("P", "").await.unwrap();
        let err = store.create_session(project.id, "").await.unwrap_err();
        assert!(matches!(err, StudioError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_sessions_scoped_to_project() {
        let store = memory_store();
        let p1 = store.create_project("P1", "").await.unwrap();
        let p2 = store.create_project("P2", "").await.unwrap();
        store.create_session(p1.id, "first").await.unwrap();
        store.create_session(p2.id, "other").await.unwrap();
        store.create_session(p1.id, "second").await.unwrap();

        let titles: Vec<String> = store
            .list_sessions(p1.id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_add_message_unknown_session() {
        let store = memory_store();
        let err = store
            .add_message(5, MessageRole::User, "hi", MessageMetadata::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::NotFound { entity: "session", id: 5 }));
    }

    #[tokio::test]
    async fn test_export_session_unknown_session() {
        let store = memory_store();
        let err = store.export_session(1).await.unwrap_err();
        assert!(matches!(err, StudioError::NotFound { .. }));
    }

    #[test]
    fn test_parse_role() {
        assert_eq!(parse_role("assistant").unwrap(), MessageRole::Assistant);
        assert!(matches!(parse_role("tool"), Err(StudioError::Validation(_))));
        assert!(matches!(parse_role("Assistant"), Err(StudioError::Validation(_))));
        assert!(matches!(parse_role("SYSTEM"), Err(StudioError::Validation(_))));
    }
}
