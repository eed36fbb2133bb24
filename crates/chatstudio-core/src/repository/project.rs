//! ProjectRepository trait definition.

use chatstudio_types::error::RepositoryError;
use chatstudio_types::project::Project;

/// Repository trait for project persistence.
///
/// Implementations live in chatstudio-infra (e.g., `SqliteProjectRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ProjectRepository: Send + Sync {
    /// Insert a new project and return it with its assigned id.
    fn create(
        &self,
        name: &str,
        description: &str,
    ) -> impl std::future::Future<Output = Result<Project, RepositoryError>> + Send;

    /// Get a project by id.
    fn get(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Project>, RepositoryError>> + Send;

    /// List all projects in creation order.
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<Project>, RepositoryError>> + Send;
}
