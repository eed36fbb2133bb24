//! SQLite project repository implementation.

use chatstudio_core::repository::project::ProjectRepository;
use chatstudio_types::error::RepositoryError;
use chatstudio_types::project::Project;
use chrono::{SubsecRound, Utc};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, map_query_error, parse_datetime};

/// SQLite-backed implementation of `ProjectRepository`.
pub struct SqliteProjectRepository {
    pool: DatabasePool,
}

impl SqliteProjectRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Project.
struct ProjectRow {
    id: i64,
    name: String,
    description: String,
    created_at: String,
}

impl ProjectRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_project(self) -> Result<Project, RepositoryError> {
        Ok(Project {
            id: self.id,
            name: self.name,
            description: self.description,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl ProjectRepository for SqliteProjectRepository {
    async fn create(&self, name: &str, description: &str) -> Result<Project, RepositoryError> {
        // Stored at microsecond precision; return exactly what a read yields.
        let created_at = Utc::now().trunc_subsecs(6);

        let result = sqlx::query(
            "INSERT INTO projects (name, description, created_at) VALUES (?, ?, ?)",
        )
        .bind(name)
        .bind(description)
        .bind(format_datetime(&created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(map_query_error)?;

        Ok(Project {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            description: description.to_string(),
            created_at,
        })
    }

    async fn get(&self, id: i64) -> Result<Option<Project>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_query_error)?;

        match row {
            Some(row) => {
                let project_row =
                    ProjectRow::from_row(&row).map_err(map_query_error)?;
                Ok(Some(project_row.into_project()?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Project>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM projects ORDER BY id ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_query_error)?;

        let mut projects = Vec::with_capacity(rows.len());
        for row in &rows {
            let project_row =
                ProjectRow::from_row(row).map_err(map_query_error)?;
            projects.push(project_row.into_project()?);
        }

        Ok(projects)
    }
}
