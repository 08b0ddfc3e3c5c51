/// Project model and database operations
///
/// A project is owned by exactly one user and groups tasks. Other users gain
/// access through [`crate::models::project_member`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id BIGSERIAL PRIMARY KEY,
///     name TEXT NOT NULL,
///     description TEXT,
///     owner_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     is_archived BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE INDEX ix_projects_owner_id ON projects(owner_id);
/// ```
///
/// Deleting a project deletes its tasks (and through them their
/// assignments) and its memberships.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::project::{CreateProject, Project, UpdateProject};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, owner_id: i64) -> Result<(), Box<dyn std::error::Error>> {
/// let project = Project::create(&pool, CreateProject {
///     name: "Website relaunch".to_string(),
///     description: None,
///     owner_id,
/// }).await?;
///
/// // Archive it without touching the name or description
/// Project::update(&pool, project.id, UpdateProject {
///     is_archived: Some(true),
///     ..Default::default()
/// }).await?;
/// # Ok(())
/// # }
/// ```

use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

/// Project row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,

    /// Owning user; the project is deleted with them
    pub owner_id: i64,

    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: i64,
}

/// Field-level patch for a project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,

    /// `Some(None)` clears the description
    #[serde(default, deserialize_with = "super::double_option")]
    pub description: Option<Option<String>>,

    pub is_archived: Option<bool>,
}

impl Project {
    /// Inserts a new project
    ///
    /// # Errors
    ///
    /// [`StoreError::ForeignKeyViolation`] if `owner_id` does not reference a user.
    pub async fn create(pool: &PgPool, data: CreateProject) -> StoreResult<Self> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, owner_id, is_archived, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.owner_id)
        .fetch_one(pool)
        .await?;

        debug!(project_id = project.id, owner_id = project.owner_id, "Created project");
        Ok(project)
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> StoreResult<Option<Self>> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, owner_id, is_archived, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Like [`Project::find_by_id`] but a missing row is [`StoreError::NotFound`]
    pub async fn get(pool: &PgPool, id: i64) -> StoreResult<Self> {
        Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| StoreError::not_found("project", id))
    }

    /// Lists all projects in insertion order
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> StoreResult<Vec<Self>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, owner_id, is_archived, created_at, updated_at
            FROM projects
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Lists the projects a user owns
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: i64,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Self>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, owner_id, is_archived, created_at, updated_at
            FROM projects
            WHERE owner_id = $1
            ORDER BY id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Applies a patch and bumps `updated_at`
    ///
    /// Returns `None` if the project does not exist.
    pub async fn update(pool: &PgPool, id: i64, data: UpdateProject) -> StoreResult<Option<Self>> {
        let mut query = QueryBuilder::<Postgres>::new("UPDATE projects SET updated_at = NOW()");

        if let Some(name) = data.name {
            query.push(", name = ").push_bind(name);
        }
        if let Some(description) = data.description {
            query.push(", description = ").push_bind(description);
        }
        if let Some(is_archived) = data.is_archived {
            query.push(", is_archived = ").push_bind(is_archived);
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(
            " RETURNING id, name, description, owner_id, is_archived, created_at, updated_at",
        );

        let project = query.build_query_as::<Project>().fetch_optional(pool).await?;

        Ok(project)
    }

    /// Deletes a project with its tasks and memberships
    pub async fn delete(pool: &PgPool, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        debug!(project_id = id, deleted = result.rows_affected(), "Deleted project");
        Ok(result.rows_affected() > 0)
    }

    /// True when the user owns the project or is one of its members
    pub async fn has_access(pool: &PgPool, project_id: i64, user_id: i64) -> StoreResult<bool> {
        let has_access: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM projects p
                LEFT JOIN project_members pm
                       ON pm.project_id = p.id AND pm.user_id = $2
                WHERE p.id = $1
                  AND (p.owner_id = $2 OR pm.user_id IS NOT NULL)
            )
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(has_access)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_project_default() {
        let update = UpdateProject::default();
        assert!(update.name.is_none());
        assert!(update.description.is_none());
        assert!(update.is_archived.is_none());
    }

    #[test]
    fn test_update_project_clear_description() {
        // Explicit null clears, a missing field leaves the column alone
        let clear: UpdateProject = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(clear.description, Some(None));

        let untouched: UpdateProject = serde_json::from_str(r#"{"name": "Renamed"}"#).unwrap();
        assert_eq!(untouched.description, None);
        assert_eq!(untouched.name.as_deref(), Some("Renamed"));

        let set: UpdateProject = serde_json::from_str(r#"{"description": "Q3 roadmap"}"#).unwrap();
        assert_eq!(set.description, Some(Some("Q3 roadmap".to_string())));
    }
}
