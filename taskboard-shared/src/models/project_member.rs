/// Project membership model and database operations
///
/// Links users to projects they do not own. The composite primary key makes a
/// user a member of a given project at most once, and the row disappears when
/// either the project or the user is deleted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE project_members (
///     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     joined_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT project_members_pkey PRIMARY KEY (project_id, user_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::project_member::{CreateProjectMember, ProjectMember};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, project_id: i64, user_id: i64) -> Result<(), Box<dyn std::error::Error>> {
/// ProjectMember::create(&pool, CreateProjectMember { project_id, user_id }).await?;
/// assert!(ProjectMember::is_member(&pool, project_id, user_id).await?);
///
/// ProjectMember::delete(&pool, project_id, user_id).await?;
/// # Ok(())
/// # }
/// ```

use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::debug;

/// Membership row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectMember {
    pub project_id: i64,
    pub user_id: i64,
    pub joined_at: DateTime<Utc>,
}

/// Input for adding a user to a project
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CreateProjectMember {
    pub project_id: i64,
    pub user_id: i64,
}

impl ProjectMember {
    /// Adds a user to a project
    ///
    /// # Errors
    ///
    /// - [`StoreError::UniqueViolation`] (`project_members_pkey`) if already a member
    /// - [`StoreError::ForeignKeyViolation`] if the project or user does not exist
    pub async fn create(pool: &PgPool, data: CreateProjectMember) -> StoreResult<Self> {
        let member = sqlx::query_as::<_, ProjectMember>(
            r#"
            INSERT INTO project_members (project_id, user_id)
            VALUES ($1, $2)
            RETURNING project_id, user_id, joined_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.user_id)
        .fetch_one(pool)
        .await?;

        debug!(
            project_id = member.project_id,
            user_id = member.user_id,
            "Added project member"
        );
        Ok(member)
    }

    /// Finds a membership by its composite key
    pub async fn find(pool: &PgPool, project_id: i64, user_id: i64) -> StoreResult<Option<Self>> {
        let member = sqlx::query_as::<_, ProjectMember>(
            r#"
            SELECT project_id, user_id, joined_at
            FROM project_members
            WHERE project_id = $1 AND user_id = $2
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(member)
    }

    /// Like [`ProjectMember::find`] but a missing row is [`StoreError::NotFound`]
    pub async fn get(pool: &PgPool, project_id: i64, user_id: i64) -> StoreResult<Self> {
        Self::find(pool, project_id, user_id)
            .await?
            .ok_or_else(|| {
                StoreError::not_found("project member", format!("({}, {})", project_id, user_id))
            })
    }

    pub async fn is_member(pool: &PgPool, project_id: i64, user_id: i64) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM project_members WHERE project_id = $1 AND user_id = $2)",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Lists every membership in join order
    ///
    /// Memberships joined in the same instant are ordered by project then user.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> StoreResult<Vec<Self>> {
        let members = sqlx::query_as::<_, ProjectMember>(
            r#"
            SELECT project_id, user_id, joined_at
            FROM project_members
            ORDER BY joined_at ASC, project_id ASC, user_id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }

    /// Members of a project in join order, ties broken by user id
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: i64,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Self>> {
        let members = sqlx::query_as::<_, ProjectMember>(
            r#"
            SELECT project_id, user_id, joined_at
            FROM project_members
            WHERE project_id = $1
            ORDER BY joined_at ASC, user_id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(project_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }

    /// Projects a user has joined in join order, ties broken by project id
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Self>> {
        let members = sqlx::query_as::<_, ProjectMember>(
            r#"
            SELECT project_id, user_id, joined_at
            FROM project_members
            WHERE user_id = $1
            ORDER BY joined_at ASC, project_id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }

    pub async fn count_by_project(pool: &PgPool, project_id: i64) -> StoreResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM project_members WHERE project_id = $1")
                .bind(project_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Removes a user from a project
    ///
    /// Returns false if they were not a member.
    pub async fn delete(pool: &PgPool, project_id: i64, user_id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
            .bind(project_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        debug!(project_id, user_id, deleted = result.rows_affected(), "Removed project member");
        Ok(result.rows_affected() > 0)
    }
}
