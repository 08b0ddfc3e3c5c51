/// Task assignment model and database operations
///
/// Assigns users to tasks. A user is assigned to a given task at most once;
/// the optional assigner is kept as history and set to NULL if that user is
/// deleted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE task_assignments (
///     id BIGSERIAL PRIMARY KEY,
///     task_id BIGINT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     assigned_by BIGINT REFERENCES users(id) ON DELETE SET NULL,
///     assigned_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT task_assignments_task_id_user_id_key UNIQUE (task_id, user_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task_assignment::{CreateTaskAssignment, TaskAssignment};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, task_id: i64, user_id: i64, admin_id: i64) -> Result<(), Box<dyn std::error::Error>> {
/// TaskAssignment::create(&pool, CreateTaskAssignment {
///     task_id,
///     user_id,
///     assigned_by: Some(admin_id),
/// }).await?;
///
/// let mine = TaskAssignment::list_by_user(&pool, user_id, 50, 0).await?;
/// # Ok(())
/// # }
/// ```

use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::debug;

/// Assignment row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskAssignment {
    pub id: i64,
    pub task_id: i64,
    pub user_id: i64,

    /// Who made the assignment, if known
    pub assigned_by: Option<i64>,

    pub assigned_at: DateTime<Utc>,
}

/// Input for assigning a user to a task
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CreateTaskAssignment {
    pub task_id: i64,
    pub user_id: i64,
    pub assigned_by: Option<i64>,
}

/// Field-level patch for an assignment
///
/// The `(task_id, user_id)` pair is the assignment's identity and cannot be
/// changed; only the recorded assigner can.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct UpdateTaskAssignment {
    /// `Some(None)` forgets the assigner
    #[serde(default, deserialize_with = "super::double_option")]
    pub assigned_by: Option<Option<i64>>,
}

impl TaskAssignment {
    /// Assigns a user to a task
    ///
    /// # Errors
    ///
    /// - [`StoreError::UniqueViolation`] (`task_assignments_task_id_user_id_key`)
    ///   if the user is already assigned to the task
    /// - [`StoreError::ForeignKeyViolation`] if the task, user or assigner does not exist
    pub async fn create(pool: &PgPool, data: CreateTaskAssignment) -> StoreResult<Self> {
        let assignment = sqlx::query_as::<_, TaskAssignment>(
            r#"
            INSERT INTO task_assignments (task_id, user_id, assigned_by)
            VALUES ($1, $2, $3)
            RETURNING id, task_id, user_id, assigned_by, assigned_at
            "#,
        )
        .bind(data.task_id)
        .bind(data.user_id)
        .bind(data.assigned_by)
        .fetch_one(pool)
        .await?;

        debug!(
            task_id = assignment.task_id,
            user_id = assignment.user_id,
            assigned_by = ?assignment.assigned_by,
            "Assigned user to task"
        );
        Ok(assignment)
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> StoreResult<Option<Self>> {
        let assignment = sqlx::query_as::<_, TaskAssignment>(
            r#"
            SELECT id, task_id, user_id, assigned_by, assigned_at
            FROM task_assignments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(assignment)
    }

    /// Like [`TaskAssignment::find_by_id`] but a missing row is [`StoreError::NotFound`]
    pub async fn get(pool: &PgPool, id: i64) -> StoreResult<Self> {
        Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| StoreError::not_found("task assignment", id))
    }

    /// Finds the assignment of a user to a task
    pub async fn find_by_task_and_user(
        pool: &PgPool,
        task_id: i64,
        user_id: i64,
    ) -> StoreResult<Option<Self>> {
        let assignment = sqlx::query_as::<_, TaskAssignment>(
            r#"
            SELECT id, task_id, user_id, assigned_by, assigned_at
            FROM task_assignments
            WHERE task_id = $1 AND user_id = $2
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(assignment)
    }

    /// Lists all assignments in insertion order
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> StoreResult<Vec<Self>> {
        let assignments = sqlx::query_as::<_, TaskAssignment>(
            r#"
            SELECT id, task_id, user_id, assigned_by, assigned_at
            FROM task_assignments
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(assignments)
    }

    pub async fn list_by_task(
        pool: &PgPool,
        task_id: i64,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Self>> {
        let assignments = sqlx::query_as::<_, TaskAssignment>(
            r#"
            SELECT id, task_id, user_id, assigned_by, assigned_at
            FROM task_assignments
            WHERE task_id = $1
            ORDER BY id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(task_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(assignments)
    }

    pub async fn list_by_user(
        pool: &PgPool,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Self>> {
        let assignments = sqlx::query_as::<_, TaskAssignment>(
            r#"
            SELECT id, task_id, user_id, assigned_by, assigned_at
            FROM task_assignments
            WHERE user_id = $1
            ORDER BY id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(assignments)
    }

    /// Applies a patch
    ///
    /// Returns `None` if the assignment does not exist. An empty patch returns
    /// the row unchanged.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateTaskAssignment,
    ) -> StoreResult<Option<Self>> {
        let Some(assigned_by) = data.assigned_by else {
            return Self::find_by_id(pool, id).await;
        };

        let assignment = sqlx::query_as::<_, TaskAssignment>(
            r#"
            UPDATE task_assignments
            SET assigned_by = $2
            WHERE id = $1
            RETURNING id, task_id, user_id, assigned_by, assigned_at
            "#,
        )
        .bind(id)
        .bind(assigned_by)
        .fetch_optional(pool)
        .await?;

        Ok(assignment)
    }

    pub async fn delete(pool: &PgPool, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM task_assignments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        debug!(assignment_id = id, deleted = result.rows_affected(), "Deleted task assignment");
        Ok(result.rows_affected() > 0)
    }

    /// Unassigns a user from a task
    pub async fn delete_by_task_and_user(
        pool: &PgPool,
        task_id: i64,
        user_id: i64,
    ) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM task_assignments WHERE task_id = $1 AND user_id = $2")
            .bind(task_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        debug!(task_id, user_id, deleted = result.rows_affected(), "Unassigned user from task");
        Ok(result.rows_affected() > 0)
    }
}
