/// Task model and database operations
///
/// Tasks belong to a project and are authored by a user. Status and priority
/// are closed sets, checked both by the Rust enums and by CHECK constraints in
/// storage.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     title TEXT NOT NULL,
///     description TEXT,
///     status TEXT NOT NULL DEFAULT 'todo',
///     priority TEXT NOT NULL DEFAULT 'medium',
///     due_date DATE,
///     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     created_by BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT tasks_status_check CHECK (status IN ('todo', 'in_progress', 'done')),
///     CONSTRAINT tasks_priority_check CHECK (priority IN ('low', 'medium', 'high'))
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, project_id: i64, user_id: i64) -> Result<(), Box<dyn std::error::Error>> {
/// let task = Task::create(&pool, CreateTask {
///     title: "Write release notes".to_string(),
///     description: None,
///     status: TaskStatus::Todo,
///     priority: TaskPriority::High,
///     due_date: None,
///     project_id,
///     created_by: user_id,
/// }).await?;
///
/// // Only the status changes; title, priority, due date stay as they are
/// Task::update(&pool, task.id, UpdateTask {
///     status: Some(TaskStatus::InProgress),
///     ..Default::default()
/// }).await?;
/// # Ok(())
/// # }
/// ```

use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Workflow status of a task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(StoreError::InvalidEnum {
                kind: "task status",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(StoreError::InvalidEnum {
                kind: "task priority",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for TaskPriority {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Task row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,

    #[sqlx(try_from = "String")]
    pub status: TaskStatus,

    #[sqlx(try_from = "String")]
    pub priority: TaskPriority,

    pub due_date: Option<NaiveDate>,

    /// Owning project; the task is deleted with it
    pub project_id: i64,

    /// Author; the task is deleted with them
    pub created_by: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,

    #[serde(default)]
    pub status: TaskStatus,

    #[serde(default)]
    pub priority: TaskPriority,

    pub due_date: Option<NaiveDate>,
    pub project_id: i64,
    pub created_by: i64,
}

/// Field-level patch for a task
///
/// `project_id` and `created_by` are fixed at creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,

    /// `Some(None)` clears the description
    #[serde(default, deserialize_with = "super::double_option")]
    pub description: Option<Option<String>>,

    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,

    /// `Some(None)` clears the due date
    #[serde(default, deserialize_with = "super::double_option")]
    pub due_date: Option<Option<NaiveDate>>,
}

impl Task {
    /// Inserts a new task
    ///
    /// # Errors
    ///
    /// [`StoreError::ForeignKeyViolation`] if the project or author does not exist.
    pub async fn create(pool: &PgPool, data: CreateTask) -> StoreResult<Self> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, priority, due_date, project_id, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, description, status, priority, due_date,
                      project_id, created_by, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status.as_str())
        .bind(data.priority.as_str())
        .bind(data.due_date)
        .bind(data.project_id)
        .bind(data.created_by)
        .fetch_one(pool)
        .await?;

        debug!(task_id = task.id, project_id = task.project_id, "Created task");
        Ok(task)
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> StoreResult<Option<Self>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, priority, due_date,
                   project_id, created_by, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Like [`Task::find_by_id`] but a missing row is [`StoreError::NotFound`]
    pub async fn get(pool: &PgPool, id: i64) -> StoreResult<Self> {
        Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| StoreError::not_found("task", id))
    }

    /// Lists all tasks in insertion order
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> StoreResult<Vec<Self>> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, priority, due_date,
                   project_id, created_by, created_at, updated_at
            FROM tasks
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists a project's tasks, optionally narrowed to one status
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: i64,
        status: Option<TaskStatus>,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Self>> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, priority, due_date,
                   project_id, created_by, created_at, updated_at
            FROM tasks
            WHERE project_id = $1 AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY id ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(project_id)
        .bind(status.map(|s| s.as_str()))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists the tasks a user authored
    pub async fn list_by_creator(
        pool: &PgPool,
        created_by: i64,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Self>> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, priority, due_date,
                   project_id, created_by, created_at, updated_at
            FROM tasks
            WHERE created_by = $1
            ORDER BY id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(created_by)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    pub async fn count_by_project(pool: &PgPool, project_id: i64) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Applies a patch and bumps `updated_at`
    ///
    /// Returns `None` if the task does not exist.
    pub async fn update(pool: &PgPool, id: i64, data: UpdateTask) -> StoreResult<Option<Self>> {
        let mut query = QueryBuilder::<Postgres>::new("UPDATE tasks SET updated_at = NOW()");

        if let Some(title) = data.title {
            query.push(", title = ").push_bind(title);
        }
        if let Some(description) = data.description {
            query.push(", description = ").push_bind(description);
        }
        if let Some(status) = data.status {
            query.push(", status = ").push_bind(status.as_str());
        }
        if let Some(priority) = data.priority {
            query.push(", priority = ").push_bind(priority.as_str());
        }
        if let Some(due_date) = data.due_date {
            query.push(", due_date = ").push_bind(due_date);
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(
            " RETURNING id, title, description, status, priority, due_date, \
             project_id, created_by, created_at, updated_at",
        );

        let task = query.build_query_as::<Task>().fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task together with its assignments
    pub async fn delete(pool: &PgPool, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        debug!(task_id = id, deleted = result.rows_affected(), "Deleted task");
        Ok(result.rows_affected() > 0)
    }
}
