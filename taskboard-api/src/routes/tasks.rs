/// Task and assignment endpoints
///
/// # Endpoints
///
/// - `GET /v1/projects/:id/tasks?status&limit&offset` - List a project's tasks
/// - `POST /v1/projects/:id/tasks` - Create a task in a project
/// - `GET /v1/tasks/:id` - Fetch a task
/// - `PATCH /v1/tasks/:id` - Partially update a task
/// - `DELETE /v1/tasks/:id` - Delete a task and its assignments
/// - `GET /v1/tasks/:id/assignments` - List a task's assignments
/// - `POST /v1/tasks/:id/assignments` - Assign a user
/// - `DELETE /v1/tasks/:id/assignments/:user_id` - Unassign a user
/// - `GET /v1/users/:id/assignments` - List a user's assignments

use super::Pagination;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{AppJson, AppQuery},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use taskboard_shared::models::{
    project::Project,
    task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask},
    task_assignment::{CreateTaskAssignment, TaskAssignment},
    user::User,
};
use validator::Validate;

/// Create task request
///
/// Status defaults to `todo` and priority to `medium`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    pub description: Option<String>,

    #[serde(default)]
    pub status: TaskStatus,

    #[serde(default)]
    pub priority: TaskPriority,

    pub due_date: Option<NaiveDate>,

    /// Authoring user
    pub created_by: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
}

/// Assign user request
#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub user_id: i64,
    pub assigned_by: Option<i64>,
}

pub async fn list_project_tasks(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
    AppQuery(page): AppQuery<Pagination>,
    AppQuery(filter): AppQuery<TaskFilter>,
) -> ApiResult<Json<Vec<Task>>> {
    let project = Project::get(&state.db, project_id).await?;
    let tasks = Task::list_by_project(
        &state.db,
        project.id,
        filter.status,
        page.limit(),
        page.offset(),
    )
    .await?;

    Ok(Json(tasks))
}

/// Create a task
///
/// # Errors
///
/// - `404 Not Found`: Project does not exist
/// - `409 Conflict`: Author does not exist
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_task(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
    AppJson(req): AppJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    let project = Project::get(&state.db, project_id).await?;

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            due_date: req.due_date,
            project_id: project.id,
            created_by: req.created_by,
        },
    )
    .await?;

    tracing::info!(task_id = task.id, project_id = task.project_id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Task>> {
    Ok(Json(Task::get(&state.db, id).await?))
}

/// Partially update a task
///
/// Only the fields present in the body change; `null` clears
/// `description` and `due_date`.
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(patch): AppJson<UpdateTask>,
) -> ApiResult<Json<Task>> {
    if matches!(&patch.title, Some(title) if title.trim().is_empty()) {
        return Err(ApiError::invalid("title", "Title must not be empty"));
    }

    let task = Task::update(&state.db, id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("task {} not found", id)))?;

    tracing::debug!(task_id = task.id, status = %task.status, "Task updated");

    Ok(Json(task))
}

pub async fn delete_task(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    if !Task::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("task {} not found", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_assignments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppQuery(page): AppQuery<Pagination>,
) -> ApiResult<Json<Vec<TaskAssignment>>> {
    let task = Task::get(&state.db, id).await?;
    let assignments =
        TaskAssignment::list_by_task(&state.db, task.id, page.limit(), page.offset()).await?;

    Ok(Json(assignments))
}

/// Assign a user to a task
///
/// # Errors
///
/// - `404 Not Found`: Task does not exist
/// - `409 Conflict`: Already assigned, or the user/assigner does not exist
pub async fn assign_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(req): AppJson<AssignRequest>,
) -> ApiResult<(StatusCode, Json<TaskAssignment>)> {
    let task = Task::get(&state.db, id).await?;

    let assignment = TaskAssignment::create(
        &state.db,
        CreateTaskAssignment {
            task_id: task.id,
            user_id: req.user_id,
            assigned_by: req.assigned_by,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

pub async fn unassign_user(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    if !TaskAssignment::delete_by_task_and_user(&state.db, id, user_id).await? {
        return Err(ApiError::NotFound(format!(
            "user {} is not assigned to task {}",
            user_id, id
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_user_assignments(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    AppQuery(page): AppQuery<Pagination>,
) -> ApiResult<Json<Vec<TaskAssignment>>> {
    let user = User::get(&state.db, user_id).await?;
    let assignments =
        TaskAssignment::list_by_user(&state.db, user.id, page.limit(), page.offset()).await?;

    Ok(Json(assignments))
}
