/// Project and membership endpoints
///
/// # Endpoints
///
/// - `GET /v1/projects?owner_id&limit&offset` - List projects
/// - `POST /v1/projects` - Create a project
/// - `GET /v1/projects/:id` - Fetch a project
/// - `PATCH /v1/projects/:id` - Partially update a project
/// - `DELETE /v1/projects/:id` - Delete a project with its tasks and members
/// - `GET /v1/projects/:id/members` - List members
/// - `POST /v1/projects/:id/members` - Add a member
/// - `DELETE /v1/projects/:id/members/:user_id` - Remove a member

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
use serde::Deserialize;
use taskboard_shared::models::{
    project::{CreateProject, Project, UpdateProject},
    project_member::{CreateProjectMember, ProjectMember},
};
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    pub description: Option<String>,

    pub owner_id: i64,
}

/// Optional list filter
#[derive(Debug, Default, Deserialize)]
pub struct ProjectFilter {
    pub owner_id: Option<i64>,
}

/// Add member request
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: i64,
}

pub async fn list_projects(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<Pagination>,
    AppQuery(filter): AppQuery<ProjectFilter>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = match filter.owner_id {
        Some(owner_id) => {
            Project::list_by_owner(&state.db, owner_id, page.limit(), page.offset()).await?
        }
        None => Project::list(&state.db, page.limit(), page.offset()).await?,
    };

    Ok(Json(projects))
}

/// Create a project
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `409 Conflict`: Owner does not exist
pub async fn create_project(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    req.validate()?;

    let project = Project::create(
        &state.db,
        CreateProject {
            name: req.name,
            description: req.description,
            owner_id: req.owner_id,
        },
    )
    .await?;

    tracing::info!(project_id = project.id, owner_id = project.owner_id, "Project created");

    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Project>> {
    Ok(Json(Project::get(&state.db, id).await?))
}

/// Partially update a project
///
/// `"description": null` clears the description; an absent field is kept.
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(patch): AppJson<UpdateProject>,
) -> ApiResult<Json<Project>> {
    if matches!(&patch.name, Some(name) if name.trim().is_empty()) {
        return Err(ApiError::invalid("name", "Name must not be empty"));
    }

    let project = Project::update(&state.db, id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("project {} not found", id)))?;

    Ok(Json(project))
}

pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !Project::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("project {} not found", id)));
    }

    tracing::info!(project_id = id, "Project deleted");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppQuery(page): AppQuery<Pagination>,
) -> ApiResult<Json<Vec<ProjectMember>>> {
    let project = Project::get(&state.db, id).await?;
    let members =
        ProjectMember::list_by_project(&state.db, project.id, page.limit(), page.offset()).await?;

    Ok(Json(members))
}

/// Add a member
///
/// # Errors
///
/// - `404 Not Found`: Project does not exist
/// - `409 Conflict`: Already a member, or the user does not exist
pub async fn add_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(req): AppJson<AddMemberRequest>,
) -> ApiResult<(StatusCode, Json<ProjectMember>)> {
    let project = Project::get(&state.db, id).await?;

    let member = ProjectMember::create(
        &state.db,
        CreateProjectMember {
            project_id: project.id,
            user_id: req.user_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn remove_member(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    if !ProjectMember::delete(&state.db, id, user_id).await? {
        return Err(ApiError::NotFound(format!(
            "user {} is not a member of project {}",
            user_id, id
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}
