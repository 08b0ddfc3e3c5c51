/// User administration endpoints
///
/// # Endpoints
///
/// - `GET /admin/users?limit&offset` - List users
/// - `POST /admin/users` - Create a user
/// - `GET /admin/users/:id` - Fetch a user
/// - `PATCH /admin/users/:id` - Partially update a user
/// - `DELETE /admin/users/:id` - Delete a user and everything they own
///
/// Responses never include the password hash.

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
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::password,
    models::user::{CreateUser, UpdateUser, User, UserRole},
};
use validator::Validate;

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 50, message = "Username must be 1-50 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[serde(default)]
    pub role: UserRole,
}

/// Patch user request; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 50, message = "Username must be 1-50 characters"))]
    pub username: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    pub role: Option<UserRole>,

    pub is_active: Option<bool>,
}

/// Public view of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
        }
    }
}

/// Hashes a password on the blocking thread pool
async fn hash_off_thread(plain: String) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || password::hash_password(&plain))
        .await
        .map_err(|e| ApiError::InternalError(format!("Password hashing task failed: {}", e)))?
        .map_err(ApiError::from)
}

pub async fn list_users(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<Pagination>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = User::list(&state.db, page.limit(), page.offset()).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Create a user
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `409 Conflict`: Username or email already exists
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    req.validate()?;

    let hashed_password = hash_off_thread(req.password).await?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            hashed_password,
            role: req.role,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User created");

    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserResponse>> {
    let user = User::get(&state.db, id).await?;
    Ok(Json(user.into()))
}

/// Partially update a user
///
/// A new password is re-hashed before it is stored. A body with no fields is
/// rejected with `400 Bad Request`.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(req): AppJson<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    req.validate()?;

    let hashed_password = match req.password {
        Some(plain) => Some(hash_off_thread(plain).await?),
        None => None,
    };

    let patch = UpdateUser {
        username: req.username,
        email: req.email,
        hashed_password,
        role: req.role,
        is_active: req.is_active,
    };

    if patch.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }

    let user = User::update(&state.db, id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user {} not found", id)))?;

    tracing::info!(user_id = user.id, "User updated");

    Ok(Json(user.into()))
}

/// Delete a user
///
/// Their projects, authored tasks, memberships and assignments go with them.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !User::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("user {} not found", id)));
    }

    tracing::info!(user_id = id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}
