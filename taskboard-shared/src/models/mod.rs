/// Database models for Taskboard
///
/// Each model is a plain row struct plus associated functions that run one
/// statement against a `&PgPool`. Relationships are foreign-key columns;
/// related rows are fetched with explicit queries rather than held as object
/// graphs.
///
/// # Models
///
/// - `user`: accounts with a unique username and email
/// - `project`: projects owned by a user
/// - `project_member`: user ↔ project membership (composite key)
/// - `task`: tasks within a project
/// - `task_assignment`: user ↔ task assignment, unique per pair
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::{
///     project::{CreateProject, Project},
///     user::{CreateUser, User},
/// };
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let owner = User::create(&pool, CreateUser {
///     username: "alice".to_string(),
///     email: "a@x.com".to_string(),
///     hashed_password: "$argon2id$...".to_string(),
///     role: Default::default(),
/// }).await?;
///
/// let project = Project::create(&pool, CreateProject {
///     name: "Roadmap".to_string(),
///     description: Some("Q3 planning".to_string()),
///     owner_id: owner.id,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Deserializer};

pub mod project;
pub mod project_member;
pub mod task;
pub mod task_assignment;
pub mod user;

/// Distinguishes an explicit `null` (`Some(None)`) from a missing field
/// (`None`, via `#[serde(default)]`) in patch payloads
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
