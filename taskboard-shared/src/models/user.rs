/// User model and database operations
///
/// Users own projects, author tasks and receive task assignments. Usernames and
/// emails are globally unique; the role is restricted to `user` or `admin`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     username TEXT NOT NULL,
///     email TEXT NOT NULL,
///     hashed_password TEXT NOT NULL,
///     role TEXT NOT NULL DEFAULT 'user',
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT users_username_key UNIQUE (username),
///     CONSTRAINT users_email_key UNIQUE (email),
///     CONSTRAINT users_role_check CHECK (role IN ('user', 'admin'))
/// );
/// ```
///
/// Deleting a user cascades to the projects they own, the tasks they authored,
/// their memberships and their assignments. Assignments they handed out to
/// others keep existing with `assigned_by` set to NULL.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::user::{CreateUser, User, UserRole};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let user = User::create(&pool, CreateUser {
///     username: "alice".to_string(),
///     email: "a@x.com".to_string(),
///     hashed_password: "$argon2id$...".to_string(),
///     role: UserRole::User,
/// }).await?;
///
/// let found = User::find_by_username(&pool, "alice").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Account role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular account
    #[default]
    User,

    /// Administrator
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            other => Err(StoreError::InvalidEnum {
                kind: "user role",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for UserRole {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// User account row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,

    /// Unique login name
    pub username: String,

    /// Unique email address
    pub email: String,

    /// Argon2id PHC string, never serialized
    #[serde(skip_serializing)]
    pub hashed_password: String,

    #[sqlx(try_from = "String")]
    pub role: UserRole,

    /// Inactive accounts are kept for history but should not sign in
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,

    /// Already-hashed password (see [`crate::auth::password::hash_password`])
    pub hashed_password: String,

    #[serde(default)]
    pub role: UserRole,
}

/// Field-level patch for a user
///
/// Only `Some` fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub hashed_password: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

impl UpdateUser {
    /// True when the patch would change nothing but `updated_at`
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.hashed_password.is_none()
            && self.role.is_none()
            && self.is_active.is_none()
    }
}

impl User {
    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// - [`StoreError::UniqueViolation`] on `users_username_key` or `users_email_key`
    /// - [`StoreError::Database`] if the connection fails
    pub async fn create(pool: &PgPool, data: CreateUser) -> StoreResult<Self> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, hashed_password, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, hashed_password, role, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.hashed_password)
        .bind(data.role.as_str())
        .fetch_one(pool)
        .await?;

        debug!(user_id = user.id, username = %user.username, "Created user");
        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> StoreResult<Option<Self>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, hashed_password, role, is_active,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Like [`User::find_by_id`] but a missing row is [`StoreError::NotFound`]
    pub async fn get(pool: &PgPool, id: i64) -> StoreResult<Self> {
        Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| StoreError::not_found("user", id))
    }

    pub async fn find_by_username(pool: &PgPool, username: &str) -> StoreResult<Option<Self>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, hashed_password, role, is_active,
                   created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> StoreResult<Option<Self>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, hashed_password, role, is_active,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists users in insertion order
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use taskboard_shared::models::user::User;
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), taskboard_shared::error::StoreError> {
    /// let first_page = User::list(&pool, 20, 0).await?;
    /// let second_page = User::list(&pool, 20, 20).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> StoreResult<Vec<Self>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, hashed_password, role, is_active,
                   created_at, updated_at
            FROM users
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Applies a patch and bumps `updated_at`
    ///
    /// Returns `None` if the user does not exist.
    ///
    /// # Errors
    ///
    /// [`StoreError::UniqueViolation`] if the new username or email is taken.
    pub async fn update(pool: &PgPool, id: i64, data: UpdateUser) -> StoreResult<Option<Self>> {
        let mut query = QueryBuilder::<Postgres>::new("UPDATE users SET updated_at = NOW()");

        if let Some(username) = data.username {
            query.push(", username = ").push_bind(username);
        }
        if let Some(email) = data.email {
            query.push(", email = ").push_bind(email);
        }
        if let Some(hashed_password) = data.hashed_password {
            query.push(", hashed_password = ").push_bind(hashed_password);
        }
        if let Some(role) = data.role {
            query.push(", role = ").push_bind(role.as_str());
        }
        if let Some(is_active) = data.is_active {
            query.push(", is_active = ").push_bind(is_active);
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(
            " RETURNING id, username, email, hashed_password, role, is_active, created_at, updated_at",
        );

        let user = query.build_query_as::<User>().fetch_optional(pool).await?;

        Ok(user)
    }

    /// Deletes a user, cascading to everything they own
    ///
    /// Returns false if the user did not exist.
    pub async fn delete(pool: &PgPool, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        debug!(user_id = id, deleted = result.rows_affected(), "Deleted user");
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Members of a project, in the order they joined
    pub async fn list_members_of_project(pool: &PgPool, project_id: i64) -> StoreResult<Vec<Self>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.username, u.email, u.hashed_password, u.role, u.is_active,
                   u.created_at, u.updated_at
            FROM users u
            JOIN project_members pm ON pm.user_id = u.id
            WHERE pm.project_id = $1
            ORDER BY pm.joined_at ASC, u.id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Users assigned to a task, in assignment order
    pub async fn list_assignees_of_task(pool: &PgPool, task_id: i64) -> StoreResult<Vec<Self>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.username, u.email, u.hashed_password, u.role, u.is_active,
                   u.created_at, u.updated_at
            FROM users u
            JOIN task_assignments ta ON ta.user_id = u.id
            WHERE ta.task_id = $1
            ORDER BY ta.id ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }
}
