/// Storage error type for the domain access layer
///
/// Every model operation returns [`StoreResult`]. Database errors raised by
/// PostgreSQL constraints are classified by kind so callers can tell a
/// duplicate username apart from a missing foreign key without parsing
/// message strings.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::error::StoreError;
/// use taskboard_shared::models::user::{CreateUser, User};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), StoreError> {
/// let data = CreateUser {
///     username: "alice".to_string(),
///     email: "a@x.com".to_string(),
///     hashed_password: "$argon2id$...".to_string(),
///     role: Default::default(),
/// };
///
/// match User::create(&pool, data).await {
///     Err(StoreError::UniqueViolation { constraint }) => {
///         println!("duplicate value for {}", constraint);
///     }
///     other => {
///         other?;
///     }
/// }
/// # Ok(())
/// # }
/// ```

use sqlx::error::ErrorKind;

/// Result alias used by all model operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the domain access layer
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No row with the given identity exists
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// A UNIQUE or PRIMARY KEY constraint rejected the write
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A CHECK constraint rejected the write
    #[error("check constraint violated: {constraint}")]
    CheckViolation { constraint: String },

    /// A FOREIGN KEY constraint rejected the write
    #[error("foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    /// A value could not be parsed into one of the enumerated column types
    #[error("invalid {kind} value: {value:?}")]
    InvalidEnum { kind: &'static str, value: String },

    /// Any other database failure (connection, protocol, decode, ...)
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    /// Builds a not-found error for an entity identity
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let sqlx::Error::Database(db_err) = &err else {
            return StoreError::Database(err);
        };

        let constraint = db_err.constraint().unwrap_or("unknown").to_string();

        match db_err.kind() {
            ErrorKind::UniqueViolation => StoreError::UniqueViolation { constraint },
            ErrorKind::CheckViolation => StoreError::CheckViolation { constraint },
            ErrorKind::ForeignKeyViolation => StoreError::ForeignKeyViolation { constraint },
            _ => StoreError::Database(err),
        }
    }
}
