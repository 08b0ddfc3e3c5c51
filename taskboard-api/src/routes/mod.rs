/// API route handlers
///
/// Handlers are organized by resource:
///
/// - `health`: Health check endpoint
/// - `admin`: User administration
/// - `projects`: Projects and their members
/// - `tasks`: Tasks and their assignments

use serde::Deserialize;

pub mod admin;
pub mod health;
pub mod projects;
pub mod tasks;

/// Default page size for list endpoints
pub const DEFAULT_LIMIT: i64 = 50;

/// Largest page size a client may request
pub const MAX_LIMIT: i64 = 200;

/// `?limit=&offset=` query parameters shared by every list endpoint
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    /// Page size clamped to `1..=MAX_LIMIT`
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Offset, never negative
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}
