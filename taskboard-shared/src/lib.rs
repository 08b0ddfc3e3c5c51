//! # Taskboard Shared Library
//!
//! The domain access layer for Taskboard: connection pooling, schema
//! migrations, and the user / project / membership / task / assignment
//! models with their storage rules.
//!
//! ## Module Organization
//!
//! - `db`: connection pool and embedded migrations
//! - `models`: row types and their CRUD operations
//! - `error`: storage error classification
//! - `auth`: password hashing for stored credentials

pub mod auth;
pub mod db;
pub mod error;
pub mod models;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
