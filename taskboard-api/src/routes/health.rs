/// Health check endpoint
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "pool": { "active_connections": 1, "idle_connections": 2, "total_connections": 3 }
/// }
/// ```
///
/// Responds 503 with `"status": "degraded"` when the database is unreachable.

use crate::app::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use taskboard_shared::db::pool::{get_pool_stats, health_check as ping_database};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status
    pub database: String,

    /// Connection pool usage
    pub pool: PoolSummary,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PoolSummary {
    pub active_connections: usize,
    pub idle_connections: usize,
    pub total_connections: usize,
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let connected = match ping_database(&state.db).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    };

    let stats = get_pool_stats(&state.db);
    let (status, label, database) = if connected {
        (StatusCode::OK, "healthy", "connected")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "disconnected")
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: database.to_string(),
            pool: PoolSummary {
                active_connections: stats.active_connections,
                idle_connections: stats.idle_connections,
                total_connections: stats.total_connections,
            },
        }),
    )
}
