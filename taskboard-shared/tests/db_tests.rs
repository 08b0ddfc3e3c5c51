//! Integration tests for pooling and migrations
//!
//! Run with: cargo test -p taskboard-shared --test db_tests
//! Requires DATABASE_URL; skipped otherwise.

mod common;

use common::test_pool;
use taskboard_shared::db::migrations::{
    embedded_latest_version, get_migration_status, run_migrations,
};
use taskboard_shared::db::pool::{get_pool_stats, health_check};

#[tokio::test]
async fn test_health_check() {
    let Some(pool) = test_pool().await else { return };

    health_check(&pool).await.expect("Health check failed");
}

#[tokio::test]
async fn test_pool_stats() {
    let Some(pool) = test_pool().await else { return };

    let stats = get_pool_stats(&pool);
    assert!(stats.total_connections <= 5);
    assert_eq!(
        stats.total_connections,
        stats.active_connections + stats.idle_connections
    );
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let Some(pool) = test_pool().await else { return };

    // test_pool already migrated; a second run is a no-op
    run_migrations(&pool).await.expect("Re-running migrations failed");

    let status = get_migration_status(&pool).await.unwrap();
    assert!(status.is_up_to_date);
    assert!(status.applied_migrations >= 3);
    assert_eq!(status.latest_version, embedded_latest_version());
}

#[tokio::test]
async fn test_all_tables_exist() {
    let Some(pool) = test_pool().await else { return };

    for table in ["users", "projects", "project_members", "tasks", "task_assignments"] {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap();

        assert!(exists, "table {table} is missing");
    }
}
