//! Common test utilities for API integration tests
//!
//! Builds the full router over a migrated test database and offers a small
//! JSON client. Tests return early when `DATABASE_URL` is not set.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::PgPool;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::{ApiConfig, Config, DatabaseConfig};
use taskboard_shared::db::{
    migrations::{ensure_database_exists, run_migrations},
    pool::{self, create_pool},
};
use tower::ServiceExt;
use uuid::Uuid;

/// Test context containing the router and its pool
pub struct TestContext {
    pub db: PgPool,
    pub app: Router,
}

impl TestContext {
    /// Connects, migrates and builds the router, or None without a database
    pub async fn new() -> Option<Self> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping API test");
            return None;
        };

        ensure_database_exists(&url)
            .await
            .expect("Failed to create test database");

        let db = create_pool(pool::DatabaseConfig {
            max_connections: 5,
            ..pool::DatabaseConfig::from_url(url.clone())
        })
        .await
        .expect("Failed to create pool");

        run_migrations(&db).await.expect("Failed to run migrations");

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url,
                max_connections: 5,
            },
        };

        let app = build_router(AppState::new(db.clone(), config));

        Some(Self { db, app })
    }

    /// Sends a request and returns the status with the parsed JSON body
    ///
    /// Empty bodies come back as `Value::Null`.
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        match body {
            Some(json) => {
                self.send_raw(method, uri, Some("application/json"), json.to_string())
                    .await
            }
            None => self.send_raw(method, uri, None, String::new()).await,
        }
    }

    /// Sends an arbitrary body, for requests a JSON value cannot express
    pub async fn send_raw(
        &self,
        method: &str,
        uri: &str,
        content_type: Option<&str>,
        body: String,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }

        let response = self
            .app
            .clone()
            .oneshot(builder.body(Body::from(body)).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!("Non-JSON body ({}): {}", status, String::from_utf8_lossy(&bytes))
            })
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("PATCH", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send("DELETE", uri, None).await
    }
}

/// Short random suffix for unique usernames and emails
pub fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..12])
}
