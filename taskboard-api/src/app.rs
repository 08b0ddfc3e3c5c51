/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskboard_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = taskboard_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, routes};
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                              # Health check
/// ├── /admin/users                         # GET list, POST create
/// │   └── /:id                             # GET, PATCH, DELETE
/// └── /v1/
///     ├── /projects                        # GET list, POST create
///     │   └── /:id                         # GET, PATCH, DELETE
///     │       ├── /members                 # GET list, POST add
///     │       │   └── /:user_id            # DELETE
///     │       └── /tasks                   # GET list (?status=), POST create
///     ├── /tasks/:id                       # GET, PATCH, DELETE
///     │   └── /assignments                 # GET list, POST assign
///     │       └── /:user_id                # DELETE
///     └── /users/:id/assignments           # GET
/// ```
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let admin_routes = Router::new()
        .route(
            "/users",
            get(routes::admin::list_users).post(routes::admin::create_user),
        )
        .route(
            "/users/:id",
            get(routes::admin::get_user)
                .patch(routes::admin::update_user)
                .delete(routes::admin::delete_user),
        );

    let project_routes = Router::new()
        .route(
            "/",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/:id",
            get(routes::projects::get_project)
                .patch(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route(
            "/:id/members",
            get(routes::projects::list_members).post(routes::projects::add_member),
        )
        .route(
            "/:id/members/:user_id",
            axum::routing::delete(routes::projects::remove_member),
        )
        .route(
            "/:id/tasks",
            get(routes::tasks::list_project_tasks).post(routes::tasks::create_task),
        );

    let task_routes = Router::new()
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .patch(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route(
            "/:id/assignments",
            get(routes::tasks::list_assignments).post(routes::tasks::assign_user),
        )
        .route(
            "/:id/assignments/:user_id",
            axum::routing::delete(routes::tasks::unassign_user),
        );

    let v1_routes = Router::new()
        .nest("/projects", project_routes)
        .nest("/tasks", task_routes)
        .route(
            "/users/:id/assignments",
            get(routes::tasks::list_user_assignments),
        );

    let cors = cors_layer(&state.config.api.cors_origins);

    Router::new()
        .merge(health_routes)
        .nest("/admin", admin_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        // Development mode: permissive CORS
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}
