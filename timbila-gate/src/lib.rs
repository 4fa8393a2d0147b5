//! timbila-gate library - Access Gate module
//!
//! Decides whether a viewer may see a tier-gated resource. The evaluation
//! core is pure; the HTTP surface fetches inputs and reports verdicts.

use axum::Router;
use sqlx::SqlitePool;

pub mod access;
pub mod api;
pub mod db;
pub mod error;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Shared secret for API authentication (0 disables auth)
    pub shared_secret: i64,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, shared_secret: i64) -> Self {
        Self { db, shared_secret }
    }
}

/// Build application router
///
/// Health and the plan catalog are public; the access check requires
/// authentication.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    // Protected routes (require authentication)
    let protected = Router::new()
        .route("/api/access/check", post(api::check_access))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/api/plans", get(api::list_plans))
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
