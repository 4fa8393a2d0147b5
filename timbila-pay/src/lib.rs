//! timbila-pay library - Checkout module
//!
//! Owns checkout sessions and drives the methods -> form -> confirmation
//! wizard, computing fees and totals per payment method. Payment
//! settlement itself is delegated to a [`gateway::PaymentGateway`].

use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;

pub mod api;
pub mod checkout;
pub mod db;
pub mod error;
pub mod gateway;
pub mod store;

use gateway::PaymentGateway;
use store::SessionStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (plan catalog, settings)
    pub db: SqlitePool,
    /// Shared secret for API authentication (0 disables auth)
    pub shared_secret: i64,
    /// In-flight checkout sessions
    pub sessions: SessionStore,
    /// Payment settlement collaborator
    pub gateway: Arc<dyn PaymentGateway>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, shared_secret: i64, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            db,
            shared_secret,
            sessions: SessionStore::new(),
            gateway,
        }
    }
}

/// Build application router
///
/// Mutating checkout routes require authentication; health and read-only
/// session views do not.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    // Protected routes (require authentication)
    let protected = Router::new()
        .route("/api/checkout", post(api::create_session))
        .route("/api/checkout/:id/method", post(api::select_method))
        .route("/api/checkout/:id/details", post(api::submit_details))
        .route("/api/checkout/:id/back", post(api::go_back))
        .route("/api/checkout/:id/confirm", post(api::confirm_session))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route(
            "/api/checkout/:id",
            get(api::get_session).delete(api::cancel_session),
        )
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
