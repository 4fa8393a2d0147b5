//! HTTP API handlers for timbila-gate

pub mod access;
pub mod auth;
pub mod health;
pub mod plans;

pub use access::check_access;
pub use auth::auth_middleware;
pub use health::health_routes;
pub use plans::list_plans;
