//! HTTP API handlers for timbila-pay

pub mod auth;
pub mod checkout;
pub mod health;

pub use auth::auth_middleware;
pub use checkout::{
    cancel_session, confirm_session, create_session, get_session, go_back, select_method,
    submit_details,
};
pub use health::health_routes;
