//! Error types for timbila-pay

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors raised by the checkout flow
#[derive(Error, Debug)]
pub enum PayError {
    /// A required checkout field is missing or malformed
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// The requested transition is not legal from the current step
    #[error("Illegal transition: cannot {action} from step {from}")]
    IllegalTransition { from: String, action: String },

    /// Shared error kinds (database, catalog lookups, fee arithmetic)
    #[error(transparent)]
    Common(#[from] timbila_common::Error),
}

impl PayError {
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        PayError::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience Result type using PayError
pub type Result<T> = std::result::Result<T, PayError>;

impl IntoResponse for PayError {
    fn into_response(self) -> Response {
        use timbila_common::Error;

        let status = match &self {
            PayError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            PayError::IllegalTransition { .. } => StatusCode::CONFLICT,
            PayError::Common(Error::NotFound(_)) => StatusCode::NOT_FOUND,
            PayError::Common(
                Error::InvalidInput(_) | Error::InvalidAmount(_) | Error::UnknownPaymentMethod(_),
            ) => StatusCode::BAD_REQUEST,
            PayError::Common(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
