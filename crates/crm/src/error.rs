//! Unified error handling with Sentry integration.
//!
//! All route handlers return `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before the response is built.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::form::{FieldErrors, SubmitBlocked, SubmitError};
use crate::services::ServiceError;

/// Application-level error type for the CRM.
#[derive(Debug, Error)]
pub enum AppError {
    /// Record store operation failed.
    #[error("Record store error: {0}")]
    Service(#[from] ServiceError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Form validation failed.
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Service(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Service(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Store messages are human-readable; transport details are not exposed
        let body = match &self {
            Self::Service(ServiceError::Transport { .. }) => {
                json!({"error": "External service error"})
            }
            Self::Service(err) => json!({"error": err.message()}),
            Self::Validation(fields) => json!({"error": "Validation failed", "fields": fields}),
            Self::Internal(_) => json!({"error": "Internal server error"}),
            _ => json!({"error": self.to_string()}),
        };

        (status, Json(body)).into_response()
    }
}

impl From<SubmitError<ServiceError>> for AppError {
    fn from(err: SubmitError<ServiceError>) -> Self {
        match err {
            SubmitError::Blocked(SubmitBlocked::Invalid(fields)) => Self::Validation(fields),
            SubmitError::Blocked(blocked @ SubmitBlocked::InFlight) => {
                Self::BadRequest(blocked.to_string())
            }
            SubmitError::Handler(err) => Self::Service(err),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
