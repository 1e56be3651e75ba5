//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers should return
//! `Result<T, AppError>`. Error bodies are JSON objects with a `detail` key.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use shop_core::{RegistryError, ValidationError};

use crate::db::StoreError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Payload failed its schema.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Request body was not readable JSON.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No document store was configured at startup.
    #[error("Database not configured")]
    StoreNotConfigured,

    /// Document store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Collection lookup failed.
    #[error("Collection error: {0}")]
    Registry(#[from] RegistryError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::StoreNotConfigured | Self::Store(_) | Self::Registry(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Store(_) | Self::Registry(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let detail = match self {
            Self::Validation(err) => json!(err.violations()),
            Self::BadRequest(msg) => json!(msg),
            Self::StoreNotConfigured => json!("Database not configured"),
            Self::Store(_) | Self::Registry(_) => {
                json!("Internal server error")
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
