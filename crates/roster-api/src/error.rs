//! # API Error Types
//!
//! The terminal stage of the request pipeline. Every failure raised by the
//! validation stage, a controller, or the service layer ends up as an
//! [`AppError`], and [`AppError::into_response`] is the only place that
//! chooses an error status code and body.
//!
//! Error bodies always have the same two fields:
//!
//! ```json
//! { "message": "human-readable, safe to display", "internal_code": "STABLE_TAG" }
//! ```
//!
//! Internal error details are logged, never returned to clients.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use roster_schema::{SchemaValidationError, ValidationViolations};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::service::ServiceError;

/// Message returned for every unclassified failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred";

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub message: String,
    /// Machine-readable error code (e.g., "VALIDATION_ERROR", "CONFLICT").
    pub internal_code: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Payload failed schema validation (400).
    #[error("validation error: {0}")]
    Validation(ValidationViolations),

    /// Request body could not be parsed as JSON (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Conflict with existing state, e.g. a taken email (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Backing store unreachable or failing (503). The message is the
    /// service layer's fixed operator-facing text and is returned as-is.
    #[error("{0}")]
    ServiceUnavailable(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::ServiceUnavailable(_) => tracing::warn!(error = %self, "service unavailable"),
            Self::Validation(v) => tracing::debug!(fields = ?v.fields(), "request rejected by validation"),
            _ => {}
        }

        let body = ErrorBody {
            message,
            internal_code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Convert service-layer domain failures to API errors.
impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::EmailTaken { .. } => Self::Conflict(err.to_string()),
            ServiceError::Unavailable(message) => Self::ServiceUnavailable(message.to_string()),
        }
    }
}

/// Convert validation-stage failures to API errors. Anything other than a
/// payload violation means the schema set itself is broken.
impl From<SchemaValidationError> for AppError {
    fn from(err: SchemaValidationError) -> Self {
        match err {
            SchemaValidationError::ValidationFailed { violations, .. } => {
                Self::Validation(violations)
            }
            other => Self::Internal(other.to_string()),
        }
    }
}

/// Response for a panicking handler, installed via
/// `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };
    AppError::Internal(format!("handler panicked: {detail}")).into_response()
}
