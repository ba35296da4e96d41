//! Error types for the notification broadcaster.
//!
//! [`NotifyError`] is the service-level error. Each variant maps to an HTTP
//! status code and a structured JSON error body. [`SendError`] describes a
//! single failed delivery to one connection; it never leaves a broadcast
//! pass, the dispatcher turns it into an eviction and a failure count.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ConnectionId;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid request: notification type must not be empty",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Service-level error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category     | HTTP Status               |
/// |-----------|--------------|---------------------------|
/// | 1000–1999 | Validation   | 400 Bad Request           |
/// | 2000–2999 | Connection   | 409 Conflict / 503        |
/// | 3000–3999 | Server       | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The handle has already reached the `Closed` state and cannot be
    /// registered again.
    #[error("connection {0} is closed")]
    ConnectionClosed(ConnectionId),

    /// The registry has been torn down and no longer accepts connections.
    #[error("notifier is shutting down")]
    ShuttingDown,

    /// A notification could not be serialized to JSON.
    #[error("failed to encode notification: {0}")]
    Encode(#[from] serde_json::Error),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl NotifyError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::ConnectionClosed(_) => 2001,
            Self::ShuttingDown => 2002,
            Self::Internal(_) => 3000,
            Self::Encode(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::ConnectionClosed(_) => StatusCode::CONFLICT,
            Self::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
            Self::Encode(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for NotifyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

/// Failure to deliver one frame to one connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    /// The transport is gone: the peer hung up or the handle was closed.
    #[error("connection closed")]
    Closed,

    /// The send did not complete within the per-send bound.
    #[error("send timed out after {0:?}")]
    Timeout(Duration),

    /// Any other transport-level failure.
    #[error("transport error: {0}")]
    Transport(String),
}
