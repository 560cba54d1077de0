//! Error types for the service and HTTP layers.
//!
//! The service reports *what* went wrong through [`ServiceError`]; each
//! handler decides which status that becomes and wraps it in an [`ApiError`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors returned by [`crate::service::TodoService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The caller supplied input that can never succeed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A mutation targeted ids that do not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The database failed underneath us.
    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// True for errors the client caused (validation, not-found).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_))
    }
}

/// An error on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    code: &'static str,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        let code = match status {
            StatusCode::BAD_REQUEST => "BAD_REQUEST",
            StatusCode::NOT_FOUND => "NOT_FOUND",
            StatusCode::METHOD_NOT_ALLOWED => "METHOD_NOT_ALLOWED",
            _ if status.is_server_error() => "INTERNAL_SERVER_ERROR",
            _ => "ERROR",
        };
        Self {
            status,
            message: message.into(),
            code,
        }
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Maps a service error, sending client-caused errors to `client_status`.
    /// Storage errors are always 500.
    #[must_use]
    pub fn from_service(err: ServiceError, client_status: StatusCode) -> Self {
        if err.is_client_error() {
            Self::new(client_status, err.to_string())
        } else {
            Self::internal(err.to_string())
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Serialize)]
struct ErrorResponse<'a> {
    code: &'a str,
    message: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, message = %self.message, "Request failed");
        } else {
            tracing::warn!(status = %self.status, message = %self.message, "Request rejected");
        }

        let body = ErrorResponse {
            code: self.code,
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
