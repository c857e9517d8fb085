//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Infrastructure failures are logged and returned with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::{ConnectionError, RepoError};
use crate::models::{Slug, ValidationError};

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Slug missing or malformed (400)
    InvalidSlug(ValidationError),

    /// No event with that slug (404)
    NotFound { slug: Slug },

    /// Connection or query failure (500, logged)
    Repository {
        message: &'static str,
        source: RepoError,
    },
}

impl ApiError {
    /// Map a repository failure to a 500 carrying `message`.
    pub fn failed(message: &'static str) -> impl FnOnce(RepoError) -> Self {
        move |source| Self::Repository { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidSlug(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Repository { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::InvalidSlug(e) => json!({
                "error": "validation_error",
                "message": "Invalid or missing slug parameter",
                "detail": e.to_string()
            }),
            Self::NotFound { slug } => json!({
                "error": "not_found",
                "message": format!("Event with slug '{}' not found", slug)
            }),
            Self::Repository { message, source } => {
                // Log the actual error, return generic message
                tracing::error!(error = %source, "{}", message);
                json!({
                    "error": "internal_error",
                    "message": message
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::InvalidSlug(e)
    }
}

impl From<ConnectionError> for ApiError {
    fn from(e: ConnectionError) -> Self {
        Self::Repository {
            message: "Database unavailable",
            source: RepoError::Connection(e),
        }
    }
}
