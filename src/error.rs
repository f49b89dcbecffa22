//! Error types for the service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == App Error Enum ==
/// Unified error type for the cache and bulk operation endpoints.
#[derive(Error, Debug)]
pub enum AppError {
    /// Key or operation not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A bulk operation failed its pre-flight checks.
    ///
    /// `message` is the first violation, `errors` holds all of them.
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<String>,
    },
}

impl AppError {
    /// Builds a validation error from the collected violations.
    pub fn validation(errors: Vec<String>) -> Self {
        let message = errors
            .first()
            .cloned()
            .unwrap_or_else(|| "Invalid operation".to_string());
        AppError::Validation { message, errors }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::new(msg)),
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            AppError::Validation { message, errors } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_details(message, errors),
            ),
        };

        (status, Json(body)).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the service.
pub type Result<T> = std::result::Result<T, AppError>;
