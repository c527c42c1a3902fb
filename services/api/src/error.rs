//! Custom error types for the scheduling service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::repositories::schedule::ScheduleWriteError;

/// Custom error type for the scheduling service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or invalid credentials
    #[error("Unauthorized")]
    Unauthorized,

    /// Authenticated but not allowed
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Write rejected because it collides with existing state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Login attempts exhausted
    #[error("Too many requests")]
    TooManyRequests,

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::TooManyRequests => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many login attempts, try again later".to_string(),
            ),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            ApiError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<ScheduleWriteError> for ApiError {
    fn from(err: ScheduleWriteError) -> Self {
        match err {
            ScheduleWriteError::EmployeeNotFound => {
                ApiError::NotFound("Employee not found".to_string())
            }
            ScheduleWriteError::NotFound => ApiError::NotFound("Schedule not found".to_string()),
            ScheduleWriteError::InvalidTimeRange => {
                ApiError::BadRequest("Start time must be before end time".to_string())
            }
            ScheduleWriteError::Conflict { start, end, .. } => ApiError::Conflict(format!(
                "Employee already has a conflicting schedule from {} to {}",
                start, end
            )),
            ScheduleWriteError::Database(e) => {
                tracing::error!("Schedule write failed: {}", e);
                ApiError::InternalServerError
            }
            ScheduleWriteError::Internal(e) => {
                tracing::error!("Schedule write failed: {}", e);
                ApiError::InternalServerError
            }
        }
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
