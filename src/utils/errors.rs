//! Error handling
//!
//! Defines the error taxonomy of the service and how each error maps onto an
//! HTTP response. Store failures are logged server-side and answered with a
//! generic message; their cause never reaches the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Main application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error body returned to API callers
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            AppError::Database(e) => {
                tracing::error!(error = %e, "database error");
                ErrorResponse {
                    error: "Database Error".to_string(),
                    message: "An error occurred while accessing the database".to_string(),
                    details: None,
                    code: "DB_ERROR".to_string(),
                }
            }

            AppError::Validation(e) => {
                tracing::debug!(error = %e, "validation error");
                ErrorResponse {
                    error: "Validation Error".to_string(),
                    message: e.to_string(),
                    details: Some(json!(e)),
                    code: "VALIDATION_ERROR".to_string(),
                }
            }

            AppError::NotFound(msg) => {
                tracing::debug!("resource not found: {}", msg);
                ErrorResponse {
                    error: "Not Found".to_string(),
                    message: msg,
                    details: None,
                    code: "NOT_FOUND".to_string(),
                }
            }

            AppError::BadRequest(msg) => {
                tracing::debug!("bad request: {}", msg);
                ErrorResponse {
                    error: "Bad Request".to_string(),
                    message: msg,
                    details: None,
                    code: "BAD_REQUEST".to_string(),
                }
            }

            AppError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                ErrorResponse {
                    error: "Internal Server Error".to_string(),
                    message: "An unexpected error occurred".to_string(),
                    details: None,
                    code: "INTERNAL_ERROR".to_string(),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Typed result for fallible operations
pub type AppResult<T> = Result<T, AppError>;

/// Builds a "resource not found" error
pub fn not_found_error(resource: &str, id: i32) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Builds a "bad request" error
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}
