//! Error types for Bookshelf server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error codes reported in error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    DbFailure = 2,
    NoSuchData = 3,
    BadValue = 4,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl AppError {
    fn parts(&self) -> (StatusCode, ErrorCode, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchData, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
