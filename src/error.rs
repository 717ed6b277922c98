//! Error types for Formular Server

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::pdf::FillError;
use crate::validate::SchemaError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid form schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("PDF fill failed: {0}")]
    Fill(#[from] FillError),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Schema(e) => (
                StatusCode::BAD_REQUEST,
                "invalid_schema",
                format!("Schema cannot be compiled: {}", e),
            ),
            AppError::Multipart(e) => (
                StatusCode::BAD_REQUEST,
                "bad_request",
                format!("Invalid multipart request: {}", e),
            ),
            AppError::Fill(e) => {
                tracing::error!("Fill error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "fill_error",
                    "Could not fill the PDF document".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}
