use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error type shared by every handler.
///
/// `BadRequest` carries the fixed client-facing message for invalid input.
/// `Internal` covers a document store or event bus that is unreachable or
/// rejects the call. Both render as `{"error": "<kind>", "message": "<details>"}`.
#[derive(Debug, PartialEq, Eq)]
pub enum AppError {
    BadRequest(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_kind, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "collaborator call failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
        };

        let body = json!({
            "error": error_kind,
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}
