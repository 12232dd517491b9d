use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Storage *read* failures never appear here: loads and template fetches
/// degrade to empty defaults and are only logged.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication required")]
    NotAuthenticated,

    #[error("Save failed")]
    SaveFailed,

    #[error("Another storage operation is in flight")]
    Busy,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotAuthenticated => (
                StatusCode::UNAUTHORIZED,
                "NOT_AUTHENTICATED",
                "Please sign in to save your resume.".to_string(),
            ),
            AppError::SaveFailed => (
                StatusCode::BAD_GATEWAY,
                "SAVE_FAILED",
                "Failed to save your resume. Please try again.".to_string(),
            ),
            AppError::Busy => (
                StatusCode::CONFLICT,
                "BUSY",
                "Another save or load is still in progress.".to_string(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
