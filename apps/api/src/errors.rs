use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::export::ExportError;
use crate::resume::image::ImageError;
use crate::resume::mutations::MutationError;
use crate::storage::persistence::PersistError;

/// Application-level error type.
/// Every variant is recoverable: it becomes a JSON notification for the client and the
/// service keeps running.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Mutation(#[from] MutationError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("Save failed: {0}")]
    Persist(#[from] PersistError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Mutation(e) => match e {
                MutationError::CategoryOutOfRange { .. } | MutationError::UnknownCategory(_) => {
                    (StatusCode::NOT_FOUND, "UNKNOWN_CATEGORY", e.to_string())
                }
                MutationError::ProtectedCategory(_) => {
                    (StatusCode::CONFLICT, "PROTECTED_CATEGORY", e.to_string())
                }
            },
            AppError::Image(e) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_IMAGE", e.to_string()),
            AppError::Persist(e) => {
                tracing::error!("Persist error: {e}");
                (
                    StatusCode::INSUFFICIENT_STORAGE,
                    "SAVE_FAILED",
                    "Failed to save resume data. Storage may be full.".to_string(),
                )
            }
            AppError::Export(e) => {
                tracing::error!("Export error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "EXPORT_FAILED",
                    "Failed to generate PDF. Please try again.".to_string(),
                )
            }
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
