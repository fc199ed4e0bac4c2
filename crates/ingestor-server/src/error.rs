//! Server-specific error types

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ingestor_common::IngestorError;
use serde_json::json;
use thiserror::Error;

use crate::storage::StorageError;

/// Body text for every unexpected failure
pub const INTERNAL_ERROR_DETAIL: &str = "Internal Server Error";

/// Errors returned by HTTP handlers
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<IngestorError> for AppError {
    fn from(err: IngestorError) -> Self {
        match err {
            IngestorError::Validation(msg) => AppError::Validation(msg),
            IngestorError::InvalidTimestamp(raw) => {
                AppError::Validation(format!("Invalid timestamp: {}", raw))
            },
            IngestorError::Serialization(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::Validation(message) => {
                tracing::warn!("Request rejected: {}", message);
                (StatusCode::UNPROCESSABLE_ENTITY, message)
            },
            AppError::Storage(ref e) => {
                tracing::error!("Storage error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Storage error: {}", e))
            },
            AppError::Internal(ref message) => {
                tracing::error!("Internal error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_DETAIL.to_string())
            },
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
