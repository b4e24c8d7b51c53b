use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The model answered, but with content that does not fit the expected shape.
    #[error("Model output error: {0}")]
    ModelOutput(String),

    /// The model could not be reached or refused the request.
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Document store or other cloud dependency failed.
    #[error("Upstream service error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Classifies a model failure, prefixing it with the stage that made the call.
    pub fn model(stage: &str, err: LlmError) -> Self {
        if err.is_unavailable() {
            AppError::ModelUnavailable(format!("{stage}: {err}"))
        } else {
            AppError::ModelOutput(format!("{stage}: {err}"))
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(path) => AppError::NotFound(format!("Record {path} not found")),
            StoreError::Unavailable(msg) => AppError::Upstream(msg),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::ModelOutput(msg) => {
                tracing::error!("Model output error: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "MODEL_OUTPUT_ERROR",
                    format!("The AI model returned an unusable response: {msg}"),
                )
            }
            AppError::ModelUnavailable(msg) => {
                tracing::error!("Model unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "MODEL_UNAVAILABLE",
                    format!("The AI model is currently unavailable: {msg}"),
                )
            }
            AppError::Upstream(msg) => {
                tracing::error!("Upstream service error: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "UPSTREAM_ERROR",
                    format!("A cloud service is currently unavailable: {msg}"),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    format!("An unexpected error occurred: {e}"),
                )
            }
        };

        let body = Json(json!({
            "detail": message,
            "code": code
        }));

        (status, body).into_response()
    }
}
