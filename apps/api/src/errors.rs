use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message returned for any failure whose details must stay server-side.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while generating the response.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("OpenAI API key is not configured")]
    ConfigMissing,

    /// Non-success answer from the provider, forwarded to the caller as-is.
    #[error("Upstream error (status {status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ConfigMissing => {
                tracing::warn!("Interview requested without a provider key");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    AppError::ConfigMissing.to_string(),
                )
            }
            AppError::Upstream { status, body } => {
                tracing::error!("Provider API error (status {status}): {body}");
                let status =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                return (status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body)
                    .into_response();
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
