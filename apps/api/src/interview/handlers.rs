//! Axum route handlers for the Interview API.

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::guard::check_topic;
use crate::interview::relay::{open_relay, InterviewPrompt};
use crate::interview::technique::Technique;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRequest {
    pub topic: String,
    /// Kept as a raw string so unknown identifiers get a descriptive 400.
    pub prompt_technique: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyStatus {
    pub api_key_set: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/check-api-key
///
/// Reports whether the provider key is configured. Never fails.
pub async fn handle_check_api_key(State(state): State<AppState>) -> Json<ApiKeyStatus> {
    Json(ApiKeyStatus {
        api_key_set: state.config.api_key_set(),
    })
}

/// POST /api/interview
///
/// Validates topic and technique, then streams the provider's answer back as
/// chunked `text/plain`. Provider failures are forwarded with their own status.
pub async fn handle_interview(
    State(state): State<AppState>,
    payload: Result<Json<InterviewRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    let span = info_span!("interview", request_id = %Uuid::new_v4());
    async move {
        info!(
            topic = %request.topic,
            technique = %request.prompt_technique,
            "Received interview request"
        );

        let prompt = validate(&request)?;
        let api_key = state.config.api_key().ok_or(AppError::ConfigMissing)?;

        let stream = open_relay(state.llm.as_ref(), api_key, &prompt).await?;

        Ok((
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            Body::from_stream(stream),
        )
            .into_response())
    }
    .instrument(span)
    .await
}

fn validate(request: &InterviewRequest) -> Result<InterviewPrompt, AppError> {
    let topic = check_topic(&request.topic)?;
    let technique = request
        .prompt_technique
        .parse::<Technique>()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    Ok(InterviewPrompt {
        topic: topic.to_string(),
        technique,
    })
}
