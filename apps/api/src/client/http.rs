//! HTTP client for the Interview API: key-presence check and streamed
//! interview consumption.

use futures_util::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::client::form::{FormAction, FormState};
use crate::interview::handlers::{ApiKeyStatus, InterviewRequest};
use crate::interview::technique::Technique;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success answer; `message` is the JSON `error` field when present,
    /// otherwise the raw body.
    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Submission refused: {0}")]
    Refused(&'static str),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct InterviewClient {
    client: Client,
    base_url: String,
}

impl InterviewClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Key-presence check. Any failure to ask counts as "not set".
    pub async fn check_api_key(&self) -> bool {
        match self.fetch_api_key_status().await {
            Ok(status) => status.api_key_set,
            Err(e) => {
                warn!("Error checking API key: {e}");
                false
            }
        }
    }

    async fn fetch_api_key_status(&self) -> Result<ApiKeyStatus, ClientError> {
        let response = self
            .client
            .get(format!("{}/api/check-api-key", self.base_url))
            .send()
            .await?;
        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }

    /// Posts an interview request and hands each decoded text chunk to
    /// `on_chunk` as it arrives. Returns the full text.
    pub async fn stream_interview<F>(
        &self,
        topic: &str,
        technique: Technique,
        mut on_chunk: F,
    ) -> Result<String, ClientError>
    where
        F: FnMut(&str),
    {
        let request = InterviewRequest {
            topic: topic.to_string(),
            prompt_technique: technique.as_str().to_string(),
        };

        let response = self
            .client
            .post(format!("{}/api/interview", self.base_url))
            .json(&request)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let mut decoder = Utf8Decoder::default();
        let mut text = String::new();
        let mut bytes = response.bytes_stream();

        while let Some(chunk) = bytes.next().await {
            let decoded = decoder.push(&chunk?);
            if !decoded.is_empty() {
                on_chunk(&decoded);
                text.push_str(&decoded);
            }
        }

        let rest = decoder.finish();
        if !rest.is_empty() {
            on_chunk(&rest);
            text.push_str(&rest);
        }

        debug!("Interview stream finished ({} bytes)", text.len());
        Ok(text)
    }

    /// Runs one submission against `state`: refuses when the form cannot be
    /// submitted, otherwise streams chunks into it and records the outcome.
    /// `on_chunk` sees each chunk after it has been applied to the state.
    pub async fn submit<F>(&self, state: &mut FormState, mut on_chunk: F) -> Result<(), ClientError>
    where
        F: FnMut(&str),
    {
        if !state.apply(FormAction::SubmitStarted) {
            return Err(ClientError::Refused(if state.loading {
                "a request is already in flight"
            } else if !state.api_key_set {
                "the provider API key is not configured"
            } else {
                "topic cannot be empty"
            }));
        }

        let topic = state.topic.clone();
        let technique = state.technique;
        let result = self
            .stream_interview(&topic, technique, |chunk| {
                state.apply(FormAction::ChunkReceived(chunk.to_string()));
                on_chunk(chunk);
            })
            .await;

        match result {
            Ok(_) => {
                state.apply(FormAction::Completed);
                Ok(())
            }
            Err(e) => {
                state.apply(FormAction::Failed(e.to_string()));
                Err(e)
            }
        }
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.error)
        .unwrap_or(body);
    Err(ClientError::Server {
        status: status.as_u16(),
        message,
    })
}

/// Decodes UTF-8 across arbitrary chunk boundaries.
#[derive(Debug, Default)]
struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    fn push(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);

        match std::str::from_utf8(&self.pending) {
            Ok(text) => {
                let text = text.to_string();
                self.pending.clear();
                text
            }
            // Incomplete trailing sequence: keep it for the next chunk.
            Err(e) if e.error_len().is_none() => {
                let valid = e.valid_up_to();
                let text = String::from_utf8_lossy(&self.pending[..valid]).into_owned();
                self.pending.drain(..valid);
                text
            }
            Err(_) => {
                let text = String::from_utf8_lossy(&self.pending).into_owned();
                self.pending.clear();
                text
            }
        }
    }

    fn finish(&mut self) -> String {
        let text = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        text
    }
}
