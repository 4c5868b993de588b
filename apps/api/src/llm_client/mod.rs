//! LLM Client: the single point of entry for all chat-completion calls.
//!
//! ARCHITECTURAL RULE: No other module may call the provider API directly.
//! All LLM interactions MUST go through `CompletionProvider`.
//!
//! Model: gpt-4 at temperature 0.7 (hardcoded, do not make configurable to prevent drift)

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{
    future,
    stream::{self, BoxStream},
    Stream, StreamExt,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod sse;

use sse::{SseDecoder, SseEvent};

/// The model used for every interview completion.
pub const MODEL: &str = "gpt-4";
pub const TEMPERATURE: f64 = 0.7;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the provider. `body` is kept verbatim.
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Ordered text deltas produced by a streaming completion.
pub type TextStream = BoxStream<'static, Result<String, LlmError>>;

/// A provider of streamed chat completions.
///
/// Carried in `AppState` as `Arc<dyn CompletionProvider>` so handlers can be
/// exercised against a scripted provider.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Opens a streaming completion for one system + user message pair.
    /// Resolves once the provider has answered with headers; upstream
    /// non-success statuses surface as `LlmError::Api`.
    async fn stream_chat(
        &self,
        api_key: &str,
        system: &str,
        user: &str,
    ) -> Result<TextStream, LlmError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: ChatRole,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f64,
    pub stream: bool,
}

impl<'a> ChatRequest<'a> {
    /// Streaming request with the fixed model and temperature.
    pub fn streaming(system: &'a str, user: &'a str) -> Self {
        Self {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: ChatRole::System,
                    content: system,
                },
                ChatMessage {
                    role: ChatRole::User,
                    content: user,
                },
            ],
            temperature: TEMPERATURE,
            stream: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

enum Delta {
    Text(String),
    Done,
}

/// Chat-completion client for OpenAI-compatible endpoints.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
}

impl LlmClient {
    /// `base_url` is the API root, e.g. `https://api.openai.com/v1`.
    ///
    /// Only the connect phase is bounded: a completion stream may legitimately
    /// stay open for minutes.
    pub fn new(base_url: impl Into<String>) -> Result<Self, LlmError> {
        let client = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionProvider for LlmClient {
    async fn stream_chat(
        &self,
        api_key: &str,
        system: &str,
        user: &str,
    ) -> Result<TextStream, LlmError> {
        let request_body = ChatRequest::streaming(system, user);

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Provider API returned {}: {}", status, body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Provider stream opened (model: {MODEL})");
        Ok(text_deltas(response.bytes_stream()))
    }
}

/// Turns a provider SSE byte stream into the text deltas it carries.
/// Ends at `[DONE]` or when the body ends, whichever comes first.
fn text_deltas<S>(bytes: S) -> TextStream
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
{
    let mut decoder = SseDecoder::default();

    bytes
        .map(move |chunk| -> Vec<Result<Delta, LlmError>> {
            match chunk {
                Ok(chunk) => decoder.push(&chunk).into_iter().map(parse_event).collect(),
                Err(e) => vec![Err(LlmError::Http(e))],
            }
        })
        .flat_map(stream::iter)
        .take_while(|item| future::ready(!matches!(item, Ok(Delta::Done))))
        .filter_map(|item| {
            future::ready(match item {
                Ok(Delta::Text(text)) if !text.is_empty() => Some(Ok(text)),
                Ok(_) => None,
                Err(e) => Some(Err(e)),
            })
        })
        .boxed()
}

fn parse_event(event: SseEvent) -> Result<Delta, LlmError> {
    match event {
        SseEvent::Done => Ok(Delta::Done),
        SseEvent::Data(data) => {
            let chunk: ChatChunk = serde_json::from_str(&data)?;
            let text = chunk
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.delta.content)
                .unwrap_or_default();
            Ok(Delta::Text(text))
        }
    }
}
