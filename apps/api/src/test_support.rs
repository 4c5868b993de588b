//! Shared fixtures for handler, relay and client tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use futures_util::{stream, StreamExt};

use crate::config::{Config, DEFAULT_OPENAI_API_BASE};
use crate::llm_client::{CompletionProvider, LlmError, TextStream};
use crate::routes::build_router;
use crate::state::AppState;

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn test_config(api_key: Option<&str>) -> Config {
    Config {
        openai_api_key: api_key.map(str::to_string),
        openai_api_base: DEFAULT_OPENAI_API_BASE.to_string(),
        port: 0,
        rust_log: "debug".to_string(),
    }
}

/// Builds the full application router around a scripted provider.
pub fn test_app(provider: Arc<ScriptedProvider>, api_key: Option<&str>) -> Router {
    build_router(AppState {
        config: test_config(api_key),
        llm: provider,
    })
}

/// Deterministic `CompletionProvider` that records every call.
#[derive(Default)]
pub struct ScriptedProvider {
    chunks: Vec<String>,
    failure: Option<(u16, String)>,
    calls: AtomicUsize,
    last_messages: Mutex<Option<(String, String)>>,
}

impl ScriptedProvider {
    pub fn streaming(chunks: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            ..Self::default()
        })
    }

    pub fn failing(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            failure: Some((status, body.to_string())),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The (system, user) pair of the most recent call.
    pub fn last_messages(&self) -> Option<(String, String)> {
        self.last_messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn stream_chat(
        &self,
        _api_key: &str,
        system: &str,
        user: &str,
    ) -> Result<TextStream, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_messages.lock().unwrap() = Some((system.to_string(), user.to_string()));

        if let Some((status, body)) = &self.failure {
            return Err(LlmError::Api {
                status: *status,
                body: body.clone(),
            });
        }

        let items: Vec<Result<String, LlmError>> =
            self.chunks.iter().cloned().map(Ok).collect();
        Ok(stream::iter(items).boxed())
    }
}
