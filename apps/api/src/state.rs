use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionProvider;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; requests never share mutable state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Streaming chat-completion provider. Production: `LlmClient`.
    pub llm: Arc<dyn CompletionProvider>,
}
