//! Completion relay: opens one provider stream per interview and pipes its
//! text deltas to the HTTP response body.
//!
//! A producer task owns the provider stream and feeds a bounded channel; the
//! response body is the consumer. Dropping the body (client gone) makes the
//! producer's next send fail, which drops the provider stream and closes the
//! upstream connection. Nothing is retried.

use bytes::Bytes;
use futures_util::stream::{self, BoxStream};
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn, Instrument, Span};

use crate::errors::AppError;
use crate::interview::prompts::user_message;
use crate::interview::technique::Technique;
use crate::llm_client::{CompletionProvider, LlmError, TextStream};

/// Chunks buffered between the provider and a slow client.
pub const RELAY_BUFFER: usize = 16;

/// A validated interview submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewPrompt {
    pub topic: String,
    pub technique: Technique,
}

/// Response body stream: provider chunks in arrival order.
pub type RelayStream = BoxStream<'static, Result<Bytes, LlmError>>;

/// Issues the completion call and returns the live relay stream.
///
/// Fails before any body is produced when the provider cannot be reached
/// (`Internal`) or answers with a non-success status (`Upstream`, verbatim).
pub async fn open_relay(
    provider: &dyn CompletionProvider,
    api_key: &str,
    prompt: &InterviewPrompt,
) -> Result<RelayStream, AppError> {
    let user = user_message(&prompt.topic);
    debug!(technique = %prompt.technique, "Calling provider");

    let upstream = provider
        .stream_chat(api_key, prompt.technique.system_prompt(), &user)
        .await
        .map_err(|e| match e {
            LlmError::Api { status, body } => AppError::Upstream { status, body },
            other => AppError::Internal(
                anyhow::Error::new(other).context("Failed to open provider stream"),
            ),
        })?;

    let (tx, rx) = mpsc::channel(RELAY_BUFFER);
    tokio::spawn(pump(upstream, tx).instrument(Span::current()));

    Ok(receiver_stream(rx))
}

/// Producer half: forwards provider items until the stream ends, fails, or
/// the consumer goes away.
async fn pump(mut upstream: TextStream, tx: mpsc::Sender<Result<Bytes, LlmError>>) {
    let mut relayed = 0usize;

    while let Some(item) = upstream.next().await {
        let failed = match &item {
            Ok(_) => false,
            Err(e) => {
                warn!("Provider stream failed after {relayed} chunks: {e}");
                true
            }
        };

        if tx.send(item.map(Bytes::from)).await.is_err() {
            info!("Client disconnected after {relayed} chunks; closing provider stream");
            return;
        }
        if failed {
            return;
        }
        relayed += 1;
    }

    info!("Relay completed ({relayed} chunks)");
}

/// Consumer half, shaped as a `Stream` for `Body::from_stream`.
fn receiver_stream(rx: mpsc::Receiver<Result<Bytes, LlmError>>) -> RelayStream {
    stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|item| (item, rx))
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedProvider;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn react_prompt() -> InterviewPrompt {
        InterviewPrompt {
            topic: "React".to_string(),
            technique: Technique::FewShot,
        }
    }

    async fn drain(stream: RelayStream) -> Vec<String> {
        stream
            .map(|item| String::from_utf8(item.unwrap().to_vec()).unwrap())
            .collect()
            .await
    }

    #[tokio::test]
    async fn test_relay_preserves_chunk_order() {
        let provider = ScriptedProvider::streaming(&["Q1", "...", "Q3"]);
        let stream = open_relay(provider.as_ref(), "sk-test", &react_prompt())
            .await
            .unwrap();
        assert_eq!(drain(stream).await, vec!["Q1", "...", "Q3"]);
    }

    #[tokio::test]
    async fn test_relay_sends_technique_prompt_and_topic() {
        let provider = ScriptedProvider::streaming(&["ok"]);
        let prompt = InterviewPrompt {
            topic: "Data Structures".to_string(),
            technique: Technique::StepByStep,
        };
        open_relay(provider.as_ref(), "sk-test", &prompt).await.unwrap();

        let (system, user) = provider.last_messages().unwrap();
        assert_eq!(system, Technique::StepByStep.system_prompt());
        assert_eq!(user, "Topic: Data Structures");
    }

    #[tokio::test]
    async fn test_relay_maps_api_failure_to_upstream() {
        let provider = ScriptedProvider::failing(429, "rate limited");
        match open_relay(provider.as_ref(), "sk-test", &react_prompt()).await {
            Err(AppError::Upstream { status, body }) => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            Err(other) => panic!("expected upstream error, got {other:?}"),
            Ok(_) => panic!("expected upstream error, got a stream"),
        }
        assert_eq!(provider.calls(), 1, "no retry");
    }

    #[tokio::test]
    async fn test_relay_handles_more_chunks_than_buffer() {
        let chunks: Vec<String> = (0..RELAY_BUFFER * 4).map(|i| format!("c{i} ")).collect();
        let refs: Vec<&str> = chunks.iter().map(String::as_str).collect();
        let provider = ScriptedProvider::streaming(&refs);

        let stream = open_relay(provider.as_ref(), "sk-test", &react_prompt())
            .await
            .unwrap();
        assert_eq!(drain(stream).await, chunks);
    }

    /// Endless provider whose stream reports when it is dropped.
    struct EndlessProvider {
        produced: Arc<AtomicUsize>,
        dropped: Arc<AtomicBool>,
    }

    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl CompletionProvider for EndlessProvider {
        async fn stream_chat(
            &self,
            _api_key: &str,
            _system: &str,
            _user: &str,
        ) -> Result<TextStream, LlmError> {
            let flag = DropFlag(self.dropped.clone());
            let produced = self.produced.clone();
            Ok(stream::unfold((flag, produced), |(flag, produced)| async move {
                produced.fetch_add(1, Ordering::SeqCst);
                Some((Ok("tick".to_string()), (flag, produced)))
            })
            .boxed())
        }
    }

    #[tokio::test]
    async fn test_dropping_consumer_closes_provider_stream() {
        let dropped = Arc::new(AtomicBool::new(false));
        let produced = Arc::new(AtomicUsize::new(0));
        let provider = EndlessProvider {
            produced: produced.clone(),
            dropped: dropped.clone(),
        };

        let mut stream = open_relay(&provider, "sk-test", &react_prompt())
            .await
            .unwrap();
        assert!(stream.next().await.is_some());
        drop(stream);

        for _ in 0..100 {
            if dropped.load(Ordering::SeqCst) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(dropped.load(Ordering::SeqCst), "provider stream must be released");

        // Backpressure: the producer never runs far ahead of the buffer.
        assert!(produced.load(Ordering::SeqCst) <= RELAY_BUFFER + 3);
    }

    struct BrokenMidStream;

    #[async_trait]
    impl CompletionProvider for BrokenMidStream {
        async fn stream_chat(
            &self,
            _api_key: &str,
            _system: &str,
            _user: &str,
        ) -> Result<TextStream, LlmError> {
            let items: Vec<Result<String, LlmError>> = vec![
                Ok("Q1".to_string()),
                Err(LlmError::Api {
                    status: 500,
                    body: "stream reset".to_string(),
                }),
                Ok("never".to_string()),
            ];
            Ok(stream::iter(items).boxed())
        }
    }

    #[tokio::test]
    async fn test_mid_stream_failure_ends_relay_with_error() {
        let stream = open_relay(&BrokenMidStream, "sk-test", &react_prompt())
            .await
            .unwrap();
        let items: Vec<Result<Bytes, LlmError>> = stream.collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(&items[0].as_ref().unwrap()[..], b"Q1");
        assert!(items[1].is_err());
    }
}
