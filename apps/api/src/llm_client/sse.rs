//! Incremental decoder for the `text/event-stream` bodies returned by
//! chat-completion providers.
//!
//! Network chunks do not respect line boundaries, so bytes are buffered until a
//! full line is available. Only `data:` fields are kept; an event is emitted on
//! the blank line that terminates it.

/// A complete server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    Data(String),
    /// The `[DONE]` sentinel that closes an OpenAI-style stream.
    Done,
}

const DONE_SENTINEL: &str = "[DONE]";

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data_lines: Vec<String>,
}

impl SseDecoder {
    /// Feeds raw bytes and returns every event completed by them, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');

            if line.is_empty() {
                if let Some(event) = self.dispatch() {
                    events.push(event);
                }
                continue;
            }

            // comment / keep-alive
            if line.starts_with(':') {
                continue;
            }

            let (field, value) = match line.split_once(':') {
                Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                None => (line, ""),
            };

            if field == "data" {
                self.data_lines.push(value.to_string());
            }
        }
        events
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        if self.data_lines.is_empty() {
            return None;
        }
        let data = self.data_lines.join("\n");
        self.data_lines.clear();

        if data == DONE_SENTINEL {
            Some(SseEvent::Done)
        } else {
            Some(SseEvent::Data(data))
        }
    }
}
