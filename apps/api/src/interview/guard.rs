//! Minimal content guard for interview topics.

use crate::errors::AppError;

/// Lowercase substrings that disqualify a topic.
pub const DISALLOWED_TOPIC_TERMS: &[&str] = &["harmful", "illegal"];

pub const REJECTED_TOPIC_MESSAGE: &str =
    "Invalid topic. Please choose an appropriate interview subject.";

/// Validates a topic and returns it trimmed.
pub fn check_topic(topic: &str) -> Result<&str, AppError> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(AppError::Validation("topic cannot be empty".to_string()));
    }

    let lowered = topic.to_lowercase();
    if DISALLOWED_TOPIC_TERMS
        .iter()
        .any(|term| lowered.contains(term))
    {
        return Err(AppError::Validation(REJECTED_TOPIC_MESSAGE.to_string()));
    }

    Ok(topic)
}
