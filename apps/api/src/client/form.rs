//! Interview practice form state.
//!
//! The view layer owns one `FormState` and changes it only through
//! `FormAction`s, so every transition is explicit and testable.

use crate::interview::technique::Technique;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    SetTopic(String),
    SetTechnique(Technique),
    SetCredentialFlag(bool),
    SubmitStarted,
    ChunkReceived(String),
    Completed,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub topic: String,
    pub technique: Technique,
    pub technique_description: &'static str,
    /// Assumed true until the key-presence check answers.
    pub api_key_set: bool,
    /// Text of the latest response, accumulated chunk by chunk.
    pub output: String,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        let technique = Technique::default();
        Self {
            topic: String::new(),
            technique,
            technique_description: technique.description(),
            api_key_set: true,
            output: String::new(),
            loading: false,
            error: None,
        }
    }
}

impl FormState {
    /// Applies one action. Returns `false` when the action is refused in the
    /// current state (e.g. a second submit while a request is in flight).
    pub fn apply(&mut self, action: FormAction) -> bool {
        match action {
            FormAction::SetTopic(topic) => {
                self.topic = topic;
                true
            }
            FormAction::SetTechnique(technique) => {
                self.technique = technique;
                self.technique_description = technique.description();
                true
            }
            FormAction::SetCredentialFlag(set) => {
                self.api_key_set = set;
                true
            }
            FormAction::SubmitStarted => {
                if !self.can_submit() {
                    return false;
                }
                self.loading = true;
                self.output.clear();
                self.error = None;
                true
            }
            FormAction::ChunkReceived(chunk) => {
                if !self.loading {
                    return false;
                }
                self.output.push_str(&chunk);
                true
            }
            FormAction::Completed => {
                let was_loading = self.loading;
                self.loading = false;
                was_loading
            }
            FormAction::Failed(message) => {
                self.loading = false;
                self.error = Some(message);
                true
            }
        }
    }

    pub fn can_submit(&self) -> bool {
        self.api_key_set && !self.loading && !self.topic.trim().is_empty()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.loading {
            "Generating..."
        } else {
            "Generate Interview Practice"
        }
    }
}
