// Interview practice: prompt techniques, topic guard, streaming relay.
// All provider calls go through llm_client, never direct HTTP calls here.

pub mod guard;
pub mod handlers;
pub mod prompts;
pub mod relay;
pub mod technique;
