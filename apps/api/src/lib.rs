//! Interview practice API: turns a topic and a prompt technique into a
//! streamed chat completion.

pub mod client;
pub mod config;
pub mod errors;
pub mod interview;
pub mod llm_client;
pub mod routes;
pub mod state;

#[cfg(test)]
mod test_support;
