//! Generative layer: OpenRouter backend plus typed generation and
//! judgment clients.
//!
//! The [`types::LlmBackend`] trait is the seam between the pipeline and
//! the provider. [`client::GenerativeClient`] drives the full
//! call-parse-validate-retry cycle for the two operations the pipeline
//! performs.

pub mod client;
mod http;
pub mod json;
pub mod openrouter;
pub mod prompts;
pub mod types;

pub use client::{GenerativeClient, LLM_TIMEOUT};
pub use openrouter::OpenRouterBackend;
pub use types::{LlmBackend, LlmInvocation, LlmResult, Message, Role};
