//! Backend-neutral invocation and result types
//!
//! Every generative call in the pipeline goes through [`LlmBackend`], so
//! tests can swap the HTTP backend for a scripted stub without touching
//! the clients built on top.

use async_trait::async_trait;
use pokefusion_utils::error::LlmError;
use std::time::Duration;

/// Chat message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

/// One generative call: target model, sampling parameters and deadline.
///
/// The backend requests structured JSON output for every invocation; the
/// pipeline has no free-text calls.
#[derive(Debug, Clone)]
pub struct LlmInvocation {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl LlmInvocation {
    #[must_use]
    pub fn new(model: impl Into<String>, messages: Vec<Message>, timeout: Duration) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout,
        }
    }
}

/// Default sampling temperature for generative calls.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default completion token budget for generative calls.
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// The raw textual outcome of a generative call.
#[derive(Debug, Clone)]
pub struct LlmResult {
    pub content: String,
    pub model: String,
    pub tokens_input: Option<u64>,
    pub tokens_output: Option<u64>,
}

impl LlmResult {
    #[must_use]
    pub fn new(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
            tokens_input: None,
            tokens_output: None,
        }
    }
}

/// A generative provider. One implementation speaks HTTP to OpenRouter;
/// tests provide scripted stubs.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn invoke(&self, inv: LlmInvocation) -> Result<LlmResult, LlmError>;
}
