//! OpenRouter HTTP backend
//!
//! Speaks the OpenAI-compatible chat-completions protocol. Every request
//! asks for `json_object` output; the clients upstream still re-parse and
//! validate because providers do not always honor the format hint.

use crate::http::HttpClient;
use crate::types::{LlmBackend, LlmInvocation, LlmResult, Message, Role};
use async_trait::async_trait;
use pokefusion_config::OpenRouterConfig;
use pokefusion_utils::error::LlmError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// OpenRouter backend holding the endpoint and credential.
///
/// The API key is read once from the environment variable named in
/// configuration and kept in memory only.
#[derive(Debug, Clone)]
pub struct OpenRouterBackend {
    client: HttpClient,
    base_url: String,
    api_key: String,
}

impl OpenRouterBackend {
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` when the HTTP client cannot
    /// be constructed.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            client: HttpClient::new()?,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Build a backend from configuration, reading the API key from the
    /// environment variable the configuration names.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` when the key variable is
    /// unset or empty, or the HTTP client cannot be constructed.
    pub fn from_config(config: &OpenRouterConfig) -> Result<Self, LlmError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                LlmError::Misconfiguration(format!(
                    "OpenRouter API key not found in environment variable '{}'",
                    config.api_key_env
                ))
            })?;
        Self::new(config.base_url.clone(), api_key)
    }

    fn convert_messages(messages: &[Message]) -> Vec<WireMessage> {
        messages
            .iter()
            .map(|msg| WireMessage {
                role: match msg.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                },
                content: msg.content.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl LlmBackend for OpenRouterBackend {
    async fn invoke(&self, inv: LlmInvocation) -> Result<LlmResult, LlmError> {
        debug!(
            model = %inv.model,
            max_tokens = inv.max_tokens,
            temperature = inv.temperature,
            timeout_secs = inv.timeout.as_secs(),
            "invoking OpenRouter"
        );

        let body = ChatRequest {
            model: inv.model.clone(),
            messages: Self::convert_messages(&inv.messages),
            temperature: inv.temperature,
            max_tokens: inv.max_tokens,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
            stream: false,
        };

        let request = reqwest::Client::new()
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body);

        let response = self.client.execute(request, inv.timeout).await?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Transport(format!("failed to parse provider response: {e}")))?;

        let content = body
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::NoContent)?;

        let mut result = LlmResult::new(content, inv.model);
        if let Some(usage) = body.usage {
            result.tokens_input = Some(usage.prompt_tokens);
            result.tokens_output = Some(usage.completion_tokens);
        }

        debug!(
            model = %result.model,
            tokens_input = ?result.tokens_input,
            tokens_output = ?result.tokens_output,
            "OpenRouter invocation completed"
        );

        Ok(result)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_MAX_TOKENS;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn invocation(model: &str) -> LlmInvocation {
        LlmInvocation::new(model, vec![Message::user("make me a json")], Duration::from_secs(5))
    }

    #[tokio::test]
    async fn sends_openai_compatible_request_and_extracts_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "test/model",
                "temperature": 0.7,
                "max_tokens": DEFAULT_MAX_TOKENS,
                "response_format": {"type": "json_object"},
                "messages": [{"role": "user", "content": "make me a json"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "{\"ok\":true}"}}],
                "usage": {"prompt_tokens": 12, "completion_tokens": 7}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = OpenRouterBackend::new(format!("{}/chat", server.uri()), "test-key").unwrap();
        let result = backend.invoke(invocation("test/model")).await.unwrap();

        assert_eq!(result.content, "{\"ok\":true}");
        assert_eq!(result.tokens_input, Some(12));
        assert_eq!(result.tokens_output, Some(7));
    }

    #[tokio::test]
    async fn missing_content_is_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": null}}]
            })))
            .mount(&server)
            .await;

        let backend = OpenRouterBackend::new(server.uri(), "test-key").unwrap();
        let err = backend.invoke(invocation("test/model")).await.unwrap_err();
        assert!(matches!(err, LlmError::NoContent));
    }

    #[tokio::test]
    async fn empty_choices_is_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let backend = OpenRouterBackend::new(server.uri(), "test-key").unwrap();
        let err = backend.invoke(invocation("test/model")).await.unwrap_err();
        assert!(matches!(err, LlmError::NoContent));
    }

    #[tokio::test]
    async fn slow_provider_is_aborted_with_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "choices": [{"message": {"role": "assistant", "content": "{\"ok\":true}"}}]
                    }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let backend = OpenRouterBackend::new(server.uri(), "test-key").unwrap();
        let inv = LlmInvocation::new(
            "test/model",
            vec![Message::user("make me a json")],
            Duration::from_millis(50),
        );
        let err = backend.invoke(inv).await.unwrap_err();
        match err {
            LlmError::Timeout { duration } => assert_eq!(duration, Duration::from_millis(50)),
            other => panic!("expected Timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let backend = OpenRouterBackend::new(server.uri(), "test-key").unwrap();
        let err = backend.invoke(invocation("test/model")).await.unwrap_err();
        match err {
            LlmError::Transport(msg) => assert!(msg.contains("502"), "got: {msg}"),
            other => panic!("expected Transport, got {other:?}"),
        }
    }

    #[test]
    fn from_config_requires_the_key_variable() {
        let config = OpenRouterConfig {
            base_url: "http://localhost/chat".to_string(),
            api_key_env: "POKEFUSION_TEST_MISSING_KEY".to_string(),
        };
        std::env::remove_var("POKEFUSION_TEST_MISSING_KEY");
        let err = OpenRouterBackend::from_config(&config).unwrap_err();
        match err {
            LlmError::Misconfiguration(msg) => {
                assert!(msg.contains("POKEFUSION_TEST_MISSING_KEY"), "got: {msg}");
            }
            other => panic!("expected Misconfiguration, got {other:?}"),
        }
    }
}
