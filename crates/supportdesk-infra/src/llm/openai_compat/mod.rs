//! OpenAI-compatible LLM provider implementation.
//!
//! A single [`OpenAiCompatibleProvider`] talks to any endpoint serving the
//! chat completions protocol. The hosted support agent is the main user, via
//! [`OpenAiCompatibleProvider::gradient_agent`].

pub mod config;
pub mod types;

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use secrecy::{ExposeSecret, SecretString};
use tracing::Instrument;

use supportdesk_core::llm::provider::LlmProvider;
use supportdesk_observe::genai_attrs;
use supportdesk_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, StopReason, ToolCall, Usage,
};

use self::config::OpenAiCompatConfig;
use self::types::{ChatCompletionBody, ChatCompletionResponseBody};

/// Unified provider for any OpenAI-compatible API.
///
/// # API Key Security
///
/// Does NOT derive Debug; the key stays inside a [`SecretString`] and is only
/// exposed when the bearer header is built.
pub struct OpenAiCompatibleProvider {
    client: reqwest::Client,
    provider_name: String,
    base_url: String,
    api_key: SecretString,
    model: String,
}

impl OpenAiCompatibleProvider {
    /// Create a new OpenAI-compatible provider from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Provider`] if the HTTP client cannot be built.
    pub fn new(config: OpenAiCompatConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            provider_name: config.provider_name,
            base_url: config.base_url,
            api_key: config.api_key,
            model: config.model,
        })
    }

    /// Create a provider for a hosted support agent endpoint.
    pub fn gradient_agent(
        endpoint: &str,
        access_key: SecretString,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Self::new(config::gradient_agent_defaults(
            endpoint, access_key, model, timeout,
        ))
    }

    /// Base URL requests are sent under.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn completions_url(&self) -> String {
        format!("{}chat/completions", self.base_url)
    }

    async fn send(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = ChatCompletionBody::from_request(request, &self.model);

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_ms = retry_after_ms(response.headers());
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "completion request rejected");
            return Err(match status.as_u16() {
                401 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited { retry_after_ms },
                503 | 529 => LlmError::Overloaded(error_body),
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let parsed: ChatCompletionResponseBody = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        let usage = parsed.usage.unwrap_or_default();
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?;

        let tool_calls: Vec<ToolCall> = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(ToolCall::from)
            .collect();

        Ok(CompletionResponse {
            id: parsed.id.unwrap_or_default(),
            content: choice.message.content.unwrap_or_default(),
            tool_calls,
            model: parsed.model.unwrap_or_else(|| body.model.clone()),
            stop_reason: StopReason::from_finish_reason(choice.finish_reason.as_deref()),
            usage: Usage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
        })
    }
}

/// Parse a `retry-after` header given in seconds. Values too large to
/// express in milliseconds saturate.
fn retry_after_ms(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1000))
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let model = if request.model.is_empty() {
            self.model.as_str()
        } else {
            request.model.as_str()
        };
        let span = tracing::info_span!(
            "gen_ai.complete",
            gen_ai.operation.name = genai_attrs::operation_for(
                !request.tools.is_empty(),
                request.temperature
            ),
            gen_ai.provider.name = %self.provider_name,
            gen_ai.request.model = %model,
            gen_ai.request.max_tokens = ?request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
        );

        let result = self.send(request).instrument(span.clone()).await;
        if let Ok(response) = &result {
            span.record("gen_ai.usage.input_tokens", response.usage.input_tokens);
            span.record("gen_ai.usage.output_tokens", response.usage.output_tokens);
            tracing::debug!(
                parent: &span,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                tool_calls = response.tool_calls.len(),
                "completion finished"
            );
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::json;
    use supportdesk_types::llm::{Message, ToolChoice, ToolDefinition};

    fn provider(server: &MockServer) -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::gradient_agent(
            &server.base_url(),
            SecretString::from("test-key".to_string()),
            "n/a",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new("", Some("Be helpful".to_string()), vec![Message::user("Hi")])
    }

    #[tokio::test]
    async fn test_complete_returns_text_and_usage() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/chat/completions")
                    .header("authorization", "Bearer test-key");
                then.status(200).json_body(json!({
                    "id": "chatcmpl-1",
                    "model": "agent-model",
                    "choices": [{
                        "message": {"role": "assistant", "content": "Hello there"},
                        "finish_reason": "stop"
                    }],
                    "usage": {"prompt_tokens": 20, "completion_tokens": 4, "total_tokens": 24}
                }));
            })
            .await;

        let response = provider(&server).complete(&request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.id, "chatcmpl-1");
        assert_eq!(response.content, "Hello there");
        assert_eq!(response.model, "agent-model");
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(response.usage.input_tokens, 20);
        assert_eq!(response.usage.output_tokens, 4);
        assert!(!response.has_tool_calls());
    }

    #[tokio::test]
    async fn test_complete_maps_tool_calls() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/chat/completions");
                then.status(200).json_body(json!({
                    "choices": [{
                        "message": {
                            "content": null,
                            "tool_calls": [{
                                "id": "call_1",
                                "type": "function",
                                "function": {"name": "check_ticket_status", "arguments": "{}"}
                            }]
                        },
                        "finish_reason": "tool_calls"
                    }]
                }));
            })
            .await;

        let tools = vec![ToolDefinition {
            name: "check_ticket_status".to_string(),
            description: "Check ticket status".to_string(),
            parameters: json!({"type": "object", "properties": {}}),
        }];
        let response = provider(&server)
            .complete(&request().with_tools(tools, ToolChoice::Auto))
            .await
            .unwrap();

        assert_eq!(response.stop_reason, StopReason::ToolUse);
        assert_eq!(response.content, "");
        assert_eq!(response.model, "n/a");
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].id, "call_1");
        assert_eq!(response.tool_calls[0].name, "check_ticket_status");
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_authentication_failed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/chat/completions");
                then.status(401).body("bad key");
            })
            .await;

        let err = provider(&server).complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn test_rate_limit_reads_retry_after() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/chat/completions");
                then.status(429).header("retry-after", "7").body("slow down");
            })
            .await;

        let err = provider(&server).complete(&request()).await.unwrap_err();
        match err {
            LlmError::RateLimited { retry_after_ms } => assert_eq!(retry_after_ms, Some(7000)),
            other => panic!("expected RateLimited, got: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unavailable_maps_to_overloaded() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/chat/completions");
                then.status(503).body("busy");
            })
            .await;

        let err = provider(&server).complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Overloaded(ref body) if body == "busy"));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_provider_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/chat/completions");
                then.status(500).body("boom");
            })
            .await;

        let err = provider(&server).complete(&request()).await.unwrap_err();
        match err {
            LlmError::Provider { message } => {
                assert!(message.contains("500"));
                assert!(message.contains("boom"));
            }
            other => panic!("expected Provider, got: {other}"),
        }
    }

    #[tokio::test]
    async fn test_no_choices_is_empty_response() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/chat/completions");
                then.status(200).json_body(json!({"choices": []}));
            })
            .await;

        let err = provider(&server).complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_malformed_body_is_deserialization_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/chat/completions");
                then.status(200).body("not json");
            })
            .await;

        let err = provider(&server).complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Deserialization(_)));
    }

    #[test]
    fn test_retry_after_ignores_http_dates() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, "Wed, 21 Oct 2015 07:28:00 GMT".parse().unwrap());
        assert_eq!(retry_after_ms(&headers), None);
        headers.insert(RETRY_AFTER, "3".parse().unwrap());
        assert_eq!(retry_after_ms(&headers), Some(3000));
        headers.insert(RETRY_AFTER, "18446744073709551615".parse().unwrap());
        assert_eq!(retry_after_ms(&headers), Some(u64::MAX));
        headers.insert(RETRY_AFTER, "18446744073709552".parse().unwrap());
        assert_eq!(retry_after_ms(&headers), Some(u64::MAX));
    }

    #[test]
    fn test_provider_identity() {
        let provider = OpenAiCompatibleProvider::gradient_agent(
            "https://agent.example.com",
            SecretString::from("k".to_string()),
            "n/a",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(provider.name(), "gradient");
        assert_eq!(provider.model(), "n/a");
        assert_eq!(provider.base_url(), "https://agent.example.com/api/v1/");
    }
}
