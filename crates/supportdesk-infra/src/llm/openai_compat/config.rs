//! Configuration for OpenAI-compatible providers.
//!
//! Each endpoint that speaks the chat completions protocol gets a factory
//! function returning an [`OpenAiCompatConfig`] with the correct base URL
//! and defaults.

use std::time::Duration;

use secrecy::SecretString;

/// Suffix the hosted agent platform serves its chat completions API under.
pub const AGENT_API_SUFFIX: &str = "/api/v1/";

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "gradient").
    pub provider_name: String,
    /// Base URL ending in `/`; `chat/completions` is appended to it.
    pub base_url: String,
    pub api_key: SecretString,
    /// Model identifier sent when a request does not name one.
    pub model: String,
    pub timeout: Duration,
}

/// Normalize a hosted agent endpoint into its API base URL.
///
/// `https://x.agents.do-ai.run` becomes `https://x.agents.do-ai.run/api/v1/`;
/// an endpoint already ending in `/api/v1/` is used as is.
pub fn agent_base_url(endpoint: &str) -> String {
    if endpoint.ends_with(AGENT_API_SUFFIX) {
        endpoint.to_string()
    } else {
        format!("{}{AGENT_API_SUFFIX}", endpoint.trim_end_matches('/'))
    }
}

/// Hosted agent (DigitalOcean Gradient) configuration.
pub fn gradient_agent_defaults(
    endpoint: &str,
    access_key: SecretString,
    model: &str,
    timeout: Duration,
) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: supportdesk_observe::genai_attrs::PROVIDER_GRADIENT.into(),
        base_url: agent_base_url(endpoint),
        api_key: access_key,
        model: model.into(),
        timeout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_base_url_appends_suffix() {
        assert_eq!(
            agent_base_url("https://agent.example.com"),
            "https://agent.example.com/api/v1/"
        );
        assert_eq!(
            agent_base_url("https://agent.example.com/"),
            "https://agent.example.com/api/v1/"
        );
    }

    #[test]
    fn test_agent_base_url_keeps_normalized_endpoint() {
        assert_eq!(
            agent_base_url("https://agent.example.com/api/v1/"),
            "https://agent.example.com/api/v1/"
        );
    }

    #[test]
    fn test_gradient_defaults() {
        let config = gradient_agent_defaults(
            "https://agent.example.com",
            SecretString::from("key".to_string()),
            "n/a",
            Duration::from_secs(120),
        );
        assert_eq!(config.provider_name, "gradient");
        assert_eq!(config.base_url, "https://agent.example.com/api/v1/");
        assert_eq!(config.model, "n/a");
    }
}
