//! LLM provider implementations.
//!
//! Contains the OpenAI-compatible implementation of the [`LlmProvider`]
//! trait defined in `supportdesk-core`, and a factory
//! ([`create_agent_provider`]) that builds it from configuration.
//!
//! [`LlmProvider`]: supportdesk_core::llm::provider::LlmProvider

pub mod openai_compat;

use std::time::Duration;

use supportdesk_core::llm::box_provider::BoxLlmProvider;
use supportdesk_core::llm::provider::LlmProvider;
use supportdesk_types::config::AgentSettings;
use supportdesk_types::llm::LlmError;

use crate::config::AgentCredentials;

use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxLlmProvider`] for the hosted support agent.
///
/// # Errors
///
/// Returns [`LlmError::Provider`] if the HTTP client cannot be built.
pub fn create_agent_provider(
    credentials: &AgentCredentials,
    settings: &AgentSettings,
) -> Result<BoxLlmProvider, LlmError> {
    let provider = OpenAiCompatibleProvider::gradient_agent(
        &credentials.endpoint,
        credentials.access_key.clone(),
        &settings.model,
        Duration::from_secs(settings.timeout_secs),
    )?;
    tracing::info!(
        provider = provider.name(),
        base_url = provider.base_url(),
        "agent provider configured"
    );
    Ok(BoxLlmProvider::new(provider))
}
