//! LlmProvider trait definition.
//!
//! This is the core abstraction that every completion backend implements.
//! Uses RPITIT for `complete`; `BoxLlmProvider` adds dynamic dispatch.

use supportdesk_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for chat-completion backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in supportdesk-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gradient", "openai").
    fn name(&self) -> &str;

    /// Model sent when a request leaves `model` empty.
    fn model(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
