//! OpenTelemetry GenAI Semantic Convention attribute values.
//!
//! Field names follow the OTel GenAI conventions (`gen_ai.operation.name`,
//! `gen_ai.provider.name`, ...) and are written inline in span macros; the
//! values recorded in them live here so every call site agrees.

// --- Operation name values ---

/// Chat completion for a support turn.
pub const OP_CHAT: &str = "chat";

/// Memory extraction from an exchange.
pub const OP_EXTRACT_MEMORY: &str = "extract_memory";

// --- Provider name values ---

/// Hosted agent reached through the OpenAI-compatible protocol.
pub const PROVIDER_GRADIENT: &str = "gradient";

/// Any other OpenAI-compatible endpoint.
pub const PROVIDER_OPENAI_COMPATIBLE: &str = "openai_compatible";

/// Pick the operation name for a request: tool-less, deterministic requests
/// are memory extraction, everything else is chat.
pub fn operation_for(has_tools: bool, temperature: Option<f64>) -> &'static str {
    if !has_tools && temperature == Some(0.0) {
        OP_EXTRACT_MEMORY
    } else {
        OP_CHAT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_for() {
        assert_eq!(operation_for(true, None), OP_CHAT);
        assert_eq!(operation_for(false, None), OP_CHAT);
        assert_eq!(operation_for(false, Some(0.0)), OP_EXTRACT_MEMORY);
    }
}
