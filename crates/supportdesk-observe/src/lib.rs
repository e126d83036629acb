//! Observability for supportdesk: tracing subscriber setup and GenAI span values.

pub mod genai_attrs;
pub mod tracing_setup;
