//! Shared domain types for supportdesk.
//!
//! Tickets, chat DTOs, LLM message shapes, memory records, configuration,
//! and their error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod memory;
pub mod ticket;
