//! Infrastructure layer for supportdesk.
//!
//! Contains implementations of the ports defined in `supportdesk-core`:
//! the CSV ticket store, the SQLite memory repository, and the
//! OpenAI-compatible LLM provider. Also owns configuration loading and
//! data directory resolution.

pub mod config;
pub mod filesystem;
pub mod llm;
pub mod sqlite;
pub mod tickets;
