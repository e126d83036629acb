//! Business logic and port traits for supportdesk.
//!
//! This crate defines the "ports" (ticket store, memory repository, LLM
//! provider) that the infrastructure layer implements, plus the services
//! built on them. It depends only on `supportdesk-types` -- never on
//! `supportdesk-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
pub mod memory;
pub mod prompt;
pub mod ticket;
pub mod tools;

#[cfg(test)]
pub(crate) mod testing;
