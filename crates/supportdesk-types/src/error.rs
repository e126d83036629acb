use thiserror::Error;

use crate::llm::LlmError;

/// Errors from the ticket store.
#[derive(Debug, Error)]
pub enum TicketError {
    #[error("ticket file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ticket CSV error: {0}")]
    Csv(String),

    #[error("invalid ticket priority: '{0}'")]
    InvalidPriority(String),
}

/// Errors from repository operations (used by trait definitions in supportdesk-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("AGENT_ENDPOINT and AGENT_ACCESS_KEY environment variables must be set")]
    MissingAgentCredentials,

    #[error("failed to read config file {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },
}

/// Errors from a chat turn.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("memory error: {0}")]
    Memory(#[from] RepositoryError),
}
