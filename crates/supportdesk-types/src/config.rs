//! Configuration types for supportdesk.
//!
//! `AppConfig` mirrors the optional `config.toml` file. Every field has a
//! default so a partial (or empty) file parses; environment variables are
//! layered on top by the infra loader.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub agent: AgentSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub memory: MemorySettings,
}

/// Hosted agent endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Base URL of the OpenAI-compatible agent.
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    /// The agent decides its own model; `n/a` is what it expects.
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    pub max_tokens: Option<u32>,
}

fn default_model() -> String {
    "n/a".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            access_key: None,
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            max_tokens: None,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding `index.html` for the chat page.
    #[serde(default = "default_web_dir")]
    pub web_dir: PathBuf,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_web_dir() -> PathBuf {
    PathBuf::from("static")
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            web_dir: default_web_dir(),
        }
    }
}

/// Where tickets and memories live. `None` means "inside the data dir".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    pub database_url: Option<String>,
    pub tickets_csv: Option<PathBuf>,
}

/// Recall and session behavior of the memory layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorySettings {
    /// Attribution process id for this application.
    #[serde(default = "default_process_id")]
    pub process_id: String,
    #[serde(default = "default_recall_facts_limit")]
    pub recall_facts_limit: usize,
    #[serde(default = "default_recall_relevance_threshold")]
    pub recall_relevance_threshold: f64,
    #[serde(default = "default_session_timeout_minutes")]
    pub session_timeout_minutes: i64,
    /// Prior session messages replayed to the model each turn.
    #[serde(default = "default_history_messages")]
    pub history_messages: i64,
    /// Extract long-term facts in the background after each turn.
    #[serde(default = "default_augmentation")]
    pub augmentation: bool,
}

fn default_process_id() -> String {
    "support_bot".to_string()
}

fn default_recall_facts_limit() -> usize {
    5
}

fn default_recall_relevance_threshold() -> f64 {
    0.15
}

fn default_session_timeout_minutes() -> i64 {
    60
}

fn default_history_messages() -> i64 {
    20
}

fn default_augmentation() -> bool {
    true
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            process_id: default_process_id(),
            recall_facts_limit: default_recall_facts_limit(),
            recall_relevance_threshold: default_recall_relevance_threshold(),
            session_timeout_minutes: default_session_timeout_minutes(),
            history_messages: default_history_messages(),
            augmentation: default_augmentation(),
        }
    }
}
