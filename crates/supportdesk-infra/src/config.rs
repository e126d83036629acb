//! Configuration loader for supportdesk.
//!
//! Layers, lowest to highest precedence:
//! 1. Built-in defaults ([`AppConfig::default()`])
//! 2. The TOML file: `--config`, else `SUPPORTDESK_CONFIG`, else
//!    `{data_dir}/config.toml`
//! 3. Environment variables (a `.env` file is loaded into the environment first)

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use supportdesk_types::config::{AgentSettings, AppConfig};
use supportdesk_types::error::ConfigError;

use crate::filesystem::{default_config_path, default_tickets_path};
use crate::sqlite::pool::default_database_url;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "SUPPORTDESK_CONFIG";

/// Credentials for the hosted agent, validated as present.
pub struct AgentCredentials {
    pub endpoint: String,
    pub access_key: SecretString,
}

/// Load `.env` from the current directory into the process environment.
///
/// A missing file is not an error.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("failed to load .env: {e}"),
    }
}

/// Pick the config file path.
///
/// Returns the path and whether it was asked for explicitly.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    env_value: Option<String>,
    data_dir: &Path,
) -> (PathBuf, bool) {
    if let Some(path) = explicit {
        return (path.to_path_buf(), true);
    }
    if let Some(path) = env_value.filter(|p| !p.trim().is_empty()) {
        return (PathBuf::from(path), true);
    }
    (default_config_path(data_dir), false)
}

/// Load configuration: TOML file, then environment overrides.
///
/// A missing implicit `config.toml` yields defaults. A file that was asked
/// for explicitly must exist. Unreadable or invalid files are errors.
pub async fn load_config(explicit: Option<&Path>, data_dir: &Path) -> Result<AppConfig, ConfigError> {
    let (path, required) =
        resolve_config_path(explicit, std::env::var(CONFIG_PATH_ENV).ok(), data_dir);
    let mut config = load_file(&path, required).await?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

async fn load_file(path: &Path, required: bool) -> Result<AppConfig, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
            tracing::debug!("No config.toml found at {}, using defaults", path.display());
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                message: err.to_string(),
            });
        }
    };

    let config = toml::from_str::<AppConfig>(&content).map_err(|err| ConfigError::Parse {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Apply environment overrides through `lookup`.
///
/// Blank values are ignored. An unparsable `SUPPORTDESK_PORT` is logged and
/// skipped.
pub fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |keys: &[&str]| {
        keys.iter()
            .find_map(|key| lookup(*key).filter(|v| !v.trim().is_empty()))
    };

    if let Some(endpoint) = get(&["AGENT_ENDPOINT", "agent_endpoint"]) {
        config.agent.endpoint = Some(endpoint);
    }
    if let Some(key) = get(&["AGENT_ACCESS_KEY", "agent_access_key"]) {
        config.agent.access_key = Some(key);
    }
    if let Some(model) = get(&["AGENT_MODEL"]) {
        config.agent.model = model;
    }
    if let Some(url) = get(&["DATABASE_URL"]) {
        config.storage.database_url = Some(url);
    }
    if let Some(path) = get(&["TICKETS_CSV"]) {
        config.storage.tickets_csv = Some(PathBuf::from(path));
    }
    if let Some(host) = get(&["SUPPORTDESK_HOST"]) {
        config.server.host = host;
    }
    if let Some(port) = get(&["SUPPORTDESK_PORT"]) {
        match port.trim().parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(e) => tracing::warn!(value = %port, "ignoring invalid SUPPORTDESK_PORT: {e}"),
        }
    }
    if let Some(dir) = get(&["SUPPORTDESK_WEB_DIR"]) {
        config.server.web_dir = PathBuf::from(dir);
    }
}

/// Require both agent endpoint and access key.
///
/// # Errors
///
/// Returns [`ConfigError::MissingAgentCredentials`] when either is unset or blank.
pub fn require_agent_credentials(agent: &AgentSettings) -> Result<AgentCredentials, ConfigError> {
    let endpoint = agent
        .endpoint
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty());
    let key = agent
        .access_key
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match (endpoint, key) {
        (Some(endpoint), Some(key)) => Ok(AgentCredentials {
            endpoint: endpoint.to_string(),
            access_key: SecretString::from(key.to_string()),
        }),
        _ => Err(ConfigError::MissingAgentCredentials),
    }
}

/// Ticket CSV path: configured, else `{data_dir}/tickets.csv`.
pub fn tickets_path(config: &AppConfig, data_dir: &Path) -> PathBuf {
    config
        .storage
        .tickets_csv
        .clone()
        .unwrap_or_else(|| default_tickets_path(data_dir))
}

/// Memory database URL: configured, else the SQLite file in the data dir.
pub fn database_url(config: &AppConfig, data_dir: &Path) -> String {
    config
        .storage
        .database_url
        .clone()
        .unwrap_or_else(|| default_database_url(data_dir))
}
