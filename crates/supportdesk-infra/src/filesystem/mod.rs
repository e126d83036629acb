//! Data directory layout for supportdesk.
//!
//! Everything the application persists (config, ticket CSV, memory database)
//! lives under one data directory unless configured otherwise.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "SUPPORTDESK_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `SUPPORTDESK_DATA_DIR` environment variable
/// 2. `~/.supportdesk`
/// 3. `.supportdesk` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    data_dir_from(std::env::var(DATA_DIR_ENV).ok(), dirs::home_dir())
}

fn data_dir_from(env_value: Option<String>, home: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = env_value.filter(|d| !d.trim().is_empty()) {
        return PathBuf::from(dir);
    }
    match home {
        Some(home) => home.join(".supportdesk"),
        None => PathBuf::from(".supportdesk"),
    }
}

/// Create the data directory if it does not exist yet.
pub async fn ensure_data_dir(data_dir: &Path) -> Result<(), std::io::Error> {
    tokio::fs::create_dir_all(data_dir).await
}

/// Default location of the ticket CSV: `{data_dir}/tickets.csv`.
pub fn default_tickets_path(data_dir: &Path) -> PathBuf {
    data_dir.join("tickets.csv")
}

/// Default location of the config file: `{data_dir}/config.toml`.
pub fn default_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_env_value_wins() {
        let dir = data_dir_from(
            Some("/tmp/test-supportdesk".to_string()),
            Some(PathBuf::from("/home/user")),
        );
        assert_eq!(dir, PathBuf::from("/tmp/test-supportdesk"));
    }

    #[test]
    fn test_blank_env_value_falls_back_to_home() {
        let dir = data_dir_from(Some("  ".to_string()), Some(PathBuf::from("/home/user")));
        assert_eq!(dir, PathBuf::from("/home/user/.supportdesk"));
    }

    #[test]
    fn test_no_home_uses_relative_dir() {
        assert_eq!(data_dir_from(None, None), PathBuf::from(".supportdesk"));
    }

    #[test]
    fn test_default_paths() {
        let data_dir = PathBuf::from("/home/user/.supportdesk");
        assert_eq!(
            default_tickets_path(&data_dir),
            PathBuf::from("/home/user/.supportdesk/tickets.csv")
        );
        assert_eq!(
            default_config_path(&data_dir),
            PathBuf::from("/home/user/.supportdesk/config.toml")
        );
    }

    #[tokio::test]
    async fn test_ensure_data_dir_creates_nested() {
        let tmp = tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        ensure_data_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        // Idempotent.
        ensure_data_dir(&nested).await.unwrap();
    }
}
