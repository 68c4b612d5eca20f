//! Configuration model.

use crate::utils::path::DEFAULT_IGNORED_FILES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Action behaviour.
    pub actions: ActionConfig,
    /// Localization.
    pub l10n: L10nConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Trash directory for the local backend. Defaults to `<root>/.trash`.
    pub trash_dir: Option<PathBuf>,
}

/// Action configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    /// Files ignored when checking whether a folder is empty (regex).
    pub ignored_files: String,
    /// Minimum interval bracketing a deletion, in milliseconds.
    pub time_granule_ms: u64,
}

/// Localization configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct L10nConfig {
    /// TOML message catalog.
    pub catalog: Option<PathBuf>,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            ignored_files: DEFAULT_IGNORED_FILES.to_string(),
            time_granule_ms: 1000,
        }
    }
}

/// Get the configuration directory path.
fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("undoable")
}

/// Load configuration from an explicit file.
pub fn load_config_file(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str(&content)?;
    Ok(config)
}

/// Load configuration from the default location.
pub fn load_config() -> Config {
    let config_path = dirs_config_path().join("config.toml");

    if config_path.exists() {
        match load_config_file(&config_path) {
            Ok(config) => return config,
            Err(e) => tracing::warn!("Ignoring invalid config {:?}: {}", config_path, e),
        }
    }

    Config::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.actions.time_granule_ms, 1000);
        assert_eq!(config.actions.ignored_files, DEFAULT_IGNORED_FILES);
        assert!(config.storage.trash_dir.is_none());
    }

    #[test]
    fn test_partial_toml() {
        let config: Config = toml::from_str("[actions]\ntime_granule_ms = 250\n").unwrap();
        assert_eq!(config.actions.time_granule_ms, 250);
        assert_eq!(config.actions.ignored_files, DEFAULT_IGNORED_FILES);
    }

    #[test]
    fn test_load_config_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[storage]\ntrash_dir = \"/tmp/trash\"\n").unwrap();
        let config = load_config_file(&path).unwrap();
        assert_eq!(config.storage.trash_dir, Some(PathBuf::from("/tmp/trash")));
    }
}
