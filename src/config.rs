//! Config module - Manages flowsync configuration (flowsync.toml).
//!
//! Configuration file contains:
//! - Platform base URL and API key
//! - Project id
//! - Local flows directory

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main flowsync configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Config version (for future migrations)
    #[serde(default = "default_version")]
    pub version: u32,

    /// Base URL of the platform API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key used for every request
    #[serde(default)]
    pub api_key: String,

    /// Id of the project the key belongs to
    #[serde(default)]
    pub project_id: String,

    /// Directory pulled Flow snapshots are written to
    #[serde(default = "default_flows_dir")]
    pub flows_dir: PathBuf,
}

fn default_version() -> u32 {
    1
}

fn default_base_url() -> String {
    "https://api.flowsync.dev".to_string()
}

/// Get default flows directory.
pub fn default_flows_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("flowsync").join("flows"))
        .unwrap_or_else(|| PathBuf::from("./flows"))
}

/// Get default config directory (~/.config/flowsync/).
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("flowsync"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get default config file path.
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("flowsync.toml")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            base_url: default_base_url(),
            api_key: String::new(),
            project_id: String::new(),
            flows_dir: default_flows_dir(),
        }
    }
}

impl Config {
    /// Create new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Cannot parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load config from the default path, failing with a setup hint when it
    /// doesn't exist yet.
    pub fn load_required() -> Result<Self> {
        let path = default_config_path();
        if !path.exists() {
            anyhow::bail!("No configuration found. Run 'flowsync init' first.");
        }
        Self::load(&path)
    }

    /// Save config to file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).with_context(|| "Cannot serialize config to TOML")?;

        std::fs::write(path, content)
            .with_context(|| format!("Cannot write config file: {}", path.display()))?;

        // The file carries the API key; keep it owner-readable only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Check if config is initialized (has an API key).
    pub fn is_initialized(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, 1);
        assert!(!config.is_initialized());
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("test.toml");

        let mut config = Config::new();
        config.api_key = "key-123".to_string();
        config.project_id = "proj-1".to_string();
        config.save(&config_path)?;

        let loaded = Config::load(&config_path)?;
        assert!(loaded.is_initialized());
        assert_eq!(loaded.project_id, "proj-1");
        assert_eq!(loaded.base_url, default_base_url());

        Ok(())
    }

    #[test]
    #[cfg(unix)]
    fn test_save_permissions() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("test_perms.toml");

        let config = Config::new();
        config.save(&config_path)?;

        let metadata = std::fs::metadata(&config_path)?;
        let mode = metadata.permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        Ok(())
    }
}
