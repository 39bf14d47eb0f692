use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for leetwatch
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// Submission service settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Tracked accounts
    #[serde(default)]
    pub accounts: AccountsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Submission service configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    /// Endpoint that accepts `{"username": ...}` and returns submission lists
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    ///
    /// The sync loop itself never times out; this is the transport-level
    /// bound that keeps a dead endpoint from stalling a batch forever.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Tracked account configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AccountsConfig {
    /// Usernames synced at startup, in display order
    #[serde(default = "default_seeds")]
    pub seeds: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String, // "info"

    /// Log format
    #[serde(default = "default_log_format")]
    pub format: String, // "compact"
}

// Default value functions
fn default_endpoint() -> String {
    "https://leetcode-tracker-backend-ogqw.onrender.com/api/submissions".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_seeds() -> Vec<String> {
    vec![
        "saurabhmishra1491".to_string(),
        "_restart_2024".to_string(),
        "urstrulyatish".to_string(),
        "kumarhritick932003".to_string(),
        "goyalyashgoyal11".to_string(),
    ]
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "compact".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout: default_timeout(),
        }
    }
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            seeds: default_seeds(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            accounts: AccountsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location or create a default config
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load(&config_path)
        } else {
            // Create default config
            let config = Self::default();

            // Create config directory if it doesn't exist
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
            }

            // Save default config
            config.save(&config_path)?;

            tracing::info!("Created default configuration at: {:?}", config_path);
            Ok(config)
        }
    }

    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// Get the default configuration file path (XDG compliant)
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = config_dir().context("Failed to get user config directory")?;

        Ok(config_dir.join("leetwatch").join("config.yml"))
    }
}
