//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/algotrack/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/algotrack/` (~/.config/algotrack/)
//! - Data: `$XDG_DATA_HOME/algotrack/` (~/.local/share/algotrack/)
//! - State/Logs: `$XDG_STATE_HOME/algotrack/` (~/.local/state/algotrack/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Database location
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Export options
    #[serde(default)]
    pub export: ExportConfig,
}

/// Database configuration
#[derive(Debug, Deserialize, Default)]
pub struct DatabaseConfig {
    /// Override for the database file (defaults to the XDG data dir)
    pub path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

/// Export configuration
#[derive(Debug, Deserialize)]
pub struct ExportConfig {
    /// Pretty-print JSON exports
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

fn default_pretty() -> bool {
    true
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Database file to use: the configured override, else the default.
    pub fn resolved_database_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(Self::database_path)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/algotrack/config.toml` (~/.config/algotrack/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("algotrack").join("config.toml")
    }

    /// Returns the data directory path (for SQLite database)
    ///
    /// `$XDG_DATA_HOME/algotrack/` (~/.local/share/algotrack/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("algotrack")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/algotrack/` (~/.local/state/algotrack/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("algotrack")
    }

    /// Returns the default database file path
    ///
    /// `$XDG_DATA_HOME/algotrack/problems.db` (~/.local/share/algotrack/problems.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("problems.db")
    }
}
