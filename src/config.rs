//! Configuration module for Gator.
//!
//! The configuration file doubles as the session store: it records the
//! name of the currently logged-in user and is written back whenever
//! that changes.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::{GatorError, Result};

/// Default configuration file name, placed in the home directory.
pub const CONFIG_FILE_NAME: &str = ".gatorconfig.toml";

/// Environment variable overriding the configuration file location.
pub const CONFIG_PATH_ENV: &str = "GATOR_CONFIG";

/// Environment variable overriding the database URL.
pub const DATABASE_URL_ENV: &str = "GATOR_DATABASE_URL";

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL.
    #[serde(default = "default_db_url")]
    pub url: String,
}

fn default_db_url() -> String {
    "sqlite://gator.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file. Logs always go to stderr as well.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Feed fetching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Feed fetched by `agg` when no URL is given.
    #[serde(default = "default_feed_url")]
    pub default_feed_url: String,
    /// Total request timeout. Transport defaults apply when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_user_agent() -> String {
    "gator".to_string()
}

fn default_feed_url() -> String {
    "https://www.wagslane.dev/index.xml".to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            default_feed_url: default_feed_url(),
            timeout_secs: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Name of the logged-in user, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_user_name: Option<String>,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Feed fetching configuration.
    #[serde(default)]
    pub fetch: FetchConfig,
    /// File the configuration was loaded from and is saved to.
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the default configuration bound to `path`,
    /// so the first `set_user` creates it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config at {:?}, using defaults", path);
                Self::default()
            }
            Err(e) => return Err(GatorError::Io(e)),
        };
        config.path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Load configuration from the default location and apply environment
    /// variable overrides.
    pub fn load_default() -> Result<Self> {
        let mut config = Self::load(default_path()?)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| GatorError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `GATOR_DATABASE_URL`: Override the database URL
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            if !url.is_empty() {
                self.database.url = url;
            }
        }
    }

    /// Bind the configuration to a file without reading it.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// The file this configuration persists to.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Name of the logged-in user.
    pub fn current_user_name(&self) -> Result<&str> {
        self.current_user_name
            .as_deref()
            .ok_or_else(|| GatorError::Validation("no user is logged in".to_string()))
    }

    /// Set the logged-in user and persist immediately.
    pub fn set_user(&mut self, name: &str) -> Result<()> {
        self.current_user_name = Some(name.to_string());
        self.save()
            .map_err(|e| GatorError::Config(format!("error updating user to {name}: {e}")))?;
        info!(user = name, "Session user updated");
        Ok(())
    }

    /// Write the configuration back to its file.
    ///
    /// A configuration with no bound file is kept in memory only.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = toml::to_string_pretty(self)
            .map_err(|e| GatorError::Config(format!("config serialize error: {e}")))?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Resolve the configuration file location.
pub fn default_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    let home = std::env::var_os("HOME")
        .ok_or_else(|| GatorError::Config("HOME is not set".to_string()))?;
    Ok(PathBuf::from(home).join(CONFIG_FILE_NAME))
}
