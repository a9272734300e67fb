//! Configuration management for the UV radiation service
//!
//! Handles loading configuration from a TOML file and environment variables
//! and provides validation for all configuration settings.

use crate::UvError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "UVRAD_CONFIG";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UvConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Realtime UV index provider
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Scraped backup provider
    #[serde(default)]
    pub backup: BackupConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// "production" hides internal error details from responses
    #[serde(default = "default_environment")]
    pub environment: String,
}

/// Realtime provider (CurrentUVIndex) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    #[serde(default = "default_realtime_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_realtime_timeout")]
    pub timeout_seconds: u32,
    #[serde(default = "default_realtime_user_agent")]
    pub user_agent: String,
}

/// Backup provider (SENAMHI page) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    #[serde(default = "default_backup_url")]
    pub url: String,
    /// Request timeout in seconds
    #[serde(default = "default_backup_timeout")]
    pub timeout_seconds: u32,
    #[serde(default = "default_backup_user_agent")]
    pub user_agent: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_environment() -> String {
    "production".to_string()
}

fn default_realtime_base_url() -> String {
    "https://currentuvindex.com/api/v1/uvi".to_string()
}

fn default_realtime_timeout() -> u32 {
    10
}

fn default_realtime_user_agent() -> String {
    "Mozilla/5.0 (compatible; RadiacionUV-API/2.0)".to_string()
}

fn default_backup_url() -> String {
    "https://www.senamhi.gob.pe/?p=radiacion-uv-numerico".to_string()
}

fn default_backup_timeout() -> u32 {
    15
}

fn default_backup_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
        }
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            base_url: default_realtime_base_url(),
            timeout_seconds: default_realtime_timeout(),
            user_agent: default_realtime_user_agent(),
        }
    }
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            url: default_backup_url(),
            timeout_seconds: default_backup_timeout(),
            user_agent: default_backup_user_agent(),
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

impl Default for UvConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            realtime: RealtimeConfig::default(),
            backup: BackupConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Whether internal error details may be exposed to clients
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl UvConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        Self::load_from_path(path)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config.toml"));

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. UVRAD_SERVER__PORT=8080
        builder = builder.add_source(
            Environment::with_prefix("UVRAD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: UvConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
        if self.server.environment.is_empty() {
            self.server.environment = default_environment();
        }
        if self.realtime.base_url.is_empty() {
            self.realtime.base_url = default_realtime_base_url();
        }
        if self.realtime.timeout_seconds == 0 {
            self.realtime.timeout_seconds = default_realtime_timeout();
        }
        if self.realtime.user_agent.is_empty() {
            self.realtime.user_agent = default_realtime_user_agent();
        }
        if self.backup.url.is_empty() {
            self.backup.url = default_backup_url();
        }
        if self.backup.timeout_seconds == 0 {
            self.backup.timeout_seconds = default_backup_timeout();
        }
        if self.backup.user_agent.is_empty() {
            self.backup.user_agent = default_backup_user_agent();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        for (name, timeout) in [
            ("Realtime", self.realtime.timeout_seconds),
            ("Backup", self.backup.timeout_seconds),
        ] {
            if timeout == 0 || timeout > 120 {
                return Err(UvError::config(format!(
                    "{name} provider timeout must be between 1 and 120 seconds"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(UvError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(UvError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let valid_environments = ["production", "development"];
        if !valid_environments.contains(&self.server.environment.as_str()) {
            return Err(UvError::config(format!(
                "Invalid environment '{}'. Must be one of: {}",
                self.server.environment,
                valid_environments.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Realtime provider", &self.realtime.base_url),
            ("Backup provider", &self.backup.url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(UvError::config(format!(
                    "{name} URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
