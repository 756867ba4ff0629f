use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Environment variable holding the provider credential.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
/// Environment variable overriding the provider base URL.
pub const BASE_URL_ENV: &str = "OPENWEATHER_BASE";
/// Environment variable pointing at an explicit config file.
pub const CONFIG_PATH_ENV: &str = "WEATHERDESK_CONFIG";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a single-line summary of all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Weather provider settings
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Response cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the provider, without a trailing endpoint name
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Provider credential, usually supplied through `OPENWEATHER_API_KEY`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if a usable credential is present (not empty, not a placeholder)
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .map(str::trim)
            .is_some_and(|k| !k.is_empty() && !k.starts_with("YOUR_"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of cached current conditions
    #[serde(default = "default_current_ttl")]
    pub current_ttl_secs: u64,

    /// Lifetime of cached forecasts
    #[serde(default = "default_forecast_ttl")]
    pub forecast_ttl_secs: u64,

    /// Upper bound on entries held in memory
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_current_ttl() -> u64 {
    300
}

fn default_forecast_ttl() -> u64 {
    1200
}

fn default_max_entries() -> usize {
    1024
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            current_ttl_secs: default_current_ttl(),
            forecast_ttl_secs: default_forecast_ttl(),
            max_entries: default_max_entries(),
        }
    }
}

impl CacheConfig {
    pub fn current_ttl(&self) -> Duration {
        Duration::from_secs(self.current_ttl_secs)
    }

    pub fn forecast_ttl(&self) -> Duration {
        Duration::from_secs(self.forecast_ttl_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP endpoint listens on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

impl ServerConfig {
    /// Parse the configured listen address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("server.bind_addr: {}", e)))
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing,
    /// then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_overrides(
            std::env::var(API_KEY_ENV).ok(),
            std::env::var(BASE_URL_ENV).ok(),
        );
        Ok(config)
    }

    /// Load configuration from an explicit path, writing defaults there when
    /// the file does not exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No config at {}, writing defaults", path.display());
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Replace file values with non-empty overrides.
    pub fn apply_overrides(&mut self, api_key: Option<String>, base_url: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.upstream.api_key = Some(key);
        }
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.upstream.base_url = url;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.upstream.base_url, "upstream.base_url", &mut result);

        if !self.upstream.has_api_key() {
            result.add_warning(
                "upstream.api_key",
                format!("No API key configured; set {} or upstream.api_key", API_KEY_ENV),
            );
        }

        if self.upstream.timeout_secs == 0 {
            result.add_error("upstream.timeout_secs", "Timeout must be greater than 0");
        } else if self.upstream.timeout_secs > 120 {
            result.add_warning(
                "upstream.timeout_secs",
                "Timeout is unusually long (>120 seconds)",
            );
        }

        if self.cache.current_ttl_secs == 0 {
            result.add_warning("cache.current_ttl_secs", "Current conditions caching disabled");
        }
        if self.cache.forecast_ttl_secs == 0 {
            result.add_warning("cache.forecast_ttl_secs", "Forecast caching disabled");
        }
        if self.cache.max_entries == 0 {
            result.add_error("cache.max_entries", "Cache must hold at least one entry");
        }

        if let Err(e) = self.server.socket_addr() {
            result.add_error("server.bind_addr", e.to_string());
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        if let Ok(explicit) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(explicit));
        }

        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::NotFound("platform config directory".into()))?
            .join("weatherdesk");

        Ok(config_dir.join("config.toml"))
    }
}
