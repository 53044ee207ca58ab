//! Configuration management for `SkyCast`
//!
//! Handles loading configuration from files and environment variables,
//! and validates the settings used by the proxy server and the client.

use crate::SkycastError;
use crate::models::HIGH_LOW_WINDOW;
use anyhow::{Context, Result};
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable the API key is read from when no other source sets it.
pub const LEGACY_API_KEY_VAR: &str = "API_KEY";

/// Root configuration structure for `SkyCast`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkycastConfig {
    /// Upstream weather provider settings (proxy side)
    pub upstream: UpstreamConfig,
    /// HTTP server settings (proxy side)
    pub server: ServerConfig,
    /// Client session settings
    pub client: ClientConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Upstream weather provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Provider API key, only ever used server-side
    pub api_key: Option<String>,
    /// Base URL of the provider's `data/2.5` API
    pub base_url: String,
    /// Unit system sent upstream
    pub units: String,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the proxy listens on (IP:PORT)
    pub bind_address: String,
}

/// Client session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the proxy the client talks to
    pub proxy_url: String,
    /// City added when geolocation is unavailable or fails
    pub default_city: String,
    /// How long success messages stay visible, in milliseconds
    pub message_timeout_ms: u64,
    /// Number of forecast samples used for the high/low figures
    pub high_low_window: usize,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_proxy_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_city() -> String {
    "Port Elizabeth".to_string()
}

fn default_message_timeout_ms() -> u64 {
    3000
}

fn default_high_low_window() -> usize {
    HIGH_LOW_WINDOW
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            units: default_units(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            proxy_url: default_proxy_url(),
            default_city: default_city(),
            message_timeout_ms: default_message_timeout_ms(),
            high_low_window: default_high_low_window(),
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

impl SkycastConfig {
    /// Load configuration from the given file (or the default location)
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(FileFormat::Toml),
            );
        }

        let mut config = Self::build(builder, Self::environment())?;

        if config.upstream.api_key.is_none() {
            config.upstream.api_key = std::env::var(LEGACY_API_KEY_VAR)
                .ok()
                .filter(|key| !key.is_empty());
        }

        config.validate()?;
        Ok(config)
    }

    /// `SKYCAST_<SECTION>__<KEY>` variables.
    ///
    /// Values stay strings until deserialization so keys like `0123` survive.
    fn environment() -> Environment {
        Environment::with_prefix("SKYCAST")
            .prefix_separator("_")
            .separator("__")
    }

    /// Layer `env` over `builder` and deserialize
    fn build(builder: ConfigBuilder<DefaultState>, env: Environment) -> Result<Self> {
        let settings = builder
            .add_source(env)
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SkycastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        Ok(config)
    }

    /// Parse a TOML document on top of the defaults
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let builder = Config::builder().add_source(File::from_str(toml, FileFormat::Toml));
        let config = Self::build(builder, Self::environment())?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("skycast").join("config.toml"))
    }

    /// Replace empty values with their defaults
    pub fn apply_defaults(&mut self) {
        if self.upstream.base_url.is_empty() {
            self.upstream.base_url = default_base_url();
        }
        if self.upstream.units.is_empty() {
            self.upstream.units = default_units();
        }
        if self.upstream.api_key.as_deref() == Some("") {
            self.upstream.api_key = None;
        }
        if self.server.bind_address.is_empty() {
            self.server.bind_address = default_bind_address();
        }
        if self.client.proxy_url.is_empty() {
            self.client.proxy_url = default_proxy_url();
        }
        if self.client.default_city.trim().is_empty() {
            self.client.default_city = default_city();
        }
        if self.client.message_timeout_ms == 0 {
            self.client.message_timeout_ms = default_message_timeout_ms();
        }
        if self.client.high_low_window == 0 {
            self.client.high_low_window = default_high_low_window();
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
        self.validate_urls()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// The proxy cannot run without a provider credential
    pub fn require_api_key(&self) -> Result<&str> {
        self.upstream.api_key.as_deref().ok_or_else(|| {
            SkycastError::config(format!(
                "Missing upstream API key. Set SKYCAST_UPSTREAM__API_KEY or {LEGACY_API_KEY_VAR}."
            ))
            .into()
        })
    }

    fn validate_urls(&self) -> Result<()> {
        for (name, url) in [
            ("Upstream base URL", &self.upstream.base_url),
            ("Proxy URL", &self.client.proxy_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SkycastError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL, got '{url}'"
                ))
                .into());
            }
        }
        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SkycastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SkycastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if self.upstream.units != "metric" {
            return Err(SkycastError::config(format!(
                "Unsupported units '{}'. Only 'metric' is supported",
                self.upstream.units
            ))
            .into());
        }

        if self.client.high_low_window == 0 {
            return Err(SkycastError::config("High/low window must be at least 1").into());
        }

        Ok(())
    }
}
