use crate::error::{GridsketchError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for gridsketch
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub service_url: ConfigValue<String>,
    pub grid_area_sqkm: ConfigValue<f64>,
    pub buffer_km: ConfigValue<f64>,
    pub request_timeout_secs: ConfigValue<u64>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            service_url: ConfigValue::new(
                "http://localhost:5000".to_string(),
                ConfigSource::Default,
            ),
            grid_area_sqkm: ConfigValue::new(20.0, ConfigSource::Default),
            buffer_km: ConfigValue::new(0.0, ConfigSource::Default),
            request_timeout_secs: ConfigValue::new(30, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| GridsketchError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GridsketchError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        // Update values from file
        if let Some(service_url) = file_config.service_url {
            self.service_url.update(service_url, ConfigSource::File);
        }

        if let Some(grid_area_sqkm) = file_config.grid_area_sqkm {
            self.grid_area_sqkm.update(grid_area_sqkm, ConfigSource::File);
        }

        if let Some(buffer_km) = file_config.buffer_km {
            self.buffer_km.update(buffer_km, ConfigSource::File);
        }

        if let Some(request_timeout_secs) = file_config.request_timeout_secs {
            self.request_timeout_secs.update(request_timeout_secs, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // GRIDSKETCH_SERVICE_URL
        if let Ok(service_url) = env::var("GRIDSKETCH_SERVICE_URL") {
            self.service_url.update(service_url, ConfigSource::Environment);
        }

        // GRIDSKETCH_GRID_AREA_SQKM
        if let Ok(area_str) = env::var("GRIDSKETCH_GRID_AREA_SQKM") {
            match area_str.parse::<f64>() {
                Ok(area) => self.grid_area_sqkm.update(area, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GRIDSKETCH_GRID_AREA_SQKM value '{}': expected a number",
                    area_str
                ),
            }
        }

        // GRIDSKETCH_BUFFER_KM
        if let Ok(buffer_str) = env::var("GRIDSKETCH_BUFFER_KM") {
            match buffer_str.parse::<f64>() {
                Ok(buffer) => self.buffer_km.update(buffer, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GRIDSKETCH_BUFFER_KM value '{}': expected a number",
                    buffer_str
                ),
            }
        }

        // GRIDSKETCH_REQUEST_TIMEOUT_SECS
        if let Ok(timeout_str) = env::var("GRIDSKETCH_REQUEST_TIMEOUT_SECS") {
            match timeout_str.parse::<u64>() {
                Ok(timeout) => {
                    self.request_timeout_secs.update(timeout, ConfigSource::Environment)
                }
                Err(_) => tracing::warn!(
                    "Invalid GRIDSKETCH_REQUEST_TIMEOUT_SECS value '{}': expected an integer",
                    timeout_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(service_url) = overrides.service_url {
            self.service_url.update(service_url, ConfigSource::Cli);
        }

        if let Some(grid_area_sqkm) = overrides.grid_area_sqkm {
            self.grid_area_sqkm.update(grid_area_sqkm, ConfigSource::Cli);
        }

        if let Some(buffer_km) = overrides.buffer_km {
            self.buffer_km.update(buffer_km, ConfigSource::Cli);
        }

        if let Some(request_timeout_secs) = overrides.request_timeout_secs {
            self.request_timeout_secs.update(request_timeout_secs, ConfigSource::Cli);
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "service_url".to_string(),
            (self.service_url.value.clone(), self.service_url.source),
        );

        map.insert(
            "grid_area_sqkm".to_string(),
            (format!("{}", self.grid_area_sqkm.value), self.grid_area_sqkm.source),
        );

        map.insert(
            "buffer_km".to_string(),
            (format!("{}", self.buffer_km.value), self.buffer_km.source),
        );

        map.insert(
            "request_timeout_secs".to_string(),
            (format!("{}", self.request_timeout_secs.value), self.request_timeout_secs.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    service_url: Option<String>,
    grid_area_sqkm: Option<f64>,
    buffer_km: Option<f64>,
    request_timeout_secs: Option<u64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub service_url: Option<String>,
    pub grid_area_sqkm: Option<f64>,
    pub buffer_km: Option<f64>,
    pub request_timeout_secs: Option<u64>,
}
