use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

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

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote weather service settings
    #[serde(default)]
    pub service: ServiceConfig,

    /// Dashboard behavior
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the weather API (`/weather`, `/recent`, `/save`, `/history`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout. Unset means requests may wait indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Heading shown above the current conditions
    #[serde(default = "default_heading")]
    pub heading: String,

    /// Auto-refresh interval in seconds (default: 60)
    #[serde(default = "default_refresh_seconds")]
    pub refresh_seconds: u64,

    /// Whether auto-refresh is enabled when the dashboard mounts (default: true)
    #[serde(default = "default_start_running")]
    pub start_running: bool,
}

fn default_heading() -> String {
    "New York Weather".to_string()
}

fn default_refresh_seconds() -> u64 {
    60
}

fn default_start_running() -> bool {
    true
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            heading: default_heading(),
            refresh_seconds: default_refresh_seconds(),
            start_running: default_start_running(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, writing defaults there if the file is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Wrote default config to {}", path.display());
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Validate and log warnings; fails on errors.
    pub fn check(&self) -> Result<ValidationResult> {
        let validation = self.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(validation)
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.service.base_url, "service.base_url", &mut result);

        if self.service.request_timeout_secs == Some(0) {
            result.add_error(
                "service.request_timeout_secs",
                "Timeout must be greater than 0 (omit it to disable timeouts)",
            );
        }

        if self.dashboard.refresh_seconds == 0 {
            result.add_error(
                "dashboard.refresh_seconds",
                "Refresh interval must be greater than 0",
            );
        } else if self.dashboard.refresh_seconds < 5 {
            result.add_warning(
                "dashboard.refresh_seconds",
                "Refresh interval under 5 seconds may overload the weather service",
            );
        } else if self.dashboard.refresh_seconds > 86_400 {
            result.add_warning(
                "dashboard.refresh_seconds",
                "Refresh interval is more than 24 hours",
            );
        }

        if self.dashboard.heading.trim().is_empty() {
            result.add_warning("dashboard.heading", "Heading is empty");
        }

        result
    }

    /// Validate a URL field
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

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("weatherdash");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_defaults_match_dashboard_behavior() {
        let config = Config::default();
        assert_eq!(config.service.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.service.request_timeout_secs, None);
        assert_eq!(config.dashboard.refresh_seconds, 60);
        assert!(config.dashboard.start_running);
        assert_eq!(config.dashboard.heading, "New York Weather");
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.service.base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "service.base_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.service.base_url = "ftp://localhost:5000".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_refresh_interval_is_error() {
        let mut config = Config::default();
        config.dashboard.refresh_seconds = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "dashboard.refresh_seconds"));
        assert!(config.check().is_err());
    }

    #[test]
    fn test_short_refresh_interval_is_warning() {
        let mut config = Config::default();
        config.dashboard.refresh_seconds = 1;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "dashboard.refresh_seconds"));
    }

    #[test]
    fn test_zero_timeout_is_error() {
        let mut config = Config::default();
        config.service.request_timeout_secs = Some(0);
        assert!(!config.validate().is_valid());
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }

    #[test]
    fn test_load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.dashboard.refresh_seconds, 60);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[service]\nbase_url = \"http://weather.local:8080\"\n\n[dashboard]\nrefresh_seconds = 30\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.service.base_url, "http://weather.local:8080");
        assert_eq!(config.dashboard.refresh_seconds, 30);
        assert!(config.dashboard.start_running);
        assert_eq!(config.dashboard.heading, "New York Weather");
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[dashboard\nrefresh_seconds = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn test_save_then_load_preserves_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.dashboard.start_running = false;
        config.service.request_timeout_secs = Some(15);

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert!(!loaded.dashboard.start_running);
        assert_eq!(loaded.service.request_timeout_secs, Some(15));
    }
}
