//! Configuration management for the `RouteWise` service
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::RouteWiseError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "ROUTEWISE_CONFIG";

/// Root configuration structure for the `RouteWise` service
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RouteWiseConfig {
    /// Trip backend configuration
    pub backend: BackendConfig,
    /// Remote itinerary generator configuration
    pub generator: GeneratorConfig,
    /// Recommendation settings
    pub recommender: RecommenderConfig,
    /// Cache configuration
    pub cache: CacheConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// HTTP server configuration
    pub server: ServerConfig,
}

/// REST backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the REST backend
    pub base_url: String,
    /// API key sent with every request (optional)
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
}

/// Remote itinerary generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Generation endpoint, the template generator is used when unset
    pub endpoint: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
}

/// Recommendation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Number of recommendations returned when the caller gives no limit
    pub max_results: usize,
    /// Radius for proximity-only fallback suggestions
    pub fallback_radius_km: f64,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether the destination catalog is cached on disk
    pub enabled: bool,
    /// Cache TTL in hours
    pub ttl_hours: u32,
    /// Cache directory location, defaults to the platform cache dir
    pub location: Option<String>,
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

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

// Default value functions
fn default_backend_base_url() -> String {
    "http://localhost:54321/rest/v1".to_string()
}

fn default_backend_timeout() -> u32 {
    30
}

fn default_generator_timeout() -> u32 {
    60
}

fn default_max_results() -> usize {
    5
}

fn default_fallback_radius() -> f64 {
    200.0
}

fn default_cache_ttl() -> u32 {
    6
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_base_url(),
            api_key: None,
            timeout_seconds: default_backend_timeout(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_seconds: default_generator_timeout(),
        }
    }
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            fallback_radius_km: default_fallback_radius(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_hours: default_cache_ttl(),
            location: None,
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

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl CacheConfig {
    /// Resolved cache directory
    #[must_use]
    pub fn directory(&self) -> PathBuf {
        match &self.location {
            Some(location) => PathBuf::from(location),
            None => dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("routewise"),
        }
    }
}

impl RouteWiseConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        let explicit = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        Self::load_from_path(explicit)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides such as ROUTEWISE_BACKEND__BASE_URL
        builder = builder.add_source(
            Environment::with_prefix("ROUTEWISE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: RouteWiseConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("routewise").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.backend.base_url.is_empty() {
            self.backend.base_url = default_backend_base_url();
        }
        if self.backend.timeout_seconds == 0 {
            self.backend.timeout_seconds = default_backend_timeout();
        }
        if self.generator.timeout_seconds == 0 {
            self.generator.timeout_seconds = default_generator_timeout();
        }
        if self
            .generator
            .endpoint
            .as_deref()
            .is_some_and(|e| e.trim().is_empty())
        {
            self.generator.endpoint = None;
        }
        if self.recommender.max_results == 0 {
            self.recommender.max_results = default_max_results();
        }
        if self.recommender.fallback_radius_km <= 0.0 {
            self.recommender.fallback_radius_km = default_fallback_radius();
        }
        if self.cache.ttl_hours == 0 {
            self.cache.ttl_hours = default_cache_ttl();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        if let Some(api_key) = &self.backend.api_key {
            if api_key.is_empty() {
                return Err(RouteWiseError::config(
                    "Backend API key cannot be empty if provided. Either remove it or provide a valid key."
                ).into());
            }

            if api_key.len() > 4096 {
                return Err(RouteWiseError::config(
                    "Backend API key appears to be invalid (too long). Please check your API key."
                ).into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.backend.timeout_seconds > 300 {
            return Err(RouteWiseError::config("Backend timeout cannot exceed 300 seconds").into());
        }

        if self.generator.timeout_seconds > 600 {
            return Err(
                RouteWiseError::config("Generator timeout cannot exceed 600 seconds").into(),
            );
        }

        if self.recommender.max_results > 50 {
            return Err(RouteWiseError::config("Maximum results cannot exceed 50").into());
        }

        if self.recommender.fallback_radius_km > 1000.0 {
            return Err(RouteWiseError::config("Fallback radius cannot exceed 1000 km").into());
        }

        if self.cache.ttl_hours > 168 {
            return Err(
                RouteWiseError::config("Cache TTL cannot exceed 168 hours (1 week)").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(RouteWiseError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(RouteWiseError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !is_http_url(&self.backend.base_url) {
            return Err(RouteWiseError::config(
                "Backend base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        if let Some(endpoint) = &self.generator.endpoint {
            if !is_http_url(endpoint) {
                return Err(RouteWiseError::config(
                    "Generator endpoint must be a valid HTTP or HTTPS URL",
                )
                .into());
            }
        }

        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = RouteWiseConfig::default();
        assert_eq!(config.backend.base_url, "http://localhost:54321/rest/v1");
        assert_eq!(config.backend.timeout_seconds, 30);
        assert_eq!(config.recommender.max_results, 5);
        assert_eq!(config.recommender.fallback_radius_km, 200.0);
        assert_eq!(config.cache.ttl_hours, 6);
        assert_eq!(config.logging.level, "info");
        assert!(config.generator.endpoint.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_api_key() {
        let mut config = RouteWiseConfig::default();
        config.backend.api_key = Some(String::new());
        assert!(config.validate_api_keys().is_err());

        config.backend.api_key = Some("anon-key".to_string());
        assert!(config.validate_api_keys().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = RouteWiseConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = RouteWiseConfig::default();
        config.backend.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_generator_endpoint() {
        let mut config = RouteWiseConfig::default();
        config.generator.endpoint = Some("ftp://generator".to_string());
        assert!(config.validate().is_err());

        config.generator.endpoint = Some("https://ai.example.com/itinerary".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_defaults_clears_blank_endpoint() {
        let mut config = RouteWiseConfig::default();
        config.generator.endpoint = Some("  ".to_string());
        config.recommender.max_results = 0;
        config.apply_defaults();
        assert!(config.generator.endpoint.is_none());
        assert_eq!(config.recommender.max_results, 5);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[backend]
base_url = "https://trips.example.com/rest/v1"

[recommender]
max_results = 8

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = RouteWiseConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.backend.base_url, "https://trips.example.com/rest/v1");
        assert_eq!(config.recommender.max_results, 8);
        assert_eq!(config.recommender.fallback_radius_km, 200.0);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_path_generation() {
        let path = RouteWiseConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("routewise"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_cache_directory_override() {
        let config = CacheConfig {
            location: Some("/tmp/routewise-test".to_string()),
            ..CacheConfig::default()
        };
        assert_eq!(config.directory(), PathBuf::from("/tmp/routewise-test"));
    }
}
