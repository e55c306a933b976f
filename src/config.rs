//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::page::ClientConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Settings handed to the browser app
    #[serde(default)]
    pub backend: ClientConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Host server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the built UI bundle
    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from("table-chart-ui/dist")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            dist_dir: default_dist_dir(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Socket address string for binding
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("table-chart").join("config.toml")),
            Some(PathBuf::from("/etc/table-chart/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Backend overrides
        if let Some(url) = var("TABLE_CHART_CORE_API_URL") {
            self.backend.core_api_url = Some(url).filter(|u| !u.is_empty());
        }
        if let Some(language) = var("TABLE_CHART_SESSION_LANGUAGE") {
            self.backend.session_language = language;
        }

        // Server overrides
        if let Some(host) = var("TABLE_CHART_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("TABLE_CHART_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Some(dist_dir) = var("TABLE_CHART_DIST_DIR") {
            self.server.dist_dir = PathBuf::from(dist_dir);
        }

        // Logging overrides
        if let Some(level) = var("TABLE_CHART_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("TABLE_CHART_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Table Chart Configuration
#
# Environment variables override these settings:
# - TABLE_CHART_CORE_API_URL
# - TABLE_CHART_SESSION_LANGUAGE
# - TABLE_CHART_HOST
# - TABLE_CHART_PORT
# - TABLE_CHART_DIST_DIR
# - TABLE_CHART_LOG_LEVEL
# - TABLE_CHART_LOG_FORMAT

[backend]
# Analytics server base URL. Only scheme, host and port are used.
# Leave unset to connect to the origin the page was served from.
# core_api_url = "http://localhost:10000/jsapi"

# Language of the server session
session_language = "python"

[server]
# Host server bind address
host = "127.0.0.1"

# Host server port
port = 3000

# Built UI bundle to serve
dist_dir = "table-chart-ui/dist"

# Allowed CORS origins (empty: same origin only)
cors_origins = []

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
