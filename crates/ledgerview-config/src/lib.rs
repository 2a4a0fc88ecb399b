//! Configuration management for ledgerview
//!
//! This module handles loading, validation, and management of
//! ledgerview configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigErrorCode, ConfigErrorSeverity, ConfigResult};

/// Environment variable that overrides `router.base`
pub const BASE_URL_ENV: &str = "BASE_URL";

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// What to do with a path no route matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotFoundPolicy {
    /// Surface a route-not-found error to the caller
    #[default]
    Error,
    /// Resolve the `home` route instead
    Home,
}

impl std::fmt::Display for NotFoundPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotFoundPolicy::Error => write!(f, "error"),
            NotFoundPolicy::Home => write!(f, "home"),
        }
    }
}

/// History-mode router configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Base path every route is rooted at
    #[serde(default = "default_base")]
    pub base: String,
    /// Policy for unmatched paths
    #[serde(default)]
    pub not_found: NotFoundPolicy,
    /// Directory holding deferred view templates (built-in templates when unset)
    #[serde(default)]
    pub views_dir: Option<PathBuf>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            base: default_base(),
            not_found: NotFoundPolicy::default(),
            views_dir: None,
        }
    }
}

fn default_base() -> String {
    "/".to_string()
}

/// Utility-CSS content and font settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleSettings {
    /// Globs of files scanned for class-name usage
    #[serde(default = "default_content")]
    pub content: Vec<String>,
    /// Font prepended to the default sans-serif stack
    #[serde(default = "default_font")]
    pub font: String,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            content: default_content(),
            font: default_font(),
        }
    }
}

fn default_content() -> Vec<String> {
    vec![
        "./index.html".to_string(),
        "./src/**/*.{html,js,vue}".to_string(),
    ]
}

fn default_font() -> String {
    "Inter var".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Router settings
    #[serde(default)]
    pub router: RouterConfig,
    /// Style settings
    #[serde(default)]
    pub style: StyleSettings,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load a file, falling back to defaults on warning-level errors
    pub fn load_or_default(path: impl AsRef<Path>) -> ConfigResult<Self> {
        match Self::load(path.as_ref()) {
            Err(e) if e.severity() == ConfigErrorSeverity::Warning => {
                log::warn!("[{}] {}, using defaults", e.code(), e);
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Parse and validate YAML content
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
            message: e.to_string(),
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if !self.router.base.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "router.base".to_string(),
                reason: "Base path must start with '/'".to_string(),
            });
        }

        if self.style.content.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "style.content".to_string(),
                reason: "At least one content glob is required".to_string(),
            });
        }

        if self.style.font.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "style.font".to_string(),
                reason: "Font name must not be blank".to_string(),
            });
        }

        Ok(())
    }

    /// Apply overrides supplied by the process environment
    pub fn apply_env(&mut self) -> ConfigResult<()> {
        self.apply_base_override(std::env::var(BASE_URL_ENV).ok())
    }

    fn apply_base_override(&mut self, base: Option<String>) -> ConfigResult<()> {
        if let Some(base) = base.filter(|b| !b.trim().is_empty()) {
            log::debug!("Router base overridden by {}: {}", BASE_URL_ENV, base);
            self.router.base = base;
            self.validate()?;
        }
        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.router.base, "/");
        assert_eq!(config.router.not_found, NotFoundPolicy::Error);
        assert!(config.router.views_dir.is_none());
        assert_eq!(config.style.font, "Inter var");
        assert_eq!(config.style.content.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generated_default_parses() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.style.content[0], "./index.html");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = Config::from_yaml("router:\n  base: /app/\n  not_found: home\n").unwrap();
        assert_eq!(config.router.base, "/app/");
        assert_eq!(config.router.not_found, NotFoundPolicy::Home);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("server: [").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYaml { .. }));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let err = Config::from_yaml("server:\n  port: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "server.port"));

        let err = Config::from_yaml("router:\n  base: app\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "router.base"));

        let err = Config::from_yaml("style:\n  content: []\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "style.content"));

        let err = Config::from_yaml("style:\n  font: '  '\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "style.font"));
    }

    #[test]
    fn test_base_override() {
        let mut config = Config::default();
        config.apply_base_override(Some("/ui/".to_string())).unwrap();
        assert_eq!(config.router.base, "/ui/");

        config.apply_base_override(Some("".to_string())).unwrap();
        assert_eq!(config.router.base, "/ui/");

        assert!(config.apply_base_override(Some("ui".to_string())).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server:\n  port: 9001\nlogging:\n  level: debug").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));

        let config = Config::load_or_default("/definitely/not/here.yaml").unwrap();
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_load_or_default_propagates_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server:\n  port: 0").unwrap();

        let err = Config::load_or_default(file.path()).unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::InvalidValue);
        assert_eq!(err.severity(), ConfigErrorSeverity::Error);
    }
}
