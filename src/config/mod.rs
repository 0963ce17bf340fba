//! Configuration system for Barkeep
//!
//! Loads configuration from TOML files, with environment variable
//! overrides for deployment settings.

mod types;

pub use types::*;

use jsonwebtoken::Algorithm;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main Barkeep configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Storage configuration
    pub storage: StorageConfig,
    /// Token verification configuration
    pub auth: AuthConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file, then apply environment overrides
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).await?;
        let mut config = Self::parse(&content)?;
        config.apply_env()?;
        Ok(config)
    }

    /// Parse configuration from a string (no environment overrides)
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Self::from_raw(raw)
    }

    /// Build configuration from defaults plus environment overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default_config();
        config.apply_env()?;
        Ok(config)
    }

    /// Convert from raw TOML config to validated config
    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let server = raw.server.unwrap_or_default().into();
        let storage = raw.storage.unwrap_or_default().into();
        let auth = raw.auth.unwrap_or_default().try_into()?;
        let logging = raw.logging.unwrap_or_default().into();

        Ok(Self {
            server,
            storage,
            auth,
            logging,
        })
    }

    /// Apply environment variable overrides
    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(bind) = std::env::var("BARKEEP_BIND") {
            self.server.bind = bind;
        }
        if let Ok(path) = std::env::var("BARKEEP_MENU_PATH") {
            self.storage.path = PathBuf::from(path);
        }
        if let Ok(domain) = std::env::var("AUTH_DOMAIN") {
            self.auth.domain = domain;
        }
        if let Ok(audience) = std::env::var("AUTH_AUDIENCE") {
            self.auth.audience = audience;
        }
        if let Ok(algorithms) = std::env::var("AUTH_ALGORITHMS") {
            let names: Vec<String> = algorithms
                .split(',')
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect();
            self.auth.algorithms = parse_algorithms(&names)?;
        }
        Ok(())
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("barkeep")
            .join("config.toml")
    }

    /// Get the default storage path
    pub fn default_storage_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("barkeep")
            .join("menu.json")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:7878".to_string(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Path to the menu file
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: Config::default_storage_path(),
        }
    }
}

/// Token verification configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Issuer domain; tokens are issued by `https://<domain>/`
    pub domain: String,
    /// Expected audience claim
    pub audience: String,
    /// Allowed signing algorithms
    pub algorithms: Vec<Algorithm>,
}

impl AuthConfig {
    /// The expected issuer claim
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain)
    }

    /// The issuer's key distribution endpoint
    pub fn jwks_url(&self) -> String {
        format!("https://{}/.well-known/jwks.json", self.domain)
    }

    /// Check the fields a running server requires
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domain.is_empty() {
            return Err(ConfigError::Invalid(
                "auth.domain is required (or set AUTH_DOMAIN)".to_string(),
            ));
        }
        if self.audience.is_empty() {
            return Err(ConfigError::Invalid(
                "auth.audience is required (or set AUTH_AUDIENCE)".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            audience: String::new(),
            algorithms: vec![Algorithm::RS256],
        }
    }
}

/// Parse algorithm names into the allow-list
pub(crate) fn parse_algorithms(names: &[String]) -> Result<Vec<Algorithm>, ConfigError> {
    names
        .iter()
        .map(|name| {
            name.parse::<Algorithm>()
                .map_err(|_| ConfigError::Invalid(format!("Unknown signing algorithm: {}", name)))
        })
        .collect()
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Format: "json" or "pretty"
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format
    Pretty,
    /// JSON format
    Json,
}
