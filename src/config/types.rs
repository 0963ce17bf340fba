//! Raw configuration types for TOML parsing

use super::*;
use serde::Deserialize;

/// Raw configuration as parsed from TOML
#[derive(Debug, Default, Deserialize)]
pub struct RawConfig {
    pub server: Option<RawServerConfig>,
    pub storage: Option<RawStorageConfig>,
    pub auth: Option<RawAuthConfig>,
    pub logging: Option<RawLoggingConfig>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawServerConfig {
    pub bind: Option<String>,
}

impl From<RawServerConfig> for ServerConfig {
    fn from(raw: RawServerConfig) -> Self {
        Self {
            bind: raw.bind.unwrap_or_else(|| "127.0.0.1:7878".to_string()),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawStorageConfig {
    pub path: Option<String>,
}

impl From<RawStorageConfig> for StorageConfig {
    fn from(raw: RawStorageConfig) -> Self {
        let path = raw
            .path
            .map(|p| {
                // Expand ~ to home directory
                if let Some(rest) = p.strip_prefix("~/") {
                    dirs::home_dir()
                        .unwrap_or_else(|| PathBuf::from("."))
                        .join(rest)
                } else {
                    PathBuf::from(p)
                }
            })
            .unwrap_or_else(Config::default_storage_path);

        Self { path }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawAuthConfig {
    pub domain: Option<String>,
    pub audience: Option<String>,
    pub algorithms: Option<Vec<String>>,
}

impl TryFrom<RawAuthConfig> for AuthConfig {
    type Error = ConfigError;

    fn try_from(raw: RawAuthConfig) -> Result<Self, Self::Error> {
        let algorithms = match raw.algorithms {
            Some(names) => parse_algorithms(&names)?,
            None => vec![jsonwebtoken::Algorithm::RS256],
        };

        Ok(Self {
            domain: raw.domain.unwrap_or_default(),
            audience: raw.audience.unwrap_or_default(),
            algorithms,
        })
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawLoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
}

impl From<RawLoggingConfig> for LoggingConfig {
    fn from(raw: RawLoggingConfig) -> Self {
        Self {
            level: raw.level.unwrap_or_else(|| "info".to_string()),
            format: match raw.format.as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        }
    }
}
