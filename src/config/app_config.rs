use std::time::Duration;

use serde::Deserialize;

use crate::domain::meta::{IdentifierFormat, DEFAULT_ID_PREFIX};
use crate::infrastructure::cache::{CacheSettings, DEFAULT_WAIT_TIMEOUT};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Schema API connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Auth token; requests are unauthenticated when absent
    #[serde(default)]
    pub token: Option<String>,
    /// `xc-auth` for session tokens, `xc-token` for API tokens
    #[serde(default = "default_token_header")]
    pub token_header: String,
    /// Project whose table list backs title lookups
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_token_header() -> String {
    "xc-auth".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_id_prefix() -> String {
    DEFAULT_ID_PREFIX.to_string()
}

fn default_wait_timeout_ms() -> u64 {
    DEFAULT_WAIT_TIMEOUT.as_millis() as u64
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            token_header: default_token_header(),
            project_id: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            id_prefix: default_id_prefix(),
            wait_timeout_ms: default_wait_timeout_ms(),
        }
    }
}

impl From<&CacheConfig> for CacheSettings {
    fn from(config: &CacheConfig) -> Self {
        CacheSettings::default()
            .with_id_format(IdentifierFormat::with_prefix(config.id_prefix.clone()))
            .with_wait_timeout(Duration::from_millis(config.wait_timeout_ms))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("META_CACHE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.token_header, "xc-auth");
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.cache.id_prefix, "md_");
        assert_eq!(config.cache.wait_timeout_ms, 10_000);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_cache_settings_from_config() {
        let config = CacheConfig {
            id_prefix: "tbl_".to_string(),
            wait_timeout_ms: 250,
        };

        let settings = CacheSettings::from(&config);
        assert!(settings.id_format.is_canonical("tbl_1"));
        assert!(!settings.id_format.is_canonical("md_1"));
        assert_eq!(settings.wait_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                r#"{ "api": { "base_url": "https://db.example.com", "project_id": "p_1" }, "logging": { "format": "json" } }"#,
                config::FileFormat::Json,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.api.base_url, "https://db.example.com");
        assert_eq!(config.api.project_id.as_deref(), Some("p_1"));
        assert_eq!(config.api.token_header, "xc-auth");
        assert_eq!(config.cache.wait_timeout_ms, 10_000);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }
}
