//! Configuration Loader
//!
//! Loads and validates client settings from a TOML file, with the API key
//! falling back to the environment.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::adapters::birdeye::{ClientConfig, BIRDEYE_API_URL, DEFAULT_CHAIN};

/// Environment variables checked for the API key, in order
pub const API_KEY_ENV_VARS: &[&str] = &["BIRDEYE_API_KEY", "BIRDEYE_KEY"];

/// Main configuration structure matching the TOML layout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub birdeye: BirdeyeSection,
}

/// Birdeye API configuration section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BirdeyeSection {
    /// API key (prefer the environment or `.env` for this)
    #[serde(default)]
    pub api_key: Option<String>,
    /// API host override
    #[serde(default)]
    pub base_url: Option<String>,
    /// Chain used when a call does not select one
    #[serde(default)]
    pub default_chain: Option<String>,
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl BirdeyeSection {
    /// Get API key with environment variable fallback
    /// Checks BIRDEYE_API_KEY then BIRDEYE_KEY if config value is empty/None
    pub fn get_api_key(&self) -> Option<String> {
        self.resolve_api_key(|name| std::env::var(name).ok())
    }

    fn resolve_api_key<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        // First check config value
        if let Some(ref key) = self.api_key {
            if !key.trim().is_empty() {
                return Some(key.trim().to_string());
            }
        }
        // Fall back to environment variables
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(BIRDEYE_API_URL)
    }

    pub fn default_chain(&self) -> &str {
        self.default_chain.as_deref().unwrap_or(DEFAULT_CHAIN)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Build configuration from the environment alone
pub fn config_from_env() -> Result<Config, ConfigError> {
    let config = Config::default();
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_with(|name| std::env::var(name).ok())
    }

    fn validate_with<F>(&self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.birdeye.resolve_api_key(lookup).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "no API key: set birdeye.api_key or one of {}",
                API_KEY_ENV_VARS.join(", ")
            )));
        }

        if self.birdeye.timeout_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be > 0".to_string(),
            ));
        }

        let base_url = self.birdeye.base_url();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "base_url must be an http(s) URL, got '{}'",
                base_url
            )));
        }

        if self.birdeye.default_chain().trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "default_chain must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Convert into the client configuration
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        let api_key = self.birdeye.get_api_key().ok_or_else(|| {
            ConfigError::ValidationError("no API key configured".to_string())
        })?;

        let mut config = ClientConfig::new(api_key)
            .with_base_url(self.birdeye.base_url())
            .with_default_chain(self.birdeye.default_chain());
        if let Some(secs) = self.birdeye.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_valid_config() -> String {
        r#"
[birdeye]
api_key = "file-key"
base_url = "https://public-api.birdeye.so/"
default_chain = "ethereum"
timeout_secs = 15
"#
        .to_string()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_load_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(create_valid_config().as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();

        assert_eq!(config.birdeye.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.birdeye.default_chain(), "ethereum");
        assert_eq!(config.birdeye.timeout_secs, Some(15));
    }

    #[test]
    fn test_client_config_from_file() {
        let config: Config = toml::from_str(&create_valid_config()).unwrap();
        let client = config.client_config().unwrap();

        assert_eq!(client.api_key(), "file-key");
        assert_eq!(client.base_url(), "https://public-api.birdeye.so");
        assert_eq!(client.default_chain(), "ethereum");
        assert_eq!(client.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config("/nonexistent/path/config.toml");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::IoError(_)));
    }

    #[test]
    fn test_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[birdeye\napi_key = ").unwrap();

        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_missing_api_key() {
        let config: Config = toml::from_str("[birdeye]\ndefault_chain = \"solana\"\n").unwrap();
        let result = config.validate_with(no_env);
        assert!(matches!(result, Err(ConfigError::ValidationError(msg)) if msg.contains("BIRDEYE_API_KEY")));
    }

    #[test]
    fn test_blank_api_key_falls_back_to_env() {
        let config: Config = toml::from_str("[birdeye]\napi_key = \"  \"\n").unwrap();

        let key = config.birdeye.resolve_api_key(|name| match name {
            "BIRDEYE_KEY" => Some("legacy-key".to_string()),
            _ => None,
        });
        assert_eq!(key.as_deref(), Some("legacy-key"));

        let key = config.birdeye.resolve_api_key(|name| match name {
            "BIRDEYE_API_KEY" => Some("primary".to_string()),
            "BIRDEYE_KEY" => Some("legacy-key".to_string()),
            _ => None,
        });
        assert_eq!(key.as_deref(), Some("primary"));
    }

    #[test]
    fn test_invalid_timeout() {
        let config: Config = toml::from_str("[birdeye]\napi_key = \"k\"\ntimeout_secs = 0\n").unwrap();
        let result = config.validate_with(no_env);
        assert!(matches!(result, Err(ConfigError::ValidationError(msg)) if msg.contains("timeout_secs")));
    }

    #[test]
    fn test_invalid_base_url() {
        let config: Config =
            toml::from_str("[birdeye]\napi_key = \"k\"\nbase_url = \"ftp://birdeye.so\"\n").unwrap();
        let result = config.validate_with(no_env);
        assert!(matches!(result, Err(ConfigError::ValidationError(msg)) if msg.contains("base_url")));
    }

    #[test]
    fn test_empty_default_chain() {
        let config: Config = toml::from_str("[birdeye]\napi_key = \"k\"\ndefault_chain = \"\"\n").unwrap();
        let result = config.validate_with(no_env);
        assert!(matches!(result, Err(ConfigError::ValidationError(msg)) if msg.contains("default_chain")));
    }

    #[test]
    fn test_birdeye_section_optional() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.birdeye.base_url(), BIRDEYE_API_URL);
        assert_eq!(config.birdeye.default_chain(), DEFAULT_CHAIN);
        assert!(config.validate_with(|_| Some("env-key".to_string())).is_ok());
    }
}
