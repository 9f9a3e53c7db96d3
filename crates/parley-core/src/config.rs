//! Configuration management for parley.
//!
//! Loads configuration from `${PARLEY_HOME}/config.toml` with sensible
//! defaults, then applies environment overrides. Missing files are not an
//! error; a malformed file is.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the chat server.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Loads config from disk and applies the `PARLEY_BASE_URL` override.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&config_path())?;
        if let Ok(base_url) = std::env::var("PARLEY_BASE_URL")
            && !base_url.trim().is_empty()
        {
            config.base_url = base_url;
        }
        Ok(config)
    }

    fn load_from(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config at {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parse config at {}", path.display()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Resolves the parley home directory.
///
/// `$PARLEY_HOME` wins; otherwise `$HOME/.parley`.
pub fn parley_home() -> PathBuf {
    if let Ok(home) = std::env::var("PARLEY_HOME")
        && !home.is_empty()
    {
        return PathBuf::from(home);
    }
    std::env::var("HOME")
        .map(|home| PathBuf::from(home).join(".parley"))
        .unwrap_or_else(|_| PathBuf::from(".parley"))
}

/// Path to the config file.
pub fn config_path() -> PathBuf {
    parley_home().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(r#"base_url = "http://example.test""#).unwrap();
        assert_eq!(config.base_url, "http://example.test");
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "base_url = \"http://10.0.0.1:8080/\"\nrequest_timeout_secs = 5\n")
            .unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.1:8080/");
        assert_eq!(config.request_timeout_secs, 5);
    }
}
