//! Application configuration management.
//!
//! This module consolidates the backend origin and client tuning knobs
//! into one struct instead of per-screen hardcoded URLs.
//!
//! Configuration is stored at `~/.config/gymcache/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "gymcache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default backend origin. The real deployment sets this per environment;
/// there is exactly one origin for all resources.
const DEFAULT_BASE_URL: &str = "http://localhost:8082";

/// HTTP request timeout in seconds.
/// 30s allows for slow media-heavy responses while failing fast enough
/// for a manual retry to make sense.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default bound on the number of cached resources kept at once.
const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Cached payloads are trusted for 5 minutes.
const DEFAULT_CACHE_TTL_MS: i64 = 300_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: i64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_cache_ttl_ms() -> i64 {
    DEFAULT_CACHE_TTL_MS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            cache_capacity: default_cache_capacity(),
            cache_ttl_ms: default_cache_ttl_ms(),
        }
    }
}

impl ApiConfig {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for cached resources and materialized temp media.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:8082");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.cache_capacity, 64);
        assert_eq!(config.cache_ttl_ms, 300_000);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ApiConfig =
            serde_json::from_str(r#"{"base_url": "http://10.0.0.2:8082"}"#).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.2:8082");
        assert_eq!(config.cache_ttl_ms, 300_000);
    }
}
