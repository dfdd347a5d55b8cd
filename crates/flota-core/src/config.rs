//! Application configuration management.
//!
//! Configuration holds the backend project URL, its static API key and the
//! tuning knobs of the data access layer. It is read from
//! `~/.config/flota/config.json` when present and then overridden from the
//! environment (`FLOTA_SUPABASE_URL`, `FLOTA_API_KEY`, `FLOTA_CACHE_TTL_SECS`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_TTL_SECS;

/// Application name used for the config directory path
const APP_NAME: &str = "flota";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// HTTP request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Largest page size any list request may ask for.
const DEFAULT_MAX_PAGE_LIMIT: u32 = 1000;

pub const ENV_SUPABASE_URL: &str = "FLOTA_SUPABASE_URL";
pub const ENV_API_KEY: &str = "FLOTA_API_KEY";
pub const ENV_CACHE_TTL_SECS: &str = "FLOTA_CACHE_TTL_SECS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub supabase_url: String,
    pub api_key: String,
    pub cache_ttl_secs: u64,
    pub request_timeout_secs: u64,
    pub max_page_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            api_key: String::new(),
            cache_ttl_secs: DEFAULT_TTL_SECS as u64,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_page_limit: DEFAULT_MAX_PAGE_LIMIT,
        }
    }
}

impl Config {
    /// Load from the default location and the process environment, then
    /// validate.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Apply overrides from a variable lookup (the environment in production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup(ENV_SUPABASE_URL) {
            self.supabase_url = url;
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = key;
        }
        if let Some(ttl) = lookup(ENV_CACHE_TTL_SECS) {
            self.cache_ttl_secs = ttl
                .trim()
                .parse()
                .with_context(|| format!("{} must be a number of seconds, got '{}'", ENV_CACHE_TTL_SECS, ttl))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.supabase_url.trim();
        if url.is_empty() {
            bail!("Backend URL is not configured (set {} or supabase_url)", ENV_SUPABASE_URL);
        }
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            bail!("Backend URL must start with http:// or https://, got '{}'", url);
        }
        if self.api_key.trim().is_empty() {
            bail!("API key is not configured (set {} or api_key)", ENV_API_KEY);
        }
        if self.cache_ttl_secs == 0 {
            bail!("cache_ttl_secs must be greater than zero");
        }
        if ttl_from_secs(self.cache_ttl_secs).is_none() {
            bail!("cache_ttl_secs is too large: {}", self.cache_ttl_secs);
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }
        if self.max_page_limit == 0 {
            bail!("max_page_limit must be greater than zero");
        }
        Ok(())
    }

    /// Cache TTL. Out-of-range values only reach here unvalidated and fall
    /// back to the default.
    pub fn cache_ttl(&self) -> chrono::Duration {
        ttl_from_secs(self.cache_ttl_secs).unwrap_or_else(|| chrono::Duration::seconds(DEFAULT_TTL_SECS))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// `None` when the value does not fit a chrono duration.
fn ttl_from_secs(secs: u64) -> Option<chrono::Duration> {
    i64::try_from(secs).ok().and_then(chrono::Duration::try_seconds)
}
