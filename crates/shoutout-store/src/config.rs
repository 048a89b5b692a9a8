use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::adapter::DEFAULT_STORAGE_KEY;

/// How often a session sweeps expired shoutouts.
pub const DEFAULT_PURGE_INTERVAL: Duration = Duration::from_secs(60);

const DEFAULT_STORAGE_DIR: &str = "./shoutout-data";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 20;

/// Runtime settings, read from `SHOUTOUT_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub storage_dir: PathBuf,
    pub storage_key: String,
    pub purge_interval: Duration,
    pub stylize_url: Option<String>,
    pub ocr_url: Option<String>,
    pub http_timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            purge_interval: DEFAULT_PURGE_INTERVAL,
            stylize_url: None,
            ocr_url: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl FeedConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        info!(
            "Feed storage at {} (key '{}'), purging every {:?}",
            config.storage_dir.display(),
            config.storage_key,
            config.purge_interval
        );
        Ok(config)
    }

    /// Build a config from an arbitrary variable source. Unset or empty
    /// variables fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let purge_ms: u64 = match var("SHOUTOUT_PURGE_INTERVAL_MS") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("SHOUTOUT_PURGE_INTERVAL_MS is not a number: {}", v))?,
            None => defaults.purge_interval.as_millis() as u64,
        };
        if purge_ms == 0 {
            bail!("SHOUTOUT_PURGE_INTERVAL_MS must be greater than zero");
        }

        let timeout_secs: u64 = match var("SHOUTOUT_HTTP_TIMEOUT_SECS") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("SHOUTOUT_HTTP_TIMEOUT_SECS is not a number: {}", v))?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            storage_dir: var("SHOUTOUT_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            storage_key: var("SHOUTOUT_STORAGE_KEY").unwrap_or(defaults.storage_key),
            purge_interval: Duration::from_millis(purge_ms),
            stylize_url: var("SHOUTOUT_STYLIZE_URL"),
            ocr_url: var("SHOUTOUT_OCR_URL"),
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
