//! Store configuration loaded from environment variables.
//!
//! All settings have defaults so the cache works with zero configuration for
//! local development.

use std::path::PathBuf;
use std::time::Duration;

use herald_shared::constants::DEFAULT_CACHE_FILE;

/// Message cache configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// SQLite file holding the message cache.
    /// Env: `HERALD_CACHE_FILE`
    /// Default: `./herald-cache.db`
    pub cache_file: PathBuf,

    /// How long a call waits on a locked database before failing.
    /// Env: `HERALD_CACHE_BUSY_TIMEOUT_MS`
    /// Default: 5 seconds
    pub busy_timeout: Duration,

    /// Use write-ahead logging.
    /// Env: `HERALD_CACHE_WAL` (true/false)
    /// Default: `true`
    pub wal: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cache_file: PathBuf::from(DEFAULT_CACHE_FILE),
            busy_timeout: Duration::from_secs(5),
            wal: true,
        }
    }
}

impl StoreConfig {
    /// Default settings for a cache stored at `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            cache_file: path.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("HERALD_CACHE_FILE") {
            if !path.is_empty() {
                config.cache_file = PathBuf::from(path);
            }
        }

        if let Some(val) = lookup("HERALD_CACHE_BUSY_TIMEOUT_MS") {
            match val.parse::<u64>() {
                Ok(ms) => config.busy_timeout = Duration::from_millis(ms),
                Err(e) => {
                    tracing::warn!(
                        value = %val,
                        error = %e,
                        "Invalid HERALD_CACHE_BUSY_TIMEOUT_MS, using default"
                    );
                }
            }
        }

        if let Some(val) = lookup("HERALD_CACHE_WAL") {
            config.wal = val != "false" && val != "0";
        }

        config
    }
}
