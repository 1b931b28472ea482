//! Runtime configuration read from the environment (and an optional `.env` file).

use crate::error::{AppError, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

const DEFAULT_DATABASE_URL: &str = "sqlite://bookmarks.db?mode=rwc";
const DEFAULT_EXPORT_DIR: &str = "export";
const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Settings for the bookmark manager.
#[derive(Debug, Clone)]
pub struct Config {
    /// `sqlx` connection string of the SQLite store.
    pub database_url: String,
    /// Directory exports are written into.
    pub export_dir: PathBuf,
    /// Directory holding the log file.
    pub log_dir: PathBuf,
    /// Timeout for page title lookups.
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Loads `.env` if present, then overlays `BOOKMARKS_*` variables on the defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `BOOKMARKS_HTTP_TIMEOUT_SECS` is not a whole number.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = Config::default();

        if let Ok(url) = env::var("BOOKMARKS_DATABASE_URL") {
            config.database_url = url;
        }
        if let Ok(dir) = env::var("BOOKMARKS_EXPORT_DIR") {
            config.export_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("BOOKMARKS_LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }
        if let Ok(secs) = env::var("BOOKMARKS_HTTP_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                AppError::Config(format!(
                    "BOOKMARKS_HTTP_TIMEOUT_SECS must be a number of seconds, got '{}'",
                    secs
                ))
            })?;
            config.http_timeout = Duration::from_secs(secs);
        }

        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }
}
