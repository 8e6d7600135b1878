//! # Settings
//!
//! File-backed configuration for a collection run. Every field has a default,
//! so a settings file only needs the values it changes:
//!
//! ```toml
//! [rate_limit]
//! requests_per_second = 2.0
//! requests_per_minute = 100
//! requests_per_hour = 2000
//! cooldown_period = 60        # seconds
//!
//! [collector]
//! target_movies = 1000
//! max_pages = 50
//! acquire_timeout = 30        # seconds
//! output_dir = "data/raw/movies"
//! collection_type = "bulk_collection"
//! ```

use crate::error::{ConfigError, ConfigResult};
use crate::rate_limiter::{config::duration_secs, RateLimitConfig, RateLimiter};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Parameters of a paged bulk collection.
///
/// ```rust
/// use movie_intake::CollectorConfig;
/// use std::time::Duration;
///
/// let config = CollectorConfig::default();
/// assert_eq!(config.target_movies, 1000);
/// assert_eq!(config.max_pages, 50);
/// assert_eq!(config.acquire_timeout, Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Stop once this many unique records are held.
    pub target_movies: usize,

    /// Highest page requested (pages start at 1).
    pub max_pages: u32,

    /// How long to wait for the limiter before giving up on a page.
    #[serde(with = "duration_secs")]
    pub acquire_timeout: Duration,

    /// Directory that receives run files.
    pub output_dir: PathBuf,

    /// Prefix of the movies file name, e.g. `bulk_collection_20240101_120000.json`.
    pub collection_type: String,

    /// Concurrent page fetchers sharing one limiter.
    pub workers: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            target_movies: 1000,
            max_pages: 50,
            acquire_timeout: Duration::from_secs(30),
            output_dir: PathBuf::from("data/raw/movies"),
            collection_type: "bulk_collection".to_string(),
            workers: 1,
        }
    }
}

impl CollectorConfig {
    pub fn with_target_movies(mut self, target_movies: usize) -> Self {
        self.target_movies = target_movies;
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_acquire_timeout(mut self, acquire_timeout: Duration) -> Self {
        self.acquire_timeout = acquire_timeout;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_collection_type(mut self, collection_type: impl Into<String>) -> Self {
        self.collection_type = collection_type.into();
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Rejects settings under which a run could never collect anything.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.target_movies == 0 {
            return Err(ConfigError::collector("target_movies must be greater than 0"));
        }
        if self.max_pages == 0 {
            return Err(ConfigError::collector("max_pages must be greater than 0"));
        }
        if self.workers == 0 {
            return Err(ConfigError::collector("workers must be greater than 0"));
        }
        if self.collection_type.trim().is_empty() {
            return Err(ConfigError::collector("collection_type must not be empty"));
        }
        if self.collection_type.contains(['/', '\\']) {
            return Err(ConfigError::collector(
                "collection_type must not contain path separators",
            ));
        }
        Ok(())
    }
}

/// Complete settings document: `[rate_limit]` and `[collector]` tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rate_limit: RateLimitConfig,
    pub collector: CollectorConfig,
}

impl Settings {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let settings: Settings = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads, parses and validates a TOML settings file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded settings file");
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.rate_limit.validate()?;
        self.collector.validate()
    }

    /// Builds the limiter described by `[rate_limit]`.
    pub fn build_limiter(&self) -> ConfigResult<RateLimiter> {
        RateLimiter::try_new(self.rate_limit.clone())
    }
}
