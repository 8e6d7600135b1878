//! # movie-intake - Rate-Limited Movie Metadata Collection
//!
//! Building blocks for pulling movie listings out of a public metadata API
//! without getting throttled, and turning the raw payloads into clean, typed,
//! deduplicated records.
//!
//! ## Components
//!
//! - **[`RateLimiter`]**: admission gate in front of every outbound call.
//!   Enforces a token bucket (per second), two sliding windows (per minute
//!   and per hour) and an explicit cooldown after upstream HTTP 429.
//! - **[`ResponseParser`]**: converts listing/detail/trending payloads into
//!   [`MovieRecord`]s and friends, then validates them.
//! - **[`Collector`]**: pages through a [`MovieSource`], deduplicating with a
//!   [`MovieAccumulator`] and producing [`CollectionStats`].
//! - **[`RunStore`]**: writes each run and its stats as JSON.
//!
//! ## Control Flow
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │   Collector / caller    │
//!                    └──────────┬──────────────┘
//!                               │ acquire(timeout)
//!                    ┌──────────▼──────────────┐
//!                    │      RateLimiter        │
//!                    │  tokens │ 60s │ 3600s   │
//!                    │  cooldown (HTTP 429)    │
//!                    └──────────┬──────────────┘
//!                               │ admitted
//!                    ┌──────────▼──────────────┐
//!                    │  MovieSource (HTTP)     │ ── 429 ──► set_rate_limited()
//!                    └──────────┬──────────────┘
//!                               │ serde_json::Value
//!                    ┌──────────▼──────────────┐
//!                    │    ResponseParser       │
//!                    │  parse ──► validate     │
//!                    └──────────┬──────────────┘
//!                               │ Vec<MovieRecord>
//!                    ┌──────────▼──────────────┐
//!                    │   MovieAccumulator      │ first-seen dedup
//!                    └──────────┬──────────────┘
//!                               │
//!                    ┌──────────▼──────────────┐
//!                    │       RunStore          │ JSON files
//!                    └─────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use movie_intake::{RateLimitConfig, RateLimiter, ResponseParser};
//! use serde_json::json;
//! use std::time::Duration;
//!
//! let limiter = RateLimiter::new(RateLimitConfig::default());
//! let parser = ResponseParser::new();
//!
//! if limiter.acquire(Some(Duration::from_secs(30))) {
//!     // ... perform the HTTP call, then:
//!     let response = json!({
//!         "page": 1,
//!         "total_pages": 10,
//!         "total_results": 200,
//!         "results": [{ "id": 42, "title": "X", "vote_average": 7.5, "genre_ids": [1, 2] }]
//!     });
//!     let (movies, pagination) = parser.parse_movie_list_response(&response);
//!     let movies = parser.filter_valid_movies(movies);
//!     assert_eq!(movies[0].movie_id, 42);
//!     assert!(pagination.has_next_page());
//! }
//! ```
//!
//! ## Builder
//!
//! ```rust
//! use movie_intake::RateLimiterBuilder;
//! use std::time::Duration;
//!
//! let limiter = RateLimiterBuilder::new()
//!     .requests_per_second(2.0)
//!     .requests_per_minute(100)
//!     .requests_per_hour(2000)
//!     .burst_allowance(5)
//!     .cooldown_period(Duration::from_secs(120))
//!     .build();
//!
//! assert_eq!(limiter.get_stats().max_tokens, 5);
//! ```
//!
//! ## Thread Safety
//!
//! - `RateLimiter` - share via `Arc<RateLimiter>`; one lock guards all budget state
//! - `ResponseParser` - stateless, use from anywhere
//! - `MovieAccumulator` - concurrent inserts through `&self`
//!
//! ## Logging
//!
//! Everything logs through `tracing`. Applications install a subscriber, e.g.
//! with [`telemetry::init_tracing`].

#![warn(rust_2018_idioms, unreachable_pub, missing_debug_implementations)]
#![forbid(unsafe_code)]

mod collector;
mod error;
mod parser;
mod rate_limiter;
mod settings;
pub mod telemetry;

pub use collector::{
    save_parsed_data, CollectionInfo, CollectionReport, CollectionStats, Collector,
    MovieAccumulator, MovieSource, PerformanceGrade, RunStore, SavedRun, StabilityGrade,
    RUN_TIMESTAMP_FORMAT,
};
pub use error::{ConfigError, ConfigResult, FetchError, ParseError, StoreError};
pub use parser::{
    check_movie, parse_response, Genre, MovieCandidate, MovieDetails, MovieRecord,
    PaginationInfo, ParsedResponse, ProductionCompany, ProductionCountry, ResponseKind,
    ResponseParser, SpokenLanguage, TrendingData, TrendingEntry, ValidationIssue,
    MAX_VOTE_AVERAGE, SOURCE_TMDB,
};
pub use rate_limiter::{
    CancelFlag, HealthStatus, RateLimitConfig, RateLimiter, RateLimiterStats,
    DEFAULT_POLL_INTERVAL, HOUR_WINDOW, MINUTE_WINDOW,
};
pub use settings::{CollectorConfig, Settings};

/// A rate limiter wrapped in `Arc` for sharing between workers.
///
/// # Example
/// ```rust
/// use movie_intake::{RateLimitConfig, RateLimiter, SharedRateLimiter};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let shared: SharedRateLimiter = Arc::new(RateLimiter::new(RateLimitConfig::default()));
///
/// let limiter_clone = shared.clone();
/// std::thread::spawn(move || {
///     limiter_clone.acquire(Some(Duration::ZERO));
/// })
/// .join()
/// .unwrap();
/// ```
pub type SharedRateLimiter = std::sync::Arc<RateLimiter>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Minimum supported Rust version.
pub const MSRV: &str = "1.75.0";

/// Prelude module for convenient imports.
///
/// ```rust
/// use movie_intake::prelude::*;
/// ```
pub mod prelude {
    //! Common imports for a collection script.
    //!
    //! # Example
    //! ```rust
    //! use movie_intake::prelude::*;
    //!
    //! let limiter = RateLimiter::new(RateLimitConfig::conservative());
    //! let parser = ResponseParser::new();
    //! let status = HealthStatus::Healthy;
    //! ```

    pub use crate::{
        CancelFlag, CollectionStats, Collector, CollectorConfig, FetchError, HealthStatus,
        MovieAccumulator, MovieRecord, MovieSource, PaginationInfo, RateLimitConfig,
        RateLimiter, RateLimiterBuilder, RateLimiterStats, ResponseParser, RunStore, Settings,
        SharedRateLimiter,
    };
}

/// Fluent construction of a [`RateLimiter`].
///
/// Starts from [`RateLimitConfig::default`] (4 req/s, 200/min, 10000/h,
/// burst 10, 60s cooldown) and the 100ms poll interval.
///
/// # Example
///
/// ```rust
/// use movie_intake::RateLimiterBuilder;
/// use std::time::Duration;
///
/// let limiter = RateLimiterBuilder::new()
///     .requests_per_second(1.0)
///     .poll_interval(Duration::from_millis(20))
///     .build();
/// assert_eq!(limiter.poll_interval(), Duration::from_millis(20));
///
/// // Or use try_build() for error handling
/// let result = RateLimiterBuilder::new()
///     .burst_allowance(0)  // Invalid!
///     .try_build();
/// assert!(result.is_err());
/// ```
#[derive(Debug, Clone)]
pub struct RateLimiterBuilder {
    config: RateLimitConfig,
    poll_interval: std::time::Duration,
}

impl RateLimiterBuilder {
    /// Creates a builder with default budgets.
    pub fn new() -> Self {
        Self::from_config(RateLimitConfig::default())
    }

    /// Starts from an existing configuration, e.g. [`RateLimitConfig::conservative`].
    pub fn from_config(config: RateLimitConfig) -> Self {
        Self {
            config,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Token refill rate (must be positive).
    pub fn requests_per_second(mut self, rate: f64) -> Self {
        self.config.requests_per_second = rate;
        self
    }

    /// Ceiling for the trailing minute (must be > 0).
    pub fn requests_per_minute(mut self, limit: u32) -> Self {
        self.config.requests_per_minute = limit;
        self
    }

    /// Ceiling for the trailing hour (must be > 0).
    pub fn requests_per_hour(mut self, limit: u32) -> Self {
        self.config.requests_per_hour = limit;
        self
    }

    /// Token bucket capacity (must be > 0).
    pub fn burst_allowance(mut self, burst: u32) -> Self {
        self.config.burst_allowance = burst;
        self
    }

    /// Cooldown applied by `set_rate_limited(None)`.
    pub fn cooldown_period(mut self, period: std::time::Duration) -> Self {
        self.config.cooldown_period = period;
        self
    }

    /// Sleep between admission checks while `acquire` waits (must be > 0).
    pub fn poll_interval(mut self, interval: std::time::Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Builds the rate limiter.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid. Use `try_build()` to handle
    /// the error instead.
    pub fn build(self) -> RateLimiter {
        self.try_build().expect("Invalid rate limiter configuration")
    }

    /// Builds the rate limiter, returning an error if the configuration is invalid.
    pub fn try_build(self) -> Result<RateLimiter, ConfigError> {
        RateLimiter::with_poll_interval(self.config, self.poll_interval)
    }
}

impl Default for RateLimiterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
