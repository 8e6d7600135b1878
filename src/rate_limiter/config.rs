//! # Rate Limiter Configuration
//!
//! Budgets that the limiter enforces simultaneously. A request is admitted only
//! when every tier has room for it.
//!
//! ```text
//!     Tiered Budgets:
//!
//!     ┌──────────────────────────────────────┐
//!     │ Token bucket   burst_allowance = 10  │ ← short bursts
//!     │                refill 4.0 tokens/s   │
//!     ├──────────────────────────────────────┤
//!     │ Minute window  200 requests / 60s    │ ← sliding window
//!     ├──────────────────────────────────────┤
//!     │ Hour window    10000 requests / 3600s│ ← sliding window
//!     ├──────────────────────────────────────┤
//!     │ Cooldown       60s on HTTP 429       │ ← explicit override
//!     └──────────────────────────────────────┘
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Interval between admission checks while `acquire` waits.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Length of the per-minute sliding window.
pub const MINUTE_WINDOW: Duration = Duration::from_secs(60);

/// Length of the per-hour sliding window.
pub const HOUR_WINDOW: Duration = Duration::from_secs(3600);

/// Configuration for a [`RateLimiter`](crate::RateLimiter).
///
/// Defaults match a safe budget for the public movie database API:
/// 4 requests/second, 200/minute, 10000/hour, burst of 10 and a one-minute
/// cooldown after an explicit throttle.
///
/// The per-second rate scaled to a minute or an hour may exceed the tiered
/// budgets. That is allowed (the defaults do it); the sliding windows simply
/// become the binding constraint.
///
/// ## Examples
///
/// ```rust
/// use movie_intake::RateLimitConfig;
/// use std::time::Duration;
///
/// let config = RateLimitConfig::default();
/// assert_eq!(config.burst_allowance, 10);
///
/// let config = RateLimitConfig::new(2.0, 100, 2000)
///     .with_burst_allowance(2)
///     .with_cooldown_period(Duration::from_secs(30));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Token refill rate. Fractional tokens accumulate continuously.
    pub requests_per_second: f64,

    /// Ceiling for the trailing 60-second window.
    pub requests_per_minute: u32,

    /// Ceiling for the trailing 3600-second window.
    pub requests_per_hour: u32,

    /// Token bucket capacity.
    pub burst_allowance: u32,

    /// Default cooldown used by `set_rate_limited(None)`. Written as seconds in settings files.
    #[serde(with = "duration_secs")]
    pub cooldown_period: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 4.0,
            requests_per_minute: 200,
            requests_per_hour: 10_000,
            burst_allowance: 10,
            cooldown_period: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    /// Creates a configuration with the given budgets and default burst/cooldown.
    pub fn new(requests_per_second: f64, requests_per_minute: u32, requests_per_hour: u32) -> Self {
        Self {
            requests_per_second,
            requests_per_minute,
            requests_per_hour,
            ..Default::default()
        }
    }

    /// Budget used for long bulk collections: 2 req/s, 100/min, 2000/hour.
    pub fn conservative() -> Self {
        Self::new(2.0, 100, 2000)
    }

    /// Sets the token bucket capacity.
    pub fn with_burst_allowance(mut self, burst_allowance: u32) -> Self {
        self.burst_allowance = burst_allowance;
        self
    }

    /// Sets the default cooldown period.
    pub fn with_cooldown_period(mut self, cooldown_period: Duration) -> Self {
        self.cooldown_period = cooldown_period;
        self
    }

    /// Checks that every budget admits at least one request.
    ///
    /// # Errors
    ///
    /// - `requests_per_second` is zero, negative, NaN or infinite
    /// - `requests_per_minute` or `requests_per_hour` is 0
    /// - `burst_allowance` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.requests_per_second.is_finite() || self.requests_per_second <= 0.0 {
            return Err(ConfigError::InvalidRequestRate(self.requests_per_second));
        }
        if self.requests_per_minute == 0 {
            return Err(ConfigError::ZeroBudget {
                field: "requests_per_minute",
            });
        }
        if self.requests_per_hour == 0 {
            return Err(ConfigError::ZeroBudget {
                field: "requests_per_hour",
            });
        }
        if self.burst_allowance == 0 {
            return Err(ConfigError::ZeroBurst);
        }

        if !self.is_consistent() {
            warn!(
                requests_per_second = self.requests_per_second,
                requests_per_minute = self.requests_per_minute,
                requests_per_hour = self.requests_per_hour,
                "per-second rate exceeds a tiered budget; sliding windows will bind"
            );
        }
        Ok(())
    }

    /// Returns `true` when the per-second rate, scaled up, fits inside both tiered budgets.
    pub fn is_consistent(&self) -> bool {
        self.requests_per_second * 60.0 <= self.requests_per_minute as f64
            && self.requests_per_second * 3600.0 <= self.requests_per_hour as f64
    }

    /// Long-run admission rate once bursts are spent: the tightest of the three tiers.
    ///
    /// ```rust
    /// use movie_intake::RateLimitConfig;
    ///
    /// // 4/s, 200/min = 3.33/s and 10000/h = 2.78/s: the hour budget binds.
    /// let config = RateLimitConfig::default();
    /// assert!((config.sustained_rate_per_second() - 10_000.0 / 3600.0).abs() < 1e-9);
    /// ```
    pub fn sustained_rate_per_second(&self) -> f64 {
        self.requests_per_second
            .min(self.requests_per_minute as f64 / MINUTE_WINDOW.as_secs_f64())
            .min(self.requests_per_hour as f64 / HOUR_WINDOW.as_secs_f64())
    }
}

/// Serde adapter writing a `Duration` as fractional seconds.
pub(crate) mod duration_secs {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub(crate) fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}
