//! # Rate Limiter Statistics
//!
//! Point-in-time snapshot of a limiter's budgets and counters, plus a coarse
//! health assessment for dashboards and log lines.
//!
//! ```text
//!     Stats Snapshot:
//!     ┌─────────────────────────────────────┐
//!     │  Tokens:        7.25 / 10           │
//!     │  Last minute:   42 / 200            │
//!     │  Last hour:     980 / 10000         │
//!     │  Success rate:  98.00%              │
//!     │  Cooldown:      inactive            │
//!     │  Health:        ✅ Healthy           │
//!     └─────────────────────────────────────┘
//! ```

use super::config::RateLimitConfig;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Snapshot returned by [`RateLimiter::get_stats`](crate::RateLimiter::get_stats).
///
/// `total_requests` counts admitted requests; `blocked_requests` counts
/// `acquire` calls that gave up (timeout or cancellation). They are cumulative
/// and survive [`reset`](crate::RateLimiter::reset).
#[derive(Debug, Clone, Serialize)]
pub struct RateLimiterStats {
    /// Requests admitted since construction.
    pub total_requests: u64,

    /// `acquire` calls that timed out or were cancelled.
    pub blocked_requests: u64,

    /// `(total - blocked) / total`, or 1.0 before the first request.
    pub success_rate: f64,

    /// Tokens currently in the bucket, rounded to two decimals.
    pub current_tokens: f64,

    /// Bucket capacity (`burst_allowance`).
    pub max_tokens: u32,

    /// Admissions in the trailing 60 seconds.
    pub requests_last_minute: usize,

    /// Admissions in the trailing 3600 seconds.
    pub requests_last_hour: usize,

    /// Whether an explicit cooldown is in force.
    pub is_rate_limited: bool,

    /// When the cooldown ends, if one is active.
    pub rate_limited_until: Option<DateTime<Utc>>,

    /// Time of the most recent admission.
    pub last_request_time: Option<DateTime<Utc>>,

    /// Budgets the limiter was built with.
    pub config: RateLimitConfig,
}

impl RateLimiterStats {
    /// Computes the success rate from the cumulative counters.
    ///
    /// ```rust
    /// use movie_intake::RateLimiterStats;
    ///
    /// assert_eq!(RateLimiterStats::success_rate_of(0, 0), 1.0);
    /// assert_eq!(RateLimiterStats::success_rate_of(10, 2), 0.8);
    /// ```
    pub fn success_rate_of(total: u64, blocked: u64) -> f64 {
        if total == 0 {
            1.0
        } else {
            total.saturating_sub(blocked) as f64 / total as f64
        }
    }

    /// Fraction of the bucket currently spent (0.0 = full, 1.0 = empty).
    pub fn token_utilization(&self) -> f64 {
        if self.max_tokens == 0 {
            0.0
        } else {
            (1.0 - self.current_tokens / self.max_tokens as f64).clamp(0.0, 1.0)
        }
    }

    /// Fraction of the minute budget used in the trailing minute.
    pub fn minute_utilization(&self) -> f64 {
        self.requests_last_minute as f64 / self.config.requests_per_minute.max(1) as f64
    }

    /// Fraction of the hour budget used in the trailing hour.
    pub fn hour_utilization(&self) -> f64 {
        self.requests_last_hour as f64 / self.config.requests_per_hour.max(1) as f64
    }

    /// Coarse health of the limiter.
    ///
    /// - **Critical**: an explicit cooldown is active
    /// - **Degraded**: success rate below 50%, the bucket is empty, or a window is full
    /// - **Healthy**: otherwise
    pub fn health_status(&self) -> HealthStatus {
        if self.is_rate_limited {
            HealthStatus::Critical
        } else if self.success_rate < 0.5
            || self.current_tokens < 1.0
            || self.minute_utilization() >= 1.0
            || self.hour_utilization() >= 1.0
        {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }

    /// Human-readable multi-line report.
    ///
    /// ```text
    /// RateLimiter Stats:
    /// ├─ Budgets:
    /// │  ├─ Tokens: 7.25/10
    /// │  ├─ Last Minute: 42/200
    /// │  └─ Last Hour: 980/10000
    /// ├─ Counters:
    /// │  ├─ Total Requests: 980
    /// │  ├─ Blocked Requests: 3
    /// │  └─ Success Rate: 99.69%
    /// └─ State:
    ///    ├─ Rate Limited: false
    ///    └─ Health: ✅ Healthy
    /// ```
    pub fn summary(&self) -> String {
        format!(
            "RateLimiter Stats:\n\
             ├─ Budgets:\n\
             │  ├─ Tokens: {:.2}/{}\n\
             │  ├─ Last Minute: {}/{}\n\
             │  └─ Last Hour: {}/{}\n\
             ├─ Counters:\n\
             │  ├─ Total Requests: {}\n\
             │  ├─ Blocked Requests: {}\n\
             │  └─ Success Rate: {:.2}%\n\
             └─ State:\n\
             \x20  ├─ Rate Limited: {}{}\n\
             \x20  └─ Health: {}",
            self.current_tokens,
            self.max_tokens,
            self.requests_last_minute,
            self.config.requests_per_minute,
            self.requests_last_hour,
            self.config.requests_per_hour,
            self.total_requests,
            self.blocked_requests,
            self.success_rate * 100.0,
            self.is_rate_limited,
            self.rate_limited_until
                .map(|until| format!(" (until {})", until.to_rfc3339()))
                .unwrap_or_default(),
            self.health_status()
        )
    }
}

impl fmt::Display for RateLimiterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

/// Health indicator derived from a [`RateLimiterStats`] snapshot.
///
/// ```text
///     Healthy ──────► budget available, requests flowing
///        │
///     Degraded ─────► a tier is exhausted or many waits time out
///        │
///     Critical ─────► upstream throttled us, cooling down
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    /// Requests are being admitted normally.
    Healthy,

    /// Admission is currently constrained by a tier or by timeouts.
    Degraded,

    /// An explicit cooldown is rejecting all requests.
    Critical,
}

impl HealthStatus {
    /// Returns true if the status indicates any problem.
    pub fn is_unhealthy(&self) -> bool {
        !matches!(self, Self::Healthy)
    }

    /// Suggested operator action.
    pub fn suggested_action(&self) -> &'static str {
        match self {
            Self::Healthy => "No action needed",
            Self::Degraded => "Monitor closely, consider lowering the request rate",
            Self::Critical => "Upstream is throttling: wait for the cooldown and review budgets",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "✅ Healthy"),
            Self::Degraded => write!(f, "⚠️ Degraded"),
            Self::Critical => write!(f, "🔴 Critical"),
        }
    }
}
