//! # Rate Limiter Module
//!
//! Admission control in front of every outbound API call.
//!
//! ## Module Structure
//!
//! ```text
//!     rate_limiter/
//!     ├── mod.rs          (Module organization)
//!     ├── config.rs       (Budgets, presets and validation)
//!     ├── core.rs         (Token bucket + sliding windows + cooldown)
//!     ├── metrics.rs      (Stats snapshot and health)
//!     └── utils.rs        (Sliding window, cancellation, clock helpers)
//! ```
//!
//! ## Architecture Flow
//!
//! ```text
//!     Collector / caller
//!          │ acquire(timeout)
//!          ▼
//!     ┌─────────┐
//!     │  Core   │ ◄── one lock: tokens, windows, cooldown
//!     └────┬────┘
//!          │
//!          ▼
//!     ┌─────────┐
//!     │ Config  │ ◄── budgets & validation
//!     └────┬────┘
//!          │
//!          ▼
//!     ┌─────────┐
//!     │ Metrics │ ◄── get_stats(), health
//!     └─────────┘
//! ```

pub(crate) mod config;
mod core;
mod metrics;
mod utils;

/// Budgets and timing constants
pub use config::{RateLimitConfig, DEFAULT_POLL_INTERVAL, HOUR_WINDOW, MINUTE_WINDOW};

/// Tiered rate limiter
pub use core::RateLimiter;

/// Stats snapshot and health indicator
pub use metrics::{HealthStatus, RateLimiterStats};

/// Cooperative cancellation for blocked waiters
pub use utils::CancelFlag;

pub(crate) use utils::round2;
