//! # Utility Types (utils.rs)
//!
//! Building blocks shared by the limiter core: the sliding request window,
//! cooperative cancellation for blocked waiters, and clock conversions for
//! reporting.
//!
//! ## Sliding Window
//!
//! ```text
//!     Append + prune (window = 60s, now = t):
//!
//!     front                                   back
//!     [t-75] [t-61] [t-42] [t-10] [t-3]  ◄── record(t)
//!       ✗      ✗      ✓      ✓      ✓
//!       └──────┴── pruned: age >= 60s
//! ```

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Trailing window of request instants.
///
/// Instants are appended in non-decreasing order, so pruning only ever pops
/// from the front.
#[derive(Debug, Clone)]
pub(crate) struct SlidingWindow {
    horizon: Duration,
    entries: VecDeque<Instant>,
}

impl SlidingWindow {
    pub(crate) fn new(horizon: Duration) -> Self {
        Self {
            horizon,
            entries: VecDeque::new(),
        }
    }

    /// Drops every entry whose age has reached the horizon.
    #[inline]
    pub(crate) fn prune(&mut self, now: Instant) {
        while let Some(&oldest) = self.entries.front() {
            if now.saturating_duration_since(oldest) >= self.horizon {
                self.entries.pop_front();
            } else {
                break;
            }
        }
    }

    #[inline]
    pub(crate) fn record(&mut self, now: Instant) {
        self.entries.push_back(now);
    }

    /// Prunes, then reports whether the window already holds `limit` entries.
    #[inline]
    pub(crate) fn is_full(&mut self, now: Instant, limit: u32) -> bool {
        self.prune(now);
        self.entries.len() >= limit as usize
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Cooperative cancellation for callers blocked in `acquire`.
///
/// Cloning shares the flag; cancelling any clone wakes every waiter at its next
/// poll tick.
///
/// ```rust
/// use movie_intake::CancelFlag;
///
/// let flag = CancelFlag::new();
/// let handle = flag.clone();
/// handle.cancel();
/// assert!(flag.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    /// Creates a flag in the "not cancelled" state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Returns `true` once `cancel` has been called on any clone.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Maps a monotonic instant onto the wall clock for reporting.
///
/// Instants in the past and future are both supported; the result is only as
/// precise as the two clock reads it is derived from.
pub(crate) fn instant_to_utc(instant: Instant) -> DateTime<Utc> {
    let now_instant = Instant::now();
    let now_utc = Utc::now();
    let offset = if instant <= now_instant {
        chrono::Duration::from_std(now_instant - instant).map(|d| now_utc - d)
    } else {
        chrono::Duration::from_std(instant - now_instant).map(|d| now_utc + d)
    };
    offset.unwrap_or(now_utc)
}

/// Rounds to two decimal places, as reported in stats and trending scores.
#[inline]
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
