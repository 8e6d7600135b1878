//! # Core Rate Limiter Implementation
//!
//! Admission control for outbound API calls. Three budgets are enforced at
//! once, and an explicit cooldown overrides all of them:
//!
//! ```text
//!     can_make_request() / acquire() evaluation order:
//!
//!     Cooldown active? ──Yes──► ❌ reject
//!          │ No (expired cooldown is cleared here)
//!          ▼
//!     Refill bucket: tokens = min(burst, tokens + elapsed × rps)
//!          │
//!     tokens < 1? ──────Yes──► ❌ reject (debug)
//!          │ No
//!          ▼
//!     Prune 60s window ── full? ──Yes──► ❌ reject (warn)
//!          │ No
//!     Prune 3600s window ─ full? ──Yes──► ❌ reject (warn)
//!          │ No
//!          ▼
//!     ✅ admissible
//! ```
//!
//! ## Locking
//!
//! All state lives behind one [`parking_lot::Mutex`]. `acquire` holds it for
//! the whole check → consume → record sequence, so two callers can never both
//! spend the last token. Sleeping between polls happens with the lock released.
//!
//! ## Waiting
//!
//! ```text
//!     acquire(timeout):
//!
//!     deadline = now + timeout (computed once)
//!        │
//!        ▼
//!     ┌──────────┐  admitted   ┌─────────┐
//!     │  check   ├────────────►│  true   │
//!     └────┬─────┘             └─────────┘
//!          │ rejected
//!          ▼
//!     cancelled or past deadline? ──Yes──► blocked += 1, false
//!          │ No
//!          ▼
//!     sleep min(poll_interval, remaining) ──► check
//! ```
//!
//! Admission is not FIFO: waiters race on every poll tick.

use super::{
    config::{RateLimitConfig, DEFAULT_POLL_INTERVAL, HOUR_WINDOW, MINUTE_WINDOW},
    metrics::RateLimiterStats,
    utils::{instant_to_utc, round2, CancelFlag, SlidingWindow},
};
use crate::error::ConfigError;
use parking_lot::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Longest cooldown the limiter stores (about 136 years). Longer requests are
/// clamped to it, so `Duration::MAX` means "until reset".
const MAX_COOLDOWN: Duration = Duration::from_secs(u32::MAX as u64);

/// Why an admission check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    CoolingDown,
    NoTokens,
    MinuteBudget,
    HourBudget,
}

/// Outcome of a single poll iteration inside `acquire`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Poll {
    Admitted,
    GaveUp,
    Sleep(Duration),
}

/// Mutable limiter state. Only ever touched with the limiter's lock held.
#[derive(Debug)]
struct LimiterState {
    tokens: f64,
    last_refill: Instant,
    minute_window: SlidingWindow,
    hour_window: SlidingWindow,
    total_requests: u64,
    blocked_requests: u64,
    rate_limited_until: Option<Instant>,
    last_request: Option<Instant>,
}

impl LimiterState {
    fn new(config: &RateLimitConfig, now: Instant) -> Self {
        Self {
            tokens: config.burst_allowance as f64,
            last_refill: now,
            minute_window: SlidingWindow::new(MINUTE_WINDOW),
            hour_window: SlidingWindow::new(HOUR_WINDOW),
            total_requests: 0,
            blocked_requests: 0,
            rate_limited_until: None,
            last_request: None,
        }
    }

    #[inline]
    fn refill(&mut self, config: &RateLimitConfig, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * config.requests_per_second)
            .min(config.burst_allowance as f64);
        self.last_refill = now;
    }

    /// Full admission check. Refills and prunes, never consumes.
    fn evaluate(&mut self, config: &RateLimitConfig, now: Instant) -> Result<(), Rejection> {
        if let Some(until) = self.rate_limited_until {
            if now < until {
                return Err(Rejection::CoolingDown);
            }
            self.rate_limited_until = None;
            info!("rate limit cooldown cleared");
        }

        self.refill(config, now);
        if self.tokens < 1.0 {
            debug!(tokens = self.tokens, "insufficient tokens, request must wait");
            return Err(Rejection::NoTokens);
        }

        if self.minute_window.is_full(now, config.requests_per_minute) {
            warn!(
                limit = config.requests_per_minute,
                "per-minute request budget exhausted"
            );
            return Err(Rejection::MinuteBudget);
        }

        if self.hour_window.is_full(now, config.requests_per_hour) {
            warn!(
                limit = config.requests_per_hour,
                "per-hour request budget exhausted"
            );
            return Err(Rejection::HourBudget);
        }

        Ok(())
    }

    fn admit(&mut self, now: Instant) {
        self.tokens -= 1.0;
        self.minute_window.record(now);
        self.hour_window.record(now);
        self.total_requests += 1;
        self.last_request = Some(now);
        debug!(remaining_tokens = self.tokens, "request admitted");
    }

    fn cooldown_remaining(&self, now: Instant) -> Option<Duration> {
        self.rate_limited_until
            .filter(|until| now < *until)
            .map(|until| until - now)
    }
}

/// Tiered rate limiter shared by every caller that talks to one upstream API.
///
/// Wrap it in an [`Arc`](std::sync::Arc) and hand clones to worker threads or
/// tasks. There is no process-wide default instance.
///
/// ## Example
///
/// ```rust
/// use movie_intake::{RateLimitConfig, RateLimiter};
/// use std::sync::Arc;
/// use std::thread;
/// use std::time::Duration;
///
/// let limiter = Arc::new(RateLimiter::new(RateLimitConfig::default()));
///
/// let mut handles = vec![];
/// for _ in 0..4 {
///     let limiter = limiter.clone();
///     handles.push(thread::spawn(move || {
///         if limiter.acquire(Some(Duration::ZERO)) {
///             // perform the call
///         }
///     }));
/// }
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(limiter.get_stats().total_requests, 4);
/// ```
pub struct RateLimiter {
    config: RateLimitConfig,
    poll_interval: Duration,
    state: Mutex<LimiterState>,
}

impl RateLimiter {
    /// Creates a limiter from a configuration known to be valid.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid (see [`RateLimitConfig::validate`]).
    /// Use [`try_new`](Self::try_new) for configuration coming from outside.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::try_new(config).expect("Invalid rate limiter configuration")
    }

    /// Creates a limiter, rejecting invalid configuration.
    ///
    /// ```rust
    /// use movie_intake::{RateLimitConfig, RateLimiter};
    ///
    /// assert!(RateLimiter::try_new(RateLimitConfig::new(0.0, 10, 10)).is_err());
    /// assert!(RateLimiter::try_new(RateLimitConfig::conservative()).is_ok());
    /// ```
    pub fn try_new(config: RateLimitConfig) -> Result<Self, ConfigError> {
        Self::with_poll_interval(config, DEFAULT_POLL_INTERVAL)
    }

    /// Creates a limiter that re-checks admission every `poll_interval` while waiting.
    pub fn with_poll_interval(
        config: RateLimitConfig,
        poll_interval: Duration,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }

        let state = LimiterState::new(&config, Instant::now());
        Ok(Self {
            config,
            poll_interval,
            state: Mutex::new(state),
        })
    }

    /// Budgets this limiter enforces.
    #[inline]
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Sleep between admission checks while waiting.
    #[inline]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Reports whether a request would be admitted right now.
    ///
    /// Refills the bucket, prunes both windows and clears an expired cooldown,
    /// but consumes nothing and records nothing.
    pub fn can_make_request(&self) -> bool {
        let mut state = self.state.lock();
        state.evaluate(&self.config, Instant::now()).is_ok()
    }

    /// Waits for admission, then consumes one token and records the request.
    ///
    /// - `None` waits until admitted.
    /// - `Some(Duration::ZERO)` performs exactly one check.
    /// - Otherwise the deadline is fixed at entry and the call returns within
    ///   one poll interval of it.
    ///
    /// A timeout increments `blocked_requests` and returns `false`.
    ///
    /// ```rust
    /// use movie_intake::{RateLimitConfig, RateLimiter};
    /// use std::time::Duration;
    ///
    /// let limiter = RateLimiter::new(RateLimitConfig::new(2.0, 100, 1000).with_burst_allowance(2));
    /// assert!(limiter.acquire(Some(Duration::ZERO)));
    /// assert!(limiter.acquire(Some(Duration::ZERO)));
    /// assert!(!limiter.acquire(Some(Duration::ZERO)));
    /// assert_eq!(limiter.get_stats().blocked_requests, 1);
    /// ```
    pub fn acquire(&self, timeout: Option<Duration>) -> bool {
        self.acquire_blocking(timeout, None)
    }

    /// Like [`acquire`](Self::acquire), but gives up as soon as `cancel` is set.
    ///
    /// The flag is checked between poll iterations. A cancelled wait counts as
    /// blocked.
    pub fn acquire_with_cancel(&self, timeout: Option<Duration>, cancel: &CancelFlag) -> bool {
        self.acquire_blocking(timeout, Some(cancel))
    }

    /// Async form of [`acquire`](Self::acquire). Awaits a tokio timer between
    /// polls instead of blocking the thread.
    pub async fn acquire_async(&self, timeout: Option<Duration>) -> bool {
        self.acquire_suspending(timeout, None).await
    }

    /// Async form of [`acquire_with_cancel`](Self::acquire_with_cancel).
    pub async fn acquire_async_with_cancel(
        &self,
        timeout: Option<Duration>,
        cancel: &CancelFlag,
    ) -> bool {
        self.acquire_suspending(timeout, Some(cancel)).await
    }

    fn acquire_blocking(&self, timeout: Option<Duration>, cancel: Option<&CancelFlag>) -> bool {
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        loop {
            match self.poll_once(deadline, cancel) {
                Poll::Admitted => return true,
                Poll::GaveUp => return false,
                Poll::Sleep(pause) => std::thread::sleep(pause),
            }
        }
    }

    async fn acquire_suspending(&self, timeout: Option<Duration>, cancel: Option<&CancelFlag>) -> bool {
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        loop {
            match self.poll_once(deadline, cancel) {
                Poll::Admitted => return true,
                Poll::GaveUp => return false,
                Poll::Sleep(pause) => tokio::time::sleep(pause).await,
            }
        }
    }

    /// One iteration of the wait loop. The lock is released before returning.
    fn poll_once(&self, deadline: Option<Instant>, cancel: Option<&CancelFlag>) -> Poll {
        let mut state = self.state.lock();
        let now = Instant::now();

        if state.evaluate(&self.config, now).is_ok() {
            state.admit(now);
            return Poll::Admitted;
        }

        if cancel.is_some_and(CancelFlag::is_cancelled) {
            state.blocked_requests += 1;
            drop(state);
            warn!("request acquisition cancelled");
            return Poll::GaveUp;
        }

        match deadline {
            Some(deadline) if now >= deadline => {
                state.blocked_requests += 1;
                drop(state);
                warn!("request acquisition timed out");
                Poll::GaveUp
            }
            Some(deadline) => Poll::Sleep(self.poll_interval.min(deadline - now)),
            None => Poll::Sleep(self.poll_interval),
        }
    }

    /// Puts the limiter into cooldown: every check fails until it expires.
    ///
    /// `None` uses the configured `cooldown_period`. Call this when upstream
    /// answers HTTP 429. A new call replaces any cooldown already in force.
    /// Durations beyond roughly a century are clamped, never ignored.
    pub fn set_rate_limited(&self, duration: Option<Duration>) {
        let duration = duration.unwrap_or(self.config.cooldown_period).min(MAX_COOLDOWN);
        let mut state = self.state.lock();
        let now = Instant::now();
        state.rate_limited_until = Some(now + duration);
        drop(state);
        warn!(cooldown_secs = duration.as_secs_f64(), "rate limit cooldown set");
    }

    /// Time left in the current cooldown, or `None` when not cooling down.
    pub fn cooldown_remaining(&self) -> Option<Duration> {
        self.state.lock().cooldown_remaining(Instant::now())
    }

    /// Blocks the current thread until the active cooldown has passed.
    ///
    /// Returns immediately when no cooldown is active.
    pub fn wait_for_reset(&self) {
        if let Some(remaining) = self.cooldown_remaining() {
            info!(wait_secs = remaining.as_secs_f64(), "waiting for rate limit cooldown to pass");
            std::thread::sleep(remaining);
        }
    }

    /// Async form of [`wait_for_reset`](Self::wait_for_reset).
    pub async fn wait_for_reset_async(&self) {
        if let Some(remaining) = self.cooldown_remaining() {
            info!(wait_secs = remaining.as_secs_f64(), "waiting for rate limit cooldown to pass");
            tokio::time::sleep(remaining).await;
        }
    }

    /// Snapshot of budgets and counters.
    ///
    /// Prunes the windows so the counts are current; does not refill tokens
    /// or clear an expired cooldown.
    pub fn get_stats(&self) -> RateLimiterStats {
        let mut state = self.state.lock();
        let now = Instant::now();
        state.minute_window.prune(now);
        state.hour_window.prune(now);

        let cooldown_until = state.rate_limited_until.filter(|until| now < *until);

        RateLimiterStats {
            total_requests: state.total_requests,
            blocked_requests: state.blocked_requests,
            success_rate: RateLimiterStats::success_rate_of(
                state.total_requests,
                state.blocked_requests,
            ),
            current_tokens: round2(state.tokens),
            max_tokens: self.config.burst_allowance,
            requests_last_minute: state.minute_window.len(),
            requests_last_hour: state.hour_window.len(),
            is_rate_limited: cooldown_until.is_some(),
            rate_limited_until: cooldown_until.map(instant_to_utc),
            last_request_time: state.last_request.map(instant_to_utc),
            config: self.config.clone(),
        }
    }

    /// Refills the bucket, empties both windows and clears any cooldown.
    ///
    /// `total_requests` and `blocked_requests` are kept.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.tokens = self.config.burst_allowance as f64;
        state.last_refill = Instant::now();
        state.minute_window.clear();
        state.hour_window.clear();
        state.rate_limited_until = None;
        drop(state);
        info!("rate limiter reset");
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("RateLimiter")
            .field("config", &self.config)
            .field("poll_interval", &self.poll_interval)
            .field("current_tokens", &state.tokens)
            .field("total_requests", &state.total_requests)
            .field("blocked_requests", &state.blocked_requests)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn limiter(rps: f64, burst: u32) -> RateLimiter {
        RateLimiter::new(RateLimitConfig::new(rps, 1000, 10_000).with_burst_allowance(burst))
    }

    #[test]
    fn test_burst_then_reject() {
        let limiter = limiter(2.0, 2);

        assert!(limiter.acquire(Some(Duration::ZERO)));
        assert!(limiter.acquire(Some(Duration::ZERO)));
        assert!(!limiter.acquire(Some(Duration::ZERO)));

        let stats = limiter.get_stats();
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.blocked_requests, 1);
    }

    #[test]
    fn test_can_make_request_consumes_nothing() {
        let limiter = limiter(1.0, 1);

        for _ in 0..5 {
            assert!(limiter.can_make_request());
        }
        let stats = limiter.get_stats();
        assert_eq!(stats.total_requests, 0);
        assert_eq!(stats.requests_last_minute, 0);
        assert_eq!(stats.current_tokens, 1.0);
    }

    #[test]
    fn test_continuous_refill() {
        let limiter = limiter(20.0, 1);

        assert!(limiter.acquire(Some(Duration::ZERO)));
        assert!(!limiter.can_make_request());

        // 20 tokens/s => one token every 50ms
        thread::sleep(Duration::from_millis(80));
        assert!(limiter.can_make_request());
        assert!(limiter.acquire(Some(Duration::ZERO)));
    }

    #[test]
    fn test_refill_capped_at_burst() {
        let limiter = limiter(1000.0, 3);
        thread::sleep(Duration::from_millis(20));
        assert!(limiter.can_make_request());
        assert_eq!(limiter.get_stats().current_tokens, 3.0);
    }

    #[test]
    fn test_acquire_waits_for_refill() {
        let limiter = RateLimiter::with_poll_interval(
            RateLimitConfig::new(10.0, 1000, 10_000).with_burst_allowance(1),
            Duration::from_millis(10),
        )
        .unwrap();

        assert!(limiter.acquire(Some(Duration::ZERO)));
        let start = Instant::now();
        assert!(limiter.acquire(Some(Duration::from_secs(1))));
        // One token takes ~100ms at 10/s
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(limiter.get_stats().blocked_requests, 0);
    }

    #[test]
    fn test_timeout_respects_deadline() {
        let limiter = limiter(0.1, 1);
        assert!(limiter.acquire(Some(Duration::ZERO)));

        let start = Instant::now();
        assert!(!limiter.acquire(Some(Duration::from_millis(250))));
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(250));
        assert!(elapsed < Duration::from_millis(250) + DEFAULT_POLL_INTERVAL * 2);
        assert_eq!(limiter.get_stats().blocked_requests, 1);
    }

    #[test]
    fn test_minute_window_binds() {
        let limiter = RateLimiter::new(
            RateLimitConfig::new(1000.0, 3, 10_000).with_burst_allowance(10),
        );
        for _ in 0..3 {
            assert!(limiter.acquire(Some(Duration::ZERO)));
        }
        assert!(!limiter.can_make_request());
        assert_eq!(limiter.get_stats().requests_last_minute, 3);
    }

    #[test]
    fn test_hour_window_binds() {
        let limiter = RateLimiter::new(
            RateLimitConfig::new(1000.0, 100, 2).with_burst_allowance(10),
        );
        assert!(limiter.acquire(Some(Duration::ZERO)));
        assert!(limiter.acquire(Some(Duration::ZERO)));
        assert!(!limiter.acquire(Some(Duration::ZERO)));
        assert_eq!(limiter.get_stats().requests_last_hour, 2);
    }

    #[test]
    fn test_cooldown_blocks_then_clears() {
        let limiter = limiter(100.0, 10);

        limiter.set_rate_limited(Some(Duration::from_millis(150)));
        assert!(!limiter.can_make_request());
        assert!(limiter.cooldown_remaining().is_some());
        assert!(limiter.get_stats().is_rate_limited);

        thread::sleep(Duration::from_millis(200));
        assert!(limiter.can_make_request());
        assert!(limiter.cooldown_remaining().is_none());
    }

    #[test]
    fn test_default_cooldown_period() {
        let limiter = RateLimiter::new(
            RateLimitConfig::default().with_cooldown_period(Duration::from_secs(30)),
        );
        limiter.set_rate_limited(None);
        let remaining = limiter.cooldown_remaining().unwrap();
        assert!(remaining > Duration::from_secs(29));
        assert!(remaining <= Duration::from_secs(30));
    }

    #[test]
    fn test_unbounded_cooldown_blocks_until_reset() {
        let limiter = limiter(100.0, 10);
        limiter.set_rate_limited(Some(Duration::MAX));

        assert!(!limiter.can_make_request());
        assert!(!limiter.acquire(Some(Duration::ZERO)));
        assert!(limiter.cooldown_remaining().unwrap() > Duration::from_secs(100 * 365 * 86_400));

        let stats = limiter.get_stats();
        assert!(stats.is_rate_limited);
        assert!(stats.rate_limited_until.is_some());

        limiter.reset();
        assert!(limiter.can_make_request());
    }

    #[test]
    fn test_wait_for_reset() {
        let limiter = limiter(100.0, 10);
        limiter.wait_for_reset(); // no cooldown: returns at once

        limiter.set_rate_limited(Some(Duration::from_millis(100)));
        limiter.wait_for_reset();
        assert!(limiter.can_make_request());
    }

    #[test]
    fn test_reset_keeps_counters() {
        let limiter = limiter(1.0, 2);
        assert!(limiter.acquire(Some(Duration::ZERO)));
        assert!(limiter.acquire(Some(Duration::ZERO)));
        assert!(!limiter.acquire(Some(Duration::ZERO)));
        limiter.set_rate_limited(None);

        limiter.reset();

        let stats = limiter.get_stats();
        assert_eq!(stats.current_tokens, stats.max_tokens as f64);
        assert_eq!(stats.requests_last_minute, 0);
        assert_eq!(stats.requests_last_hour, 0);
        assert!(!stats.is_rate_limited);
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.blocked_requests, 1);
    }

    #[test]
    fn test_cancel_stops_waiting() {
        let limiter = Arc::new(limiter(0.01, 1));
        assert!(limiter.acquire(Some(Duration::ZERO)));

        let cancel = CancelFlag::new();
        let waiter = {
            let limiter = limiter.clone();
            let cancel = cancel.clone();
            thread::spawn(move || limiter.acquire_with_cancel(None, &cancel))
        };

        thread::sleep(Duration::from_millis(150));
        cancel.cancel();
        assert!(!waiter.join().unwrap());
        assert_eq!(limiter.get_stats().blocked_requests, 1);
    }

    #[test]
    fn test_concurrent_acquire_never_oversubscribes() {
        let limiter = Arc::new(limiter(0.01, 5));
        let mut handles = vec![];

        for _ in 0..8 {
            let limiter = limiter.clone();
            handles.push(thread::spawn(move || {
                (0..10)
                    .filter(|_| limiter.acquire(Some(Duration::ZERO)))
                    .count()
            }));
        }

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 5);
        assert_eq!(limiter.get_stats().total_requests, 5);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            RateLimiter::try_new(RateLimitConfig::new(-1.0, 10, 10)),
            Err(ConfigError::InvalidRequestRate(_))
        ));
        assert!(matches!(
            RateLimiter::with_poll_interval(RateLimitConfig::default(), Duration::ZERO),
            Err(ConfigError::ZeroPollInterval)
        ));
    }

    #[test]
    #[should_panic(expected = "Invalid rate limiter configuration")]
    fn test_new_panics_on_invalid_config() {
        let _ = RateLimiter::new(RateLimitConfig::default().with_burst_allowance(0));
    }

    #[test]
    fn test_last_request_time() {
        let limiter = limiter(10.0, 2);
        assert!(limiter.get_stats().last_request_time.is_none());
        assert!(limiter.acquire(Some(Duration::ZERO)));
        assert!(limiter.get_stats().last_request_time.is_some());
    }

    #[tokio::test]
    async fn test_acquire_async() {
        let limiter = RateLimiter::with_poll_interval(
            RateLimitConfig::new(20.0, 1000, 10_000).with_burst_allowance(1),
            Duration::from_millis(10),
        )
        .unwrap();

        assert!(limiter.acquire_async(Some(Duration::ZERO)).await);
        assert!(!limiter.acquire_async(Some(Duration::ZERO)).await);
        assert!(limiter.acquire_async(Some(Duration::from_secs(1))).await);
        assert_eq!(limiter.get_stats().blocked_requests, 1);
    }

    #[tokio::test]
    async fn test_acquire_async_cancelled() {
        let limiter = limiter(0.01, 1);
        assert!(limiter.acquire_async(None).await);

        let cancel = CancelFlag::new();
        cancel.cancel();
        assert!(!limiter.acquire_async_with_cancel(None, &cancel).await);
        assert_eq!(limiter.get_stats().blocked_requests, 1);
    }

    #[test]
    fn test_debug_impl() {
        let limiter = limiter(1.0, 1);
        let debug_str = format!("{:?}", limiter);
        assert!(debug_str.contains("RateLimiter"));
        assert!(debug_str.contains("current_tokens"));
    }
}
