//! # Collection Driver
//!
//! Pages through a listing endpoint under a shared [`RateLimiter`], composing
//! admission, fetch, parse, validation and dedup explicitly at each step.
//!
//! ```text
//!     per page:
//!
//!     limiter.acquire(timeout) ──false──► failed_requests += 1, next page
//!          │ true
//!          ▼
//!     source.fetch_page(page) ──Err(429)──► set_rate_limited(hint), api_errors += 1
//!          │                  ──Err(_)───► api_errors += 1
//!          ▼
//!     has `results`? ──No──► api_errors += 1
//!          │ neither array nor null ──► processing_errors += 1
//!          ▼
//!     parse ──► filter_valid ──► accumulator.extend
//!          │
//!     last page reported? ──Yes──► stop
//! ```
//!
//! With `workers > 1` several threads claim page numbers from one counter and
//! race on the same limiter; the tiered budgets still hold in aggregate.

use super::accumulator::MovieAccumulator;
use super::stats::{CollectionStats, Tally};
use crate::error::{ConfigError, FetchError};
use crate::parser::{MovieRecord, ResponseParser};
use crate::rate_limiter::RateLimiter;
use crate::settings::CollectorConfig;
use chrono::Utc;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info, warn};

/// Upstream listing endpoint. The HTTP client lives behind this trait.
///
/// Any `Fn(u32) -> Result<Value, FetchError>` closure is a source:
///
/// ```rust
/// use movie_intake::{FetchError, MovieSource};
/// use serde_json::json;
///
/// let source = |page: u32| -> Result<_, FetchError> {
///     Ok(json!({ "page": page, "total_pages": 1, "results": [] }))
/// };
/// assert!(source.fetch_page(1).is_ok());
/// ```
pub trait MovieSource: Send + Sync {
    /// Fetches one page (1-based) of the listing.
    fn fetch_page(&self, page: u32) -> Result<Value, FetchError>;
}

impl<F> MovieSource for F
where
    F: Fn(u32) -> Result<Value, FetchError> + Send + Sync,
{
    fn fetch_page(&self, page: u32) -> Result<Value, FetchError> {
        self(page)
    }
}

/// Records and totals of a finished run.
#[derive(Debug, Clone)]
pub struct CollectionReport {
    /// Unique valid records in first-seen order.
    pub movies: Vec<MovieRecord>,
    pub stats: CollectionStats,
}

/// Paged bulk collector.
///
/// ```rust,no_run
/// use movie_intake::{CollectorConfig, Collector, FetchError, RateLimitConfig, RateLimiter};
/// use serde_json::Value;
/// use std::sync::Arc;
///
/// # fn fetch(page: u32) -> Result<Value, FetchError> { unimplemented!() }
/// let limiter = Arc::new(RateLimiter::new(RateLimitConfig::conservative()));
/// let collector = Collector::new(limiter, fetch, CollectorConfig::default()).unwrap();
/// let report = collector.run();
/// println!("{}", report.stats);
/// ```
pub struct Collector<S: MovieSource> {
    limiter: Arc<RateLimiter>,
    source: S,
    parser: ResponseParser,
    config: CollectorConfig,
}

/// What happened to one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageOutcome {
    Collected { last_page: bool },
    Skipped,
}

impl<S: MovieSource> Collector<S> {
    pub fn new(limiter: Arc<RateLimiter>, source: S, config: CollectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            limiter,
            source,
            parser: ResponseParser::new(),
            config,
        })
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Collects pages `1..=max_pages` until the target is reached or the
    /// listing runs out.
    pub fn run(&self) -> CollectionReport {
        let start_time = Utc::now();
        let accumulator = MovieAccumulator::new();
        let tally = Tally::default();
        let next_page = AtomicU32::new(1);
        let exhausted = AtomicBool::new(false);

        info!(
            target_movies = self.config.target_movies,
            max_pages = self.config.max_pages,
            workers = self.config.workers,
            "starting movie collection"
        );

        if self.config.workers == 1 {
            self.work(&accumulator, &tally, &next_page, &exhausted);
        } else {
            thread::scope(|scope| {
                for _ in 0..self.config.workers {
                    scope.spawn(|| self.work(&accumulator, &tally, &next_page, &exhausted));
                }
            });
        }

        let stats = tally.finish(
            start_time,
            Utc::now(),
            accumulator.len() as u64,
            accumulator.duplicates(),
            self.config.target_movies as u64,
        );

        if stats.target_met() {
            info!(unique_movies = stats.unique_movies, "collection target reached");
        } else {
            warn!(
                unique_movies = stats.unique_movies,
                target_movies = stats.target_movies,
                "collection finished below target"
            );
        }
        info!(
            duration_secs = stats.duration,
            pages = stats.total_pages,
            average_rate = stats.average_rate,
            performance = %stats.performance_grade(),
            stability = %stats.stability_grade(),
            "collection finished"
        );

        CollectionReport {
            movies: accumulator.into_records(),
            stats,
        }
    }

    /// Worker loop: claim the next page number until a stop condition holds.
    fn work(
        &self,
        accumulator: &MovieAccumulator,
        tally: &Tally,
        next_page: &AtomicU32,
        exhausted: &AtomicBool,
    ) {
        loop {
            if exhausted.load(Ordering::Acquire) || accumulator.len() >= self.config.target_movies {
                return;
            }
            let page = next_page.fetch_add(1, Ordering::Relaxed);
            if page > self.config.max_pages {
                return;
            }

            if let PageOutcome::Collected { last_page: true } = self.collect_page(page, accumulator, tally) {
                debug!(page, "listing reports no further pages");
                exhausted.store(true, Ordering::Release);
            }
        }
    }

    fn collect_page(&self, page: u32, accumulator: &MovieAccumulator, tally: &Tally) -> PageOutcome {
        if !self.limiter.acquire(Some(self.config.acquire_timeout)) {
            warn!(page, "rate limiter timed out, skipping page");
            Tally::bump(&tally.failed_requests, 1);
            return PageOutcome::Skipped;
        }

        let response = match self.source.fetch_page(page) {
            Ok(response) => response,
            Err(err) => {
                if err.is_throttled() {
                    self.limiter.set_rate_limited(err.retry_after());
                }
                error!(page, error = %err, "page fetch failed");
                Tally::bump(&tally.api_errors, 1);
                return PageOutcome::Skipped;
            }
        };

        match response.get("results") {
            None => {
                warn!(page, "response has no results");
                Tally::bump(&tally.api_errors, 1);
                return PageOutcome::Skipped;
            }
            // `null` is an empty page, the same as the parser reads it
            Some(results) if !(results.is_array() || results.is_null()) => {
                error!(page, "response results is not an array");
                Tally::bump(&tally.processing_errors, 1);
                return PageOutcome::Skipped;
            }
            Some(_) => {}
        }

        let (movies, pagination) = self.parser.parse_movie_list_response(&response);
        let parsed = movies.len() as u64;
        let valid = self.parser.filter_valid_movies(movies);
        let valid_count = valid.len() as u64;
        let new = accumulator.extend(valid);

        Tally::bump(&tally.pages, 1);
        Tally::bump(&tally.parsed, parsed);
        Tally::bump(&tally.valid, valid_count);

        info!(
            page,
            parsed,
            new,
            unique = accumulator.len(),
            "page collected"
        );
        PageOutcome::Collected {
            last_page: !pagination.has_next_page(),
        }
    }
}

impl<S: MovieSource> std::fmt::Debug for Collector<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collector")
            .field("limiter", &self.limiter)
            .field("config", &self.config)
            .finish()
    }
}
