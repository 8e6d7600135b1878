//! Outcome counters of a collection run and their grading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Totals for one run, written next to the collected movies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionStats {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Wall-clock seconds between start and end.
    pub duration: f64,
    /// Pages fetched and parsed successfully.
    pub total_pages: u64,
    /// Records parsed from those pages, before validation and dedup.
    pub total_movies: u64,
    /// Records that passed validation.
    pub valid_movies: u64,
    pub unique_movies: u64,
    pub duplicate_movies: u64,
    /// Pages skipped because the limiter did not admit them in time.
    pub failed_requests: u64,
    /// Pages whose fetch failed or whose response had no `results`.
    pub api_errors: u64,
    /// Pages whose `results` could not be processed.
    pub processing_errors: u64,
    /// Unique movies per minute.
    pub average_rate: f64,
    pub target_movies: u64,
}

impl CollectionStats {
    pub fn total_errors(&self) -> u64 {
        self.failed_requests + self.api_errors + self.processing_errors
    }

    /// Errors per successful page. With no successful page it is 0 for an
    /// empty run and 1 otherwise.
    pub fn error_rate(&self) -> f64 {
        let errors = self.total_errors();
        match (self.total_pages, errors) {
            (0, 0) => 0.0,
            (0, _) => 1.0,
            (pages, errors) => errors as f64 / pages as f64,
        }
    }

    pub fn target_met(&self) -> bool {
        self.unique_movies >= self.target_movies
    }

    pub fn performance_grade(&self) -> PerformanceGrade {
        PerformanceGrade::from_rate(self.average_rate)
    }

    pub fn stability_grade(&self) -> StabilityGrade {
        StabilityGrade::from_error_rate(self.error_rate())
    }

    /// Multi-line report for logs and demos.
    pub fn summary(&self) -> String {
        format!(
            "Collection Stats:\n\
             ├─ Duration: {:.1}s ({:.1}min)\n\
             ├─ Pages: {}\n\
             ├─ Movies: {} parsed, {} valid, {} unique ({} duplicates)\n\
             ├─ Target: {}/{}{}\n\
             ├─ Errors: {} failed requests, {} api, {} processing\n\
             ├─ Average Rate: {:.1} movies/min ({})\n\
             └─ Stability: {} ({:.1}% errors)",
            self.duration,
            self.duration / 60.0,
            self.total_pages,
            self.total_movies,
            self.valid_movies,
            self.unique_movies,
            self.duplicate_movies,
            self.unique_movies,
            self.target_movies,
            if self.target_met() { " ✅" } else { "" },
            self.failed_requests,
            self.api_errors,
            self.processing_errors,
            self.average_rate,
            self.performance_grade(),
            self.stability_grade(),
            self.error_rate() * 100.0
        )
    }
}

impl fmt::Display for CollectionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

/// Throughput grade from unique movies per minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PerformanceGrade {
    NeedsImprovement,
    Fair,
    Good,
    Excellent,
}

impl PerformanceGrade {
    /// ≥ 50 excellent, ≥ 30 good, ≥ 15 fair.
    pub fn from_rate(per_minute: f64) -> Self {
        if per_minute >= 50.0 {
            Self::Excellent
        } else if per_minute >= 30.0 {
            Self::Good
        } else if per_minute >= 15.0 {
            Self::Fair
        } else {
            Self::NeedsImprovement
        }
    }
}

impl fmt::Display for PerformanceGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excellent => write!(f, "🟢 Excellent"),
            Self::Good => write!(f, "🟡 Good"),
            Self::Fair => write!(f, "🟠 Fair"),
            Self::NeedsImprovement => write!(f, "🔴 Needs improvement"),
        }
    }
}

/// Reliability grade from the error rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StabilityGrade {
    Unstable,
    Moderate,
    Stable,
    VeryStable,
}

impl StabilityGrade {
    /// ≤ 5% very stable, ≤ 10% stable, ≤ 20% moderate.
    pub fn from_error_rate(error_rate: f64) -> Self {
        if error_rate <= 0.05 {
            Self::VeryStable
        } else if error_rate <= 0.10 {
            Self::Stable
        } else if error_rate <= 0.20 {
            Self::Moderate
        } else {
            Self::Unstable
        }
    }
}

impl fmt::Display for StabilityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VeryStable => write!(f, "🟢 Very stable"),
            Self::Stable => write!(f, "🟡 Stable"),
            Self::Moderate => write!(f, "🟠 Moderate"),
            Self::Unstable => write!(f, "🔴 Unstable"),
        }
    }
}

/// Counters shared by collection workers.
#[derive(Debug, Default)]
pub(crate) struct Tally {
    pub(crate) pages: AtomicU64,
    pub(crate) parsed: AtomicU64,
    pub(crate) valid: AtomicU64,
    pub(crate) failed_requests: AtomicU64,
    pub(crate) api_errors: AtomicU64,
    pub(crate) processing_errors: AtomicU64,
}

impl Tally {
    #[inline]
    pub(crate) fn bump(counter: &AtomicU64, by: u64) {
        counter.fetch_add(by, Ordering::Relaxed);
    }

    pub(crate) fn finish(
        &self,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        unique_movies: u64,
        duplicate_movies: u64,
        target_movies: u64,
    ) -> CollectionStats {
        let duration = (end_time - start_time)
            .to_std()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        let average_rate = if duration > 0.0 {
            unique_movies as f64 / duration * 60.0
        } else {
            0.0
        };

        CollectionStats {
            start_time,
            end_time,
            duration,
            total_pages: self.pages.load(Ordering::Relaxed),
            total_movies: self.parsed.load(Ordering::Relaxed),
            valid_movies: self.valid.load(Ordering::Relaxed),
            unique_movies,
            duplicate_movies,
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            api_errors: self.api_errors.load(Ordering::Relaxed),
            processing_errors: self.processing_errors.load(Ordering::Relaxed),
            average_rate,
            target_movies,
        }
    }
}
