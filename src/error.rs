//! Error types for the collection pipeline.
//!
//! Routine data-quality problems never surface as errors: admission timeouts
//! are `false`, malformed items are skipped, malformed envelopes produce empty
//! results. The types here cover what is left over:
//!
//! - [`ConfigError`]: invalid limiter/collector settings, rejected at construction
//! - [`ParseError`]: why a single payload could not be represented (logged, then absorbed)
//! - [`FetchError`]: failures reported by the upstream collaborator
//! - [`StoreError`]: failures while writing collection runs to disk

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Invalid configuration values or an unreadable settings document.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `requests_per_second` must be finite and strictly positive.
    #[error("requests_per_second must be a positive finite number, got {0}")]
    InvalidRequestRate(f64),

    /// A tiered budget was configured as zero.
    #[error("{field} must be greater than 0")]
    ZeroBudget {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The token bucket needs room for at least one request.
    #[error("burst_allowance must be at least 1")]
    ZeroBurst,

    /// Polling interval for blocking admission must be non-zero.
    #[error("poll_interval must be greater than 0")]
    ZeroPollInterval,

    /// Collector settings that can never make progress.
    #[error("invalid collector setting: {message}")]
    Collector {
        /// Human readable description.
        message: String,
    },

    /// Settings file could not be read.
    #[error("failed to read settings from {path}: {source}")]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Settings document is not valid TOML for the expected shape.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    /// Create a collector configuration error.
    pub fn collector(message: impl Into<String>) -> Self {
        Self::Collector {
            message: message.into(),
        }
    }
}

/// Why a raw payload could not be turned into a typed value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The payload (or a nested element) was expected to be a JSON object.
    #[error("{context} is not a JSON object")]
    NotAnObject {
        /// What was being parsed.
        context: &'static str,
    },

    /// A field was present but had an unusable type or value.
    #[error("field `{field}` is invalid: expected {expected}")]
    InvalidField {
        /// Field name in the upstream payload.
        field: &'static str,
        /// Description of the accepted shape.
        expected: &'static str,
    },
}

impl ParseError {
    pub(crate) fn invalid(field: &'static str, expected: &'static str) -> Self {
        Self::InvalidField { field, expected }
    }
}

/// Failure reported by a [`MovieSource`](crate::MovieSource) while fetching a page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Upstream answered "too many requests" (HTTP 429).
    #[error("upstream throttled the request")]
    Throttled {
        /// Server-suggested wait, when the response carried one.
        retry_after: Option<Duration>,
    },

    /// Upstream answered with a non-success status.
    #[error("upstream returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The request never produced a response.
    #[error("transport failure: {message}")]
    Transport {
        /// Description from the HTTP client.
        message: String,
    },
}

impl FetchError {
    /// Returns `true` for throttling signals that should put the limiter into cooldown.
    pub fn is_throttled(&self) -> bool {
        matches!(self, Self::Throttled { .. } | Self::Status { status: 429 })
    }

    /// Server-provided cooldown hint, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Throttled { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Failure while persisting collected records.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Directory creation or file write failed.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Target path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Value could not be serialized to JSON.
    #[error("failed to serialize {path}: {source}")]
    Serialize {
        /// Target path.
        path: PathBuf,
        /// Underlying serializer error.
        #[source]
        source: serde_json::Error,
    },
}
