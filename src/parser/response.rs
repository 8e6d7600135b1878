//! Listing, detail and trending response handling.
//!
//! Nothing here fails outward. A bad listing item is skipped with a warning,
//! a bad envelope yields an empty result logged at error level.

use super::models::{MovieDetails, MovieRecord, PaginationInfo, RawMovieDetails, TrendingData, TrendingEntry};
use super::validation::{check_movie, MovieCandidate};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

/// Stateless parser for upstream movie API payloads.
///
/// Pure over its inputs, so one instance (or many) can be used from any
/// thread.
///
/// ```rust
/// use movie_intake::ResponseParser;
/// use serde_json::json;
///
/// let parser = ResponseParser::new();
/// let (movies, page) = parser.parse_movie_list_response(&json!({
///     "page": 1,
///     "total_pages": 4,
///     "total_results": 80,
///     "results": [
///         { "id": 1, "title": "Alien", "vote_average": 8.1 },
///         { "id": 2, "title": "Broken", "vote_average": 11.0 }
///     ]
/// }));
/// assert_eq!(movies.len(), 2);
/// assert_eq!(page.results_per_page, 2);
///
/// let valid = parser.filter_valid_movies(movies);
/// assert_eq!(valid.len(), 1);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseParser;

impl ResponseParser {
    pub fn new() -> Self {
        Self
    }

    /// Converts a listing response into records and paging info.
    ///
    /// Envelope fields default to page 1 of 1 with 0 results;
    /// `results_per_page` is the length of `results`. A non-object response
    /// gives `([], PaginationInfo::default())`.
    pub fn parse_movie_list_response(&self, raw: &Value) -> (Vec<MovieRecord>, PaginationInfo) {
        let Some(envelope) = raw.as_object() else {
            error!(kind = json_kind(raw), "movie list response is not a JSON object");
            return (Vec::new(), PaginationInfo::default());
        };

        let results: &[Value] = match envelope.get("results") {
            Some(Value::Array(items)) => items,
            None | Some(Value::Null) => &[],
            Some(other) => {
                error!(kind = json_kind(other), "movie list `results` is not an array");
                &[]
            }
        };

        let pagination = PaginationInfo {
            page: envelope_u32(envelope, "page", 1),
            total_pages: envelope_u32(envelope, "total_pages", 1),
            total_results: envelope
                .get("total_results")
                .and_then(Value::as_u64)
                .unwrap_or(0),
            results_per_page: results.len(),
        };

        let movies: Vec<MovieRecord> = results
            .iter()
            .filter_map(|item| match MovieRecord::from_tmdb(item) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(error = %err, item = %item, "skipping unparseable movie item");
                    None
                }
            })
            .collect();

        info!(
            movies = movies.len(),
            page = pagination.page,
            total_pages = pagination.total_pages,
            "parsed movie list"
        );
        (movies, pagination)
    }

    /// Flattens a detail response. `None` when it is not an object or a field
    /// has an unusable type.
    pub fn parse_movie_details_response(&self, raw: &Value) -> Option<MovieDetails> {
        if !raw.is_object() {
            error!(kind = json_kind(raw), "movie details response is not a JSON object");
            return None;
        }

        match RawMovieDetails::deserialize(raw) {
            Ok(details) => {
                let details = details.into_details(Utc::now());
                debug!(title = details.title.as_deref().unwrap_or(""), "parsed movie details");
                Some(details)
            }
            Err(err) => {
                error!(error = %err, "failed to parse movie details response");
                None
            }
        }
    }

    /// Applies the record validity rules, logging the first broken one.
    pub fn validate_movie_data<'a>(&self, candidate: impl Into<MovieCandidate<'a>>) -> bool {
        match check_movie(candidate) {
            Ok(()) => true,
            Err(issue) => {
                warn!(%issue, "movie rejected by validation");
                false
            }
        }
    }

    /// Keeps valid records, preserving order.
    pub fn filter_valid_movies(&self, movies: Vec<MovieRecord>) -> Vec<MovieRecord> {
        let total = movies.len();
        let valid: Vec<MovieRecord> = movies
            .into_iter()
            .filter(|movie| self.validate_movie_data(movie))
            .collect();
        info!(valid = valid.len(), total, "filtered movie records");
        valid
    }

    /// Parses a trending listing and ranks it by
    /// `0.7 × popularity + 0.3 × vote_average × vote_count`.
    ///
    /// Ties keep listing order.
    pub fn extract_trending_data(&self, raw: &Value) -> TrendingData {
        let (movies, pagination) = self.parse_movie_list_response(raw);

        let mut trending_scores: Vec<TrendingEntry> = movies.iter().map(TrendingEntry::score).collect();
        trending_scores.sort_by(|a, b| b.trending_score.total_cmp(&a.trending_score));

        TrendingData {
            extracted_at: Utc::now(),
            total_movies: movies.len(),
            pagination,
            movies,
            trending_scores,
        }
    }
}

/// Shape of a payload handed to [`parse_response`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    MovieList,
    MovieDetails,
    Trending,
}

/// Result of [`parse_response`], one variant per [`ResponseKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResponse {
    MovieList {
        movies: Vec<MovieRecord>,
        pagination: PaginationInfo,
    },
    MovieDetails(Option<MovieDetails>),
    Trending(TrendingData),
}

/// Dispatches to the matching [`ResponseParser`] operation.
///
/// ```rust
/// use movie_intake::{parse_response, ParsedResponse, ResponseKind};
/// use serde_json::json;
///
/// let parsed = parse_response(&json!({ "results": [] }), ResponseKind::MovieList);
/// assert!(matches!(parsed, ParsedResponse::MovieList { ref movies, .. } if movies.is_empty()));
/// ```
pub fn parse_response(raw: &Value, kind: ResponseKind) -> ParsedResponse {
    let parser = ResponseParser::new();
    match kind {
        ResponseKind::MovieList => {
            let (movies, pagination) = parser.parse_movie_list_response(raw);
            ParsedResponse::MovieList { movies, pagination }
        }
        ResponseKind::MovieDetails => {
            ParsedResponse::MovieDetails(parser.parse_movie_details_response(raw))
        }
        ResponseKind::Trending => ParsedResponse::Trending(parser.extract_trending_data(raw)),
    }
}

fn envelope_u32(envelope: &Map<String, Value>, key: &str, default: u32) -> u32 {
    envelope
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(default)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
