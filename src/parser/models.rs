//! # Typed Records
//!
//! Structures produced from upstream payloads. Listing items become
//! [`MovieRecord`]s through a lenient field-by-field conversion; detail payloads
//! are deserialized with serde into [`MovieDetails`].
//!
//! ```text
//!     Listing item conversion:
//!
//!     field absent / null ──► default (0, false, "", None)
//!     number or numeric string ──► number
//!     unparseable release_date ──► None
//!     anything else ──► ParseError (item skipped by the caller)
//! ```

use crate::error::ParseError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Origin tag written into every record.
pub const SOURCE_TMDB: &str = "tmdb_api";

/// Format of `release_date` in upstream payloads.
const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// One movie from a listing response.
///
/// `movie_id` is 0 when the payload had no `id`; such records convert fine
/// and are rejected later by validation. `genre_ids` are passed through as
/// received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub movie_id: u64,
    pub title: String,
    pub original_title: String,
    pub overview: String,
    /// Serialized as `YYYY-MM-DD`.
    pub release_date: Option<NaiveDate>,
    pub popularity: f64,
    pub vote_average: f64,
    pub vote_count: u64,
    pub genre_ids: Vec<i64>,
    pub adult: bool,
    pub original_language: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub video: bool,
    /// Stamped when the record is built. Serialized as RFC 3339.
    pub collected_at: DateTime<Utc>,
    pub source: String,
}

impl MovieRecord {
    /// Builds a record from one element of a listing's `results` array.
    ///
    /// ```rust
    /// use movie_intake::MovieRecord;
    /// use serde_json::json;
    ///
    /// let record = MovieRecord::from_tmdb(&json!({
    ///     "id": 42, "title": "X", "vote_average": 7.5, "genre_ids": [1, 2]
    /// })).unwrap();
    /// assert_eq!(record.movie_id, 42);
    /// assert_eq!(record.genre_ids, vec![1, 2]);
    /// assert_eq!(record.release_date, None);
    /// ```
    pub fn from_tmdb(item: &Value) -> Result<Self, ParseError> {
        let obj = item.as_object().ok_or(ParseError::NotAnObject {
            context: "listing item",
        })?;

        Ok(Self {
            movie_id: u64_field(obj, "id")?,
            title: string_field(obj, "title")?,
            original_title: string_field(obj, "original_title")?,
            overview: string_field(obj, "overview")?,
            release_date: date_field(obj, "release_date"),
            popularity: f64_field(obj, "popularity")?,
            vote_average: f64_field(obj, "vote_average")?,
            vote_count: u64_field(obj, "vote_count")?,
            genre_ids: int_list_field(obj, "genre_ids")?,
            adult: bool_field(obj, "adult")?,
            original_language: string_field(obj, "original_language")?,
            poster_path: opt_string_field(obj, "poster_path")?,
            backdrop_path: opt_string_field(obj, "backdrop_path")?,
            video: bool_field(obj, "video")?,
            collected_at: Utc::now(),
            source: SOURCE_TMDB.to_string(),
        })
    }
}

/// Present and not null.
fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|value| !value.is_null())
}

fn f64_field(obj: &Map<String, Value>, key: &'static str) -> Result<f64, ParseError> {
    match present(obj, key) {
        None => Ok(0.0),
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| ParseError::invalid(key, "a number")),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ParseError::invalid(key, "a number")),
        Some(_) => Err(ParseError::invalid(key, "a number")),
    }
}

fn u64_field(obj: &Map<String, Value>, key: &'static str) -> Result<u64, ParseError> {
    const EXPECTED: &str = "a non-negative integer";
    match present(obj, key) {
        None => Ok(0),
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            })
            .ok_or_else(|| ParseError::invalid(key, EXPECTED)),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| ParseError::invalid(key, EXPECTED)),
        Some(_) => Err(ParseError::invalid(key, EXPECTED)),
    }
}

fn string_field(obj: &Map<String, Value>, key: &'static str) -> Result<String, ParseError> {
    Ok(opt_string_field(obj, key)?.unwrap_or_default())
}

fn opt_string_field(
    obj: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<String>, ParseError> {
    match present(obj, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ParseError::invalid(key, "a string")),
    }
}

fn bool_field(obj: &Map<String, Value>, key: &'static str) -> Result<bool, ParseError> {
    match present(obj, key) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::Number(n)) => Ok(n.as_f64().is_some_and(|f| f != 0.0)),
        Some(_) => Err(ParseError::invalid(key, "a boolean")),
    }
}

fn int_list_field(obj: &Map<String, Value>, key: &'static str) -> Result<Vec<i64>, ParseError> {
    match present(obj, key) {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_i64().ok_or_else(|| ParseError::invalid(key, "a list of integers")))
            .collect(),
        Some(_) => Err(ParseError::invalid(key, "a list of integers")),
    }
}

/// Bad or missing dates degrade to `None` rather than failing the item.
fn date_field(obj: &Map<String, Value>, key: &str) -> Option<NaiveDate> {
    present(obj, key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .and_then(|s| NaiveDate::parse_from_str(s, RELEASE_DATE_FORMAT).ok())
}

/// Paging envelope of a listing response.
///
/// ```rust
/// use movie_intake::PaginationInfo;
///
/// let page = PaginationInfo { page: 2, total_pages: 3, total_results: 60, results_per_page: 20 };
/// assert_eq!(page.next_page(), 3);
/// assert_eq!(page.prev_page(), 1);
///
/// let last = PaginationInfo { page: 3, ..page };
/// assert!(!last.has_next_page());
/// assert_eq!(last.next_page(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
    /// Length of the `results` array actually received.
    pub results_per_page: usize,
}

impl Default for PaginationInfo {
    fn default() -> Self {
        Self {
            page: 1,
            total_pages: 1,
            total_results: 0,
            results_per_page: 0,
        }
    }
}

impl PaginationInfo {
    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev_page(&self) -> bool {
        self.page > 1
    }

    /// The following page, or the current one on the last page.
    pub fn next_page(&self) -> u32 {
        if self.has_next_page() {
            self.page + 1
        } else {
            self.page
        }
    }

    /// The preceding page, or the current one on the first page.
    pub fn prev_page(&self) -> u32 {
        if self.has_prev_page() {
            self.page - 1
        } else {
            self.page
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: Option<u64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCountry {
    pub iso_3166_1: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCompany {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub logo_path: Option<String>,
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpokenLanguage {
    pub iso_639_1: Option<String>,
    pub name: Option<String>,
    pub english_name: Option<String>,
}

/// Flattened movie detail payload.
///
/// Scalars are copied as given (absent → `None`); `release_date` stays the raw
/// string the upstream sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    #[serde(alias = "id")]
    pub movie_id: Option<u64>,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    pub popularity: Option<f64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    pub adult: Option<bool>,
    pub original_language: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub homepage: Option<String>,
    pub imdb_id: Option<String>,
    pub status: Option<String>,
    pub budget: Option<u64>,
    pub revenue: Option<u64>,
    pub genres: Vec<Genre>,
    pub production_countries: Vec<ProductionCountry>,
    pub production_companies: Vec<ProductionCompany>,
    pub spoken_languages: Vec<SpokenLanguage>,
    pub collected_at: DateTime<Utc>,
}

/// Wire shape of a detail response. Every field is optional; nested lists
/// accept `null`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawMovieDetails {
    id: Option<u64>,
    title: Option<String>,
    original_title: Option<String>,
    overview: Option<String>,
    tagline: Option<String>,
    release_date: Option<String>,
    runtime: Option<u32>,
    popularity: Option<f64>,
    vote_average: Option<f64>,
    vote_count: Option<u64>,
    adult: Option<bool>,
    original_language: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    homepage: Option<String>,
    imdb_id: Option<String>,
    status: Option<String>,
    budget: Option<u64>,
    revenue: Option<u64>,
    genres: Option<Vec<Genre>>,
    production_countries: Option<Vec<ProductionCountry>>,
    production_companies: Option<Vec<ProductionCompany>>,
    spoken_languages: Option<Vec<SpokenLanguage>>,
}

impl RawMovieDetails {
    pub(crate) fn into_details(self, collected_at: DateTime<Utc>) -> MovieDetails {
        MovieDetails {
            movie_id: self.id,
            title: self.title,
            original_title: self.original_title,
            overview: self.overview,
            tagline: self.tagline,
            release_date: self.release_date,
            runtime: self.runtime,
            popularity: self.popularity,
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            adult: self.adult,
            original_language: self.original_language,
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            homepage: self.homepage,
            imdb_id: self.imdb_id,
            status: self.status,
            budget: self.budget,
            revenue: self.revenue,
            genres: self.genres.unwrap_or_default(),
            production_countries: self.production_countries.unwrap_or_default(),
            production_companies: self.production_companies.unwrap_or_default(),
            spoken_languages: self.spoken_languages.unwrap_or_default(),
            collected_at,
        }
    }
}

/// Ranking row produced by trending extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingEntry {
    pub movie_id: u64,
    pub title: String,
    /// `0.7 × popularity + 0.3 × vote_average × vote_count`, two decimals.
    pub trending_score: f64,
    pub popularity: f64,
    pub vote_average: f64,
    pub vote_count: u64,
}

impl TrendingEntry {
    pub const POPULARITY_WEIGHT: f64 = 0.7;
    pub const VOTE_WEIGHT: f64 = 0.3;

    pub(crate) fn score(record: &MovieRecord) -> Self {
        let raw = record.popularity * Self::POPULARITY_WEIGHT
            + record.vote_average * record.vote_count as f64 * Self::VOTE_WEIGHT;
        Self {
            movie_id: record.movie_id,
            title: record.title.clone(),
            trending_score: crate::rate_limiter::round2(raw),
            popularity: record.popularity,
            vote_average: record.vote_average,
            vote_count: record.vote_count,
        }
    }
}

/// Parsed trending listing with scores sorted highest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingData {
    pub extracted_at: DateTime<Utc>,
    pub total_movies: usize,
    pub pagination: PaginationInfo,
    pub movies: Vec<MovieRecord>,
    pub trending_scores: Vec<TrendingEntry>,
}
