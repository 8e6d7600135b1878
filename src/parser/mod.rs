//! # Response Parser / Validator
//!
//! Turns already-deserialized upstream JSON into typed records.
//!
//! ```text
//!     parser/
//!     ├── mod.rs          (Module organization)
//!     ├── models.rs       (MovieRecord, PaginationInfo, MovieDetails, trending)
//!     ├── response.rs     (ResponseParser operations, parse_response)
//!     └── validation.rs   (Record validity rules)
//!
//!     raw listing ──► parse (structural) ──► filter (semantic) ──► caller
//! ```

mod models;
mod response;
mod validation;

pub use models::{
    Genre, MovieDetails, MovieRecord, PaginationInfo, ProductionCompany, ProductionCountry,
    SpokenLanguage, TrendingData, TrendingEntry, SOURCE_TMDB,
};
pub use response::{parse_response, ParsedResponse, ResponseKind, ResponseParser};
pub use validation::{check_movie, MovieCandidate, ValidationIssue, MAX_VOTE_AVERAGE};
