//! Semantic checks for collected records.
//!
//! Kept apart from conversion: a record can be representable (it parsed) and
//! still be unacceptable (it fails here).

use super::models::MovieRecord;
use serde_json::{Map, Value};
use thiserror::Error;

/// Highest rating the upstream API hands out.
pub const MAX_VOTE_AVERAGE: f64 = 10.0;

/// Input accepted by validation: a typed record or a raw JSON mapping.
#[derive(Debug, Clone, Copy)]
pub enum MovieCandidate<'a> {
    Record(&'a MovieRecord),
    Mapping(&'a Map<String, Value>),
    /// A JSON value that is not an object; always invalid.
    Other(&'a Value),
}

impl<'a> From<&'a MovieRecord> for MovieCandidate<'a> {
    fn from(record: &'a MovieRecord) -> Self {
        Self::Record(record)
    }
}

impl<'a> From<&'a Map<String, Value>> for MovieCandidate<'a> {
    fn from(map: &'a Map<String, Value>) -> Self {
        Self::Mapping(map)
    }
}

impl<'a> From<&'a Value> for MovieCandidate<'a> {
    fn from(value: &'a Value) -> Self {
        match value.as_object() {
            Some(map) => Self::Mapping(map),
            None => Self::Other(value),
        }
    }
}

/// First rule a candidate broke.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    #[error("candidate is not a JSON object")]
    NotAnObject,

    #[error("movie_id is missing or not an integer")]
    MissingId,

    #[error("movie_id must be positive, got {0}")]
    NonPositiveId(i64),

    #[error("title is missing, not a string or blank")]
    BlankTitle,

    #[error("vote_average is not a number")]
    NonNumericRating,

    #[error("vote_average {0} is outside [0, 10]")]
    RatingOutOfRange(f64),
}

/// Checks `movie_id > 0`, a non-blank title and `vote_average` within [0, 10].
///
/// Mappings must carry an integer `movie_id` and a string `title`;
/// `vote_average` defaults to 0 when absent.
pub fn check_movie<'a>(candidate: impl Into<MovieCandidate<'a>>) -> Result<(), ValidationIssue> {
    match candidate.into() {
        MovieCandidate::Record(record) => {
            if record.movie_id == 0 {
                return Err(ValidationIssue::NonPositiveId(0));
            }
            check_title(Some(&record.title))?;
            check_rating(record.vote_average)
        }
        MovieCandidate::Mapping(map) => {
            let id = map.get("movie_id").ok_or(ValidationIssue::MissingId)?;
            match (id.as_u64(), id.as_i64()) {
                (Some(id), _) if id > 0 => {}
                (_, Some(id)) => return Err(ValidationIssue::NonPositiveId(id)),
                _ => return Err(ValidationIssue::MissingId),
            }

            check_title(map.get("title").and_then(Value::as_str))?;

            let rating = match map.get("vote_average") {
                None | Some(Value::Null) => 0.0,
                Some(value) => value.as_f64().ok_or(ValidationIssue::NonNumericRating)?,
            };
            check_rating(rating)
        }
        MovieCandidate::Other(_) => Err(ValidationIssue::NotAnObject),
    }
}

fn check_title(title: Option<&str>) -> Result<(), ValidationIssue> {
    match title {
        Some(title) if !title.trim().is_empty() => Ok(()),
        _ => Err(ValidationIssue::BlankTitle),
    }
}

fn check_rating(rating: f64) -> Result<(), ValidationIssue> {
    if (0.0..=MAX_VOTE_AVERAGE).contains(&rating) {
        Ok(())
    } else {
        Err(ValidationIssue::RatingOutOfRange(rating))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: u64, title: &str, rating: f64) -> MovieRecord {
        let mut record = MovieRecord::from_tmdb(&json!({ "id": id, "title": title })).unwrap();
        record.vote_average = rating;
        record
    }

    #[test]
    fn test_record_rules() {
        assert_eq!(check_movie(&record(42, "X", 7.5)), Ok(()));
        assert_eq!(check_movie(&record(1, "Edge", 0.0)), Ok(()));
        assert_eq!(check_movie(&record(1, "Edge", 10.0)), Ok(()));

        assert_eq!(
            check_movie(&record(0, "X", 5.0)),
            Err(ValidationIssue::NonPositiveId(0))
        );
        assert_eq!(check_movie(&record(1, "   ", 5.0)), Err(ValidationIssue::BlankTitle));
        assert_eq!(
            check_movie(&record(1, "X", 11.0)),
            Err(ValidationIssue::RatingOutOfRange(11.0))
        );
        assert!(check_movie(&record(1, "X", -0.5)).is_err());
        assert!(check_movie(&record(1, "X", f64::NAN)).is_err());
    }

    #[test]
    fn test_mapping_rules() {
        let ok = json!({ "movie_id": 3, "title": "Heat" });
        assert_eq!(check_movie(&ok), Ok(()));

        let cases = [
            (json!({ "title": "Heat" }), ValidationIssue::MissingId),
            (json!({ "movie_id": "3", "title": "Heat" }), ValidationIssue::MissingId),
            (json!({ "movie_id": 3.0, "title": "Heat" }), ValidationIssue::MissingId),
            (json!({ "movie_id": -3, "title": "Heat" }), ValidationIssue::NonPositiveId(-3)),
            (json!({ "movie_id": 3, "title": 7 }), ValidationIssue::BlankTitle),
            (
                json!({ "movie_id": 3, "title": "Heat", "vote_average": "9" }),
                ValidationIssue::NonNumericRating,
            ),
            (
                json!({ "movie_id": 3, "title": "Heat", "vote_average": 10.5 }),
                ValidationIssue::RatingOutOfRange(10.5),
            ),
        ];
        for (candidate, expected) in cases {
            assert_eq!(check_movie(&candidate), Err(expected), "{candidate}");
        }

        assert_eq!(check_movie(&json!("nope")), Err(ValidationIssue::NotAnObject));
    }
}
