//! Run persistence.
//!
//! Each run produces two pretty-printed JSON files in the output directory:
//!
//! ```text
//!     data/raw/movies/
//!     ├── bulk_collection_20240105_142233.json    { collection_info, movies }
//!     └── collection_stats_20240105_142233.json   CollectionStats
//! ```

use super::stats::CollectionStats;
use crate::error::StoreError;
use crate::parser::MovieRecord;
use crate::settings::CollectorConfig;
use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Timestamp format shared by both file names of a run.
pub const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Writes any serializable value as pretty JSON, creating parent directories.
///
/// ```rust
/// use movie_intake::save_parsed_data;
/// use serde_json::json;
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("nested/trending.json");
/// save_parsed_data(&json!({ "total_movies": 0 }), &path).unwrap();
/// assert!(path.exists());
/// ```
pub fn save_parsed_data<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, bytes).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), "saved data");
    Ok(())
}

/// Sidecar describing a saved run.
#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
pub struct CollectionInfo {
    pub timestamp: String,
    pub collection_type: String,
    pub total_movies: usize,
    /// Seconds.
    pub collection_duration: f64,
}

#[derive(Serialize)]
struct RunDocument<'a> {
    collection_info: CollectionInfo,
    movies: &'a [MovieRecord],
}

/// Paths written by [`RunStore::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedRun {
    pub timestamp: String,
    pub movies_path: PathBuf,
    pub stats_path: PathBuf,
}

/// Directory of collection runs.
#[derive(Debug, Clone)]
pub struct RunStore {
    output_dir: PathBuf,
    collection_type: String,
}

impl RunStore {
    pub fn new(output_dir: impl Into<PathBuf>, collection_type: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            collection_type: collection_type.into(),
        }
    }

    /// Store matching a collector's `output_dir` and `collection_type`.
    pub fn from_config(config: &CollectorConfig) -> Self {
        Self::new(&config.output_dir, &config.collection_type)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Saves a run stamped with the current local time.
    pub fn save(&self, movies: &[MovieRecord], stats: &CollectionStats) -> Result<SavedRun, StoreError> {
        let timestamp = Local::now().format(RUN_TIMESTAMP_FORMAT).to_string();
        self.save_as(&timestamp, movies, stats)
    }

    /// Saves a run under an explicit timestamp. An existing run with the same
    /// timestamp is overwritten.
    pub fn save_as(
        &self,
        timestamp: &str,
        movies: &[MovieRecord],
        stats: &CollectionStats,
    ) -> Result<SavedRun, StoreError> {
        let movies_path = self
            .output_dir
            .join(format!("{}_{}.json", self.collection_type, timestamp));
        let stats_path = self
            .output_dir
            .join(format!("collection_stats_{}.json", timestamp));

        let document = RunDocument {
            collection_info: CollectionInfo {
                timestamp: timestamp.to_string(),
                collection_type: self.collection_type.clone(),
                total_movies: movies.len(),
                collection_duration: stats.duration,
            },
            movies,
        };
        save_parsed_data(&document, &movies_path)?;
        save_parsed_data(stats, &stats_path)?;

        info!(
            movies = %movies_path.display(),
            stats = %stats_path.display(),
            "collection run saved"
        );
        Ok(SavedRun {
            timestamp: timestamp.to_string(),
            movies_path,
            stats_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::{json, Value};

    fn stats() -> CollectionStats {
        let now = Utc::now();
        CollectionStats {
            start_time: now,
            end_time: now,
            duration: 12.5,
            total_pages: 1,
            total_movies: 1,
            valid_movies: 1,
            unique_movies: 1,
            duplicate_movies: 0,
            failed_requests: 0,
            api_errors: 0,
            processing_errors: 0,
            average_rate: 4.8,
            target_movies: 1,
        }
    }

    #[test]
    fn test_save_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = RunStore::new(dir.path().join("runs"), "popular");
        let movie = MovieRecord::from_tmdb(&json!({ "id": 1, "title": "One", "release_date": "2001-01-01" })).unwrap();

        let saved = store.save_as("20240105_142233", &[movie], &stats()).unwrap();
        assert_eq!(
            saved.movies_path,
            dir.path().join("runs/popular_20240105_142233.json")
        );
        assert_eq!(
            saved.stats_path,
            dir.path().join("runs/collection_stats_20240105_142233.json")
        );

        let document: Value = serde_json::from_slice(&fs::read(&saved.movies_path).unwrap()).unwrap();
        assert_eq!(document["collection_info"]["total_movies"], 1);
        assert_eq!(document["collection_info"]["collection_duration"], 12.5);
        assert_eq!(document["movies"][0]["release_date"], "2001-01-01");

        let saved_stats: CollectionStats =
            serde_json::from_slice(&fs::read(&saved.stats_path).unwrap()).unwrap();
        assert_eq!(saved_stats, stats_with_same_times(&saved_stats));
    }

    fn stats_with_same_times(saved: &CollectionStats) -> CollectionStats {
        CollectionStats {
            start_time: saved.start_time,
            end_time: saved.end_time,
            ..stats()
        }
    }

    #[test]
    fn test_timestamped_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = RunStore::from_config(
            &CollectorConfig::default().with_output_dir(dir.path()),
        );
        let saved = store.save(&[], &stats()).unwrap();

        assert_eq!(saved.timestamp.len(), "20240105_142233".len());
        let name = saved.movies_path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("bulk_collection_"));
        assert!(saved.stats_path.exists());
    }

    #[test]
    fn test_save_parsed_data_reports_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();

        // Parent "directory" is a regular file
        let err = save_parsed_data(&json!({}), &blocker.join("out.json")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
