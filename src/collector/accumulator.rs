//! Deduplicating record accumulator.
//!
//! ```text
//!     insert(record):
//!
//!     movie_id seen? ──Yes──► duplicates += 1, keep the stored record
//!          │ No
//!          ▼
//!     store { seq: next, record }   seq fixes the first-seen order
//! ```
//!
//! Backed by a [`DashMap`] so workers collecting different pages can insert
//! concurrently without a global lock.

use crate::parser::MovieRecord;
use ahash::RandomState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

#[derive(Debug)]
struct Slot {
    seq: u64,
    record: MovieRecord,
}

/// Collects records keyed by `movie_id`; the first record seen for an id wins.
///
/// ```rust
/// use movie_intake::{MovieAccumulator, MovieRecord};
/// use serde_json::json;
///
/// let acc = MovieAccumulator::new();
/// let first = MovieRecord::from_tmdb(&json!({ "id": 7, "title": "First" })).unwrap();
/// let again = MovieRecord::from_tmdb(&json!({ "id": 7, "title": "Again" })).unwrap();
///
/// assert!(acc.insert(first));
/// assert!(!acc.insert(again));
///
/// let records = acc.into_records();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].title, "First");
/// ```
#[derive(Debug)]
pub struct MovieAccumulator {
    records: DashMap<u64, Slot, RandomState>,
    sequence: AtomicU64,
    duplicates: AtomicU64,
}

impl Default for MovieAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl MovieAccumulator {
    pub fn new() -> Self {
        Self {
            records: DashMap::with_hasher(RandomState::new()),
            sequence: AtomicU64::new(0),
            duplicates: AtomicU64::new(0),
        }
    }

    /// Stores `record` unless its id is already held. Returns `true` if it was new.
    pub fn insert(&self, record: MovieRecord) -> bool {
        match self.records.entry(record.movie_id) {
            Entry::Occupied(_) => {
                self.duplicates.fetch_add(1, Ordering::Relaxed);
                debug!(movie_id = record.movie_id, "duplicate movie ignored");
                false
            }
            Entry::Vacant(slot) => {
                let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
                slot.insert(Slot { seq, record });
                true
            }
        }
    }

    /// Inserts every record, returning how many were new.
    pub fn extend<I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = MovieRecord>,
    {
        records
            .into_iter()
            .map(|record| self.insert(record))
            .filter(|new| *new)
            .count()
    }

    /// Unique records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, movie_id: u64) -> bool {
        self.records.contains_key(&movie_id)
    }

    /// Inserts rejected because the id was already held.
    pub fn duplicates(&self) -> u64 {
        self.duplicates.load(Ordering::Relaxed)
    }

    /// Copies the records out in first-seen order.
    pub fn snapshot(&self) -> Vec<MovieRecord> {
        let mut slots: Vec<(u64, MovieRecord)> = self
            .records
            .iter()
            .map(|entry| (entry.seq, entry.record.clone()))
            .collect();
        slots.sort_unstable_by_key(|(seq, _)| *seq);
        slots.into_iter().map(|(_, record)| record).collect()
    }

    /// Consumes the accumulator, returning records in first-seen order.
    pub fn into_records(self) -> Vec<MovieRecord> {
        let mut slots: Vec<Slot> = self.records.into_iter().map(|(_, slot)| slot).collect();
        slots.sort_unstable_by_key(|slot| slot.seq);
        slots.into_iter().map(|slot| slot.record).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;

    fn movie(id: u64, title: &str) -> MovieRecord {
        MovieRecord::from_tmdb(&json!({ "id": id, "title": title })).unwrap()
    }

    #[test]
    fn test_first_seen_wins() {
        let acc = MovieAccumulator::new();
        assert!(acc.insert(movie(1, "page one")));
        assert!(acc.insert(movie(2, "page one")));
        assert!(!acc.insert(movie(1, "page two")));

        assert_eq!(acc.len(), 2);
        assert_eq!(acc.duplicates(), 1);
        assert!(acc.contains(1));
        assert!(!acc.contains(3));

        let records = acc.into_records();
        assert_eq!(records[0].movie_id, 1);
        assert_eq!(records[0].title, "page one");
    }

    #[test]
    fn test_order_is_first_seen() {
        let acc = MovieAccumulator::new();
        let new = acc.extend([movie(30, "c"), movie(10, "a"), movie(20, "b"), movie(10, "dup")]);
        assert_eq!(new, 3);

        let ids: Vec<u64> = acc.snapshot().iter().map(|m| m.movie_id).collect();
        assert_eq!(ids, vec![30, 10, 20]);
        // Snapshot leaves the contents in place
        assert_eq!(acc.len(), 3);
    }

    #[test]
    fn test_concurrent_inserts() {
        let acc = Arc::new(MovieAccumulator::new());
        let mut handles = vec![];

        for worker in 0..4u64 {
            let acc = acc.clone();
            handles.push(thread::spawn(move || {
                // Every worker sees ids 0..100; only one copy of each survives
                (0..100u64)
                    .filter(|id| acc.insert(movie(*id, &format!("worker {worker}"))))
                    .count()
            }));
        }

        let inserted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(inserted, 100);
        assert_eq!(acc.len(), 100);
        assert_eq!(acc.duplicates(), 300);
    }

    #[test]
    fn test_empty() {
        let acc = MovieAccumulator::default();
        assert!(acc.is_empty());
        assert!(acc.snapshot().is_empty());
    }
}
