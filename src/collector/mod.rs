//! # Collection Pipeline
//!
//! Drives a paged bulk collection: limiter admission, upstream fetch,
//! parsing, validation, dedup and persistence.
//!
//! ```text
//!     collector/
//!     ├── mod.rs          (Module organization)
//!     ├── accumulator.rs  (Concurrent first-seen dedup)
//!     ├── driver.rs       (MovieSource, Collector)
//!     ├── stats.rs        (CollectionStats and grades)
//!     └── store.rs        (Run files on disk)
//! ```

mod accumulator;
mod driver;
mod stats;
mod store;

pub use accumulator::MovieAccumulator;
pub use driver::{CollectionReport, Collector, MovieSource};
pub use stats::{CollectionStats, PerformanceGrade, StabilityGrade};
pub use store::{save_parsed_data, CollectionInfo, RunStore, SavedRun, RUN_TIMESTAMP_FORMAT};
