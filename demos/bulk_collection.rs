//! Bulk collection against a simulated listing endpoint.
//!
//! Loads settings from `intake.toml` when present, otherwise uses defaults
//! pointed at a temporary directory.

use movie_intake::telemetry::init_tracing;
use movie_intake::{Collector, FetchError, RunStore, Settings};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

const TOTAL_PAGES: u32 = 12;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("movie_intake=info");

    println!("=== Bulk Collection Example ===\n");

    let scratch = tempfile::tempdir()?;
    let mut settings = match Settings::from_file("intake.toml") {
        Ok(settings) => settings,
        Err(_) => {
            let mut settings = Settings::default();
            settings.collector = settings
                .collector
                .with_output_dir(scratch.path())
                .with_target_movies(60)
                .with_workers(3);
            settings
        }
    };
    // Keep the demo quick regardless of the file's budgets
    settings.rate_limit.requests_per_second = settings.rate_limit.requests_per_second.max(50.0);
    settings.rate_limit.requests_per_minute = settings.rate_limit.requests_per_minute.max(3000);
    settings.rate_limit.burst_allowance = settings.rate_limit.burst_allowance.max(20);

    println!(
        "   Target: {} movies over at most {} pages with {} worker(s)",
        settings.collector.target_movies, settings.collector.max_pages, settings.collector.workers
    );

    // Throttles once so the cooldown path shows up in the logs
    let calls = AtomicU32::new(0);
    let source = move |page: u32| -> Result<Value, FetchError> {
        if calls.fetch_add(1, Ordering::Relaxed) == 3 {
            return Err(FetchError::Throttled {
                retry_after: Some(Duration::from_millis(200)),
            });
        }
        Ok(fake_page(page))
    };

    let limiter = Arc::new(settings.build_limiter()?);
    let collector = Collector::new(limiter.clone(), source, settings.collector.clone())?;
    let report = collector.run();

    println!("\n{}", report.stats);
    println!("{}", "=".repeat(50));
    println!("{}", limiter.get_stats());

    let saved = RunStore::from_config(&settings.collector).save(&report.movies, &report.stats)?;
    println!("\n   Movies written to {}", saved.movies_path.display());
    println!("   Stats written to {}", saved.stats_path.display());

    Ok(())
}

/// Eight movies per page; the last two overlap with the next page.
fn fake_page(page: u32) -> Value {
    let first = u64::from(page - 1) * 6 + 1;
    let results: Vec<Value> = (first..first + 8)
        .map(|id| {
            json!({
                "id": id,
                "title": if id % 13 == 0 { String::new() } else { format!("Movie {id}") },
                "release_date": format!("20{:02}-0{}-15", id % 24, id % 9 + 1),
                "popularity": (id % 50) as f64 * 1.7,
                "vote_average": (id % 10) as f64 + 0.5,
                "vote_count": id * 11,
                "genre_ids": [18, 28],
            })
        })
        .collect();

    json!({
        "page": page,
        "total_pages": TOTAL_PAGES,
        "total_results": u64::from(TOTAL_PAGES) * 8,
        "results": results,
    })
}
