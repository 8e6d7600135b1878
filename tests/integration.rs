use movie_intake::{
    CancelFlag, Collector, CollectorConfig, FetchError, MovieAccumulator, RateLimitConfig,
    RateLimiter, RateLimiterBuilder, ResponseParser, RunStore, Settings,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_admissions_bounded_in_any_window() {
    // Callers hammer the limiter far faster than 10/s for ~1.5s
    let rps = 10.0;
    let burst = 3;
    let limiter = Arc::new(
        RateLimiterBuilder::new()
            .requests_per_second(rps)
            .requests_per_minute(10_000)
            .requests_per_hour(100_000)
            .burst_allowance(burst)
            .build(),
    );
    let admitted = Arc::new(Mutex::new(Vec::new()));
    let mut handles = vec![];

    for _ in 0..4 {
        let limiter = limiter.clone();
        let admitted = admitted.clone();
        handles.push(thread::spawn(move || {
            let start = Instant::now();
            while start.elapsed() < Duration::from_millis(1500) {
                if limiter.acquire(Some(Duration::ZERO)) {
                    admitted.lock().unwrap().push(Instant::now());
                }
                thread::sleep(Duration::from_millis(2));
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let mut admitted = admitted.lock().unwrap().clone();
    admitted.sort();

    let window = Duration::from_secs(1);
    let bound = (window.as_secs_f64() * rps).ceil() as usize + burst as usize;
    for (i, start) in admitted.iter().enumerate() {
        let in_window = admitted[i..]
            .iter()
            .take_while(|t| t.duration_since(*start) < window)
            .count();
        assert!(in_window <= bound, "{in_window} admissions in 1s, bound {bound}");
    }
    assert_eq!(limiter.get_stats().total_requests as usize, admitted.len());
}

#[test]
fn test_cooldown_overrides_available_budget() {
    let limiter = RateLimiter::new(RateLimitConfig::default());
    assert!(limiter.can_make_request());

    let cooldown = Duration::from_millis(300);
    limiter.set_rate_limited(Some(cooldown));

    let start = Instant::now();
    while start.elapsed() + Duration::from_millis(50) < cooldown {
        assert!(!limiter.can_make_request());
        assert!(!limiter.acquire(Some(Duration::ZERO)));
        thread::sleep(Duration::from_millis(25));
    }

    thread::sleep(cooldown.saturating_sub(start.elapsed()) + Duration::from_millis(50));
    assert!(limiter.can_make_request());
    assert!(limiter.acquire(Some(Duration::ZERO)));
    assert!(!limiter.get_stats().is_rate_limited);
}

#[test]
fn test_acquire_waits_out_cooldown() {
    let limiter = RateLimiterBuilder::new()
        .poll_interval(Duration::from_millis(10))
        .build();
    limiter.set_rate_limited(Some(Duration::from_millis(150)));

    let start = Instant::now();
    assert!(limiter.acquire(Some(Duration::from_secs(2))));
    assert!(start.elapsed() >= Duration::from_millis(140));
}

#[test]
fn test_reset_restores_budgets_not_counters() {
    let limiter = RateLimiter::new(
        RateLimitConfig::new(0.5, 100, 1000).with_burst_allowance(3),
    );
    for _ in 0..3 {
        assert!(limiter.acquire(Some(Duration::ZERO)));
    }
    assert!(!limiter.acquire(Some(Duration::ZERO)));

    limiter.reset();

    let stats = limiter.get_stats();
    assert_eq!(stats.current_tokens, stats.max_tokens as f64);
    assert_eq!(stats.requests_last_minute, 0);
    assert_eq!(stats.requests_last_hour, 0);
    assert_eq!(stats.total_requests, 3);
    assert_eq!(stats.blocked_requests, 1);
}

#[test]
fn test_three_immediate_acquires_scenario() {
    let config = RateLimitConfig {
        requests_per_second: 2.0,
        burst_allowance: 2,
        ..Default::default()
    };
    let limiter = RateLimiter::new(config);

    assert!(limiter.acquire(Some(Duration::ZERO)));
    assert!(limiter.acquire(Some(Duration::ZERO)));
    assert!(!limiter.acquire(Some(Duration::ZERO)));
    assert_eq!(limiter.get_stats().blocked_requests, 1);
}

#[test]
fn test_cancel_unblocks_waiters() {
    let limiter = Arc::new(RateLimiter::new(
        RateLimitConfig::new(0.01, 100, 1000).with_burst_allowance(1),
    ));
    assert!(limiter.acquire(None));

    let cancel = CancelFlag::new();
    let waiters: Vec<_> = (0..3)
        .map(|_| {
            let limiter = limiter.clone();
            let cancel = cancel.clone();
            thread::spawn(move || limiter.acquire_with_cancel(None, &cancel))
        })
        .collect();

    thread::sleep(Duration::from_millis(120));
    cancel.cancel();
    for waiter in waiters {
        assert!(!waiter.join().unwrap());
    }
    assert_eq!(limiter.get_stats().blocked_requests, 3);
}

#[tokio::test]
async fn test_async_tasks_share_limiter() {
    let limiter = Arc::new(
        RateLimiterBuilder::new()
            .requests_per_second(0.01)
            .burst_allowance(5)
            .build(),
    );

    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let limiter = limiter.clone();
            tokio::spawn(async move { limiter.acquire_async(Some(Duration::from_millis(50))).await })
        })
        .collect();

    let mut granted = 0;
    for task in tasks {
        if task.await.unwrap() {
            granted += 1;
        }
    }
    assert_eq!(granted, 5);

    let stats = limiter.get_stats();
    assert_eq!(stats.total_requests, 5);
    assert_eq!(stats.blocked_requests, 5);
}

#[test]
fn test_empty_listing_keeps_envelope_total() {
    let parser = ResponseParser::new();
    let (movies, pagination) = parser.parse_movie_list_response(&json!({
        "page": 3,
        "total_pages": 12,
        "total_results": 233,
        "results": []
    }));
    assert!(movies.is_empty());
    assert_eq!(pagination.total_results, 233);
}

#[test]
fn test_parse_and_validate_are_separate_stages() {
    let parser = ResponseParser::new();
    let (movies, _) = parser.parse_movie_list_response(&json!({
        "results": [{ "id": 8, "title": "Too good", "vote_average": 11.0 }]
    }));

    // Structurally fine
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].vote_average, 11.0);

    // Semantically rejected
    assert!(!parser.validate_movie_data(&movies[0]));
    assert!(parser.filter_valid_movies(movies).is_empty());
}

#[test]
fn test_listing_item_scenario() {
    let parser = ResponseParser::new();
    let (movies, _) = parser.parse_movie_list_response(&json!({
        "results": [{ "id": 42, "title": "X", "vote_average": 7.5, "genre_ids": [1, 2] }]
    }));

    assert_eq!(movies[0].movie_id, 42);
    assert_eq!(movies[0].title, "X");
    assert_eq!(movies[0].genre_ids, vec![1, 2]);
    assert!(parser.validate_movie_data(&movies[0]));
}

#[test]
fn test_missing_id_scenario() {
    let parser = ResponseParser::new();
    let (movies, _) = parser.parse_movie_list_response(&json!({
        "results": [
            { "title": "Nameless", "vote_average": 5.0 },
            { "id": 1, "title": "Named" }
        ]
    }));

    assert_eq!(movies[0].movie_id, 0);
    assert!(!parser.validate_movie_data(&movies[0]));

    let valid = parser.filter_valid_movies(movies);
    assert_eq!(valid.len(), 1);
    assert!(valid.iter().all(|m| m.movie_id != 0));
}

#[test]
fn test_trending_weighting_scenario() {
    let trending = ResponseParser::new().extract_trending_data(&json!({
        "results": [
            { "id": 1, "title": "Hyped", "popularity": 100.0, "vote_average": 0.0, "vote_count": 0 },
            { "id": 2, "title": "Loved", "popularity": 10.0, "vote_average": 5.0, "vote_count": 200 }
        ]
    }));

    // 0.7 * 100 = 70 versus 0.7 * 10 + 0.3 * 1000 = 307
    let ranked: Vec<u64> = trending.trending_scores.iter().map(|e| e.movie_id).collect();
    assert_eq!(ranked, vec![2, 1]);
    assert_eq!(trending.trending_scores[0].trending_score, 307.0);
    assert_eq!(trending.trending_scores[1].trending_score, 70.0);
}

#[test]
fn test_same_movie_on_two_pages_kept_once() {
    let parser = ResponseParser::new();
    let accumulator = MovieAccumulator::new();

    let (page_one, _) = parser.parse_movie_list_response(&json!({
        "page": 1, "results": [{ "id": 5, "title": "Original" }, { "id": 6, "title": "Other" }]
    }));
    let (page_two, _) = parser.parse_movie_list_response(&json!({
        "page": 2, "results": [{ "id": 5, "title": "Retitled" }]
    }));

    accumulator.extend(parser.filter_valid_movies(page_one));
    accumulator.extend(parser.filter_valid_movies(page_two));

    let records = accumulator.into_records();
    let fives: Vec<_> = records.iter().filter(|m| m.movie_id == 5).collect();
    assert_eq!(fives.len(), 1);
    assert_eq!(fives[0].title, "Original");
}

#[test]
fn test_collect_and_save_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::from_toml_str(&format!(
        r#"
        [rate_limit]
        requests_per_second = 500.0
        requests_per_minute = 1000
        requests_per_hour = 10000
        burst_allowance = 50

        [collector]
        target_movies = 8
        max_pages = 10
        acquire_timeout = 1
        output_dir = "{}"
        collection_type = "popular"
        "#,
        dir.path().display().to_string().replace('\\', "/")
    ))
    .unwrap();

    let source = |page: u32| -> Result<Value, FetchError> {
        let base = u64::from(page) * 3;
        Ok(json!({
            "page": page,
            "total_pages": 10,
            "total_results": 30,
            "results": [
                { "id": base, "title": format!("Movie {base}"), "vote_average": 6.5 },
                { "id": base + 1, "title": format!("Movie {}", base + 1), "release_date": "2020-05-01" },
                { "id": base + 2, "title": "", "vote_average": 3.0 }
            ]
        }))
    };

    let limiter = Arc::new(settings.build_limiter().unwrap());
    let collector = Collector::new(limiter.clone(), source, settings.collector.clone()).unwrap();
    let report = collector.run();

    // Two valid movies per page, target 8 => four pages
    assert_eq!(report.stats.total_pages, 4);
    assert_eq!(report.stats.total_movies, 12);
    assert_eq!(report.stats.valid_movies, 8);
    assert_eq!(report.movies.len(), 8);
    assert_eq!(limiter.get_stats().total_requests, 4);

    let saved = RunStore::from_config(&settings.collector)
        .save(&report.movies, &report.stats)
        .unwrap();
    let document: Value =
        serde_json::from_str(&std::fs::read_to_string(&saved.movies_path).unwrap()).unwrap();
    assert_eq!(document["collection_info"]["total_movies"], 8);
    assert_eq!(document["collection_info"]["collection_type"], "popular");
    assert_eq!(document["movies"].as_array().unwrap().len(), 8);
    assert_eq!(document["movies"][1]["release_date"], "2020-05-01");
    assert!(saved.stats_path.exists());
}

#[test]
fn test_collector_config_defaults_match_bulk_run() {
    let config = CollectorConfig::default();
    assert_eq!(config.target_movies, 1000);
    assert_eq!(config.max_pages, 50);
    assert_eq!(config.acquire_timeout, Duration::from_secs(30));
    assert_eq!(config.collection_type, "bulk_collection");
}
