//! Basic usage example for the movie-intake crate.

use movie_intake::{RateLimitConfig, RateLimiter, RateLimiterBuilder, ResponseParser};
use serde_json::json;
use std::thread;
use std::time::Duration;

fn main() {
    println!("=== Basic Movie Intake Example ===\n");

    // Example 1: Immediate admission checks
    simple_example();

    println!("{}", "\n".to_owned() + "=".repeat(50).as_str() + "\n");

    // Example 2: Builder and tiered budgets
    custom_config_example();

    println!("{}", "\n".to_owned() + "=".repeat(50).as_str() + "\n");

    // Example 3: Server-imposed cooldown
    cooldown_example();

    println!("{}", "\n".to_owned() + "=".repeat(50).as_str() + "\n");

    // Example 4: Stats and health
    metrics_example();

    println!("{}", "\n".to_owned() + "=".repeat(50).as_str() + "\n");

    // Example 5: Parsing a listing page
    parser_example();
}

fn simple_example() {
    println!("1. Immediate Admission:");

    // Default budgets with room for a burst of 5
    let limiter = RateLimiter::new(RateLimitConfig::default().with_burst_allowance(5));

    println!("   Created limiter: 4 req/s, 200 req/min, 10000 req/h, burst 5");

    let mut successful = 0;
    let mut failed = 0;

    for i in 1..=8 {
        if limiter.acquire(Some(Duration::ZERO)) {
            successful += 1;
            println!("   Request {} - ✅ Allowed", i);
        } else {
            failed += 1;
            println!("   Request {} - ❌ Rate limited", i);
        }
    }

    println!(
        "   Results: {} successful, {} rate limited",
        successful, failed
    );
}

fn custom_config_example() {
    println!("2. Builder Configuration:");

    let limiter = RateLimiterBuilder::new()
        .requests_per_second(20.0)
        .requests_per_minute(30)
        .requests_per_hour(500)
        .burst_allowance(40)
        .poll_interval(Duration::from_millis(20))
        .build();

    println!("   Configuration: 20 req/s, 30 req/min, 500 req/h, burst 40");
    println!(
        "   Sustained rate: {:.2} req/s",
        limiter.config().sustained_rate_per_second()
    );

    // The minute window binds before the bucket runs dry
    let mut admitted = 0;
    while limiter.acquire(Some(Duration::ZERO)) {
        admitted += 1;
    }

    println!("   Admitted before the minute window closed: {}", admitted);
}

fn cooldown_example() {
    println!("3. Cooldown After a 429:");

    let limiter = RateLimiterBuilder::new()
        .poll_interval(Duration::from_millis(25))
        .build();

    limiter.set_rate_limited(Some(Duration::from_millis(300)));
    println!(
        "   Cooling down, remaining: {:?}",
        limiter.cooldown_remaining()
    );

    if !limiter.can_make_request() {
        println!("   ❌ Requests refused while cooling down");
    }

    println!("   Waiting for the cooldown to expire...");
    limiter.wait_for_reset();

    if limiter.acquire(Some(Duration::from_millis(100))) {
        println!("   ✅ Request admitted after the cooldown");
    }

    // A long cooldown can still be cut short
    limiter.set_rate_limited(None);
    thread::sleep(Duration::from_millis(10));
    limiter.reset();
    println!("   Reset cleared the cooldown: {}", limiter.can_make_request());
}

fn metrics_example() {
    println!("4. Monitoring and Stats:");

    let limiter = RateLimiter::new(RateLimitConfig::new(1.0, 60, 3600).with_burst_allowance(5));

    // Generate some traffic
    for _ in 0..8 {
        limiter.acquire(Some(Duration::ZERO));
    }

    let stats = limiter.get_stats();

    println!("   Limiter Stats:");
    println!("   - Total requests: {}", stats.total_requests);
    println!("   - Blocked requests: {}", stats.blocked_requests);
    println!("   - Success rate: {:.2}%", stats.success_rate * 100.0);
    println!(
        "   - Available tokens: {:.2}/{}",
        stats.current_tokens, stats.max_tokens
    );
    println!("   - Requests last minute: {}", stats.requests_last_minute);

    let health = stats.health_status();
    println!("   - Health status: {}", health);
    println!("   - Suggested action: {}", health.suggested_action());
    println!("\n   {}", stats.summary());
}

fn parser_example() {
    println!("5. Parsing a Listing Page:");

    let parser = ResponseParser::new();
    let raw = json!({
        "page": 1,
        "total_pages": 3,
        "total_results": 52,
        "results": [
            { "id": 42, "title": "X", "vote_average": 7.5, "genre_ids": [1, 2], "popularity": 31.2 },
            { "title": "Missing id", "vote_average": 6.0 },
            { "id": 7, "title": "Overrated", "vote_average": 11.0 }
        ]
    });

    let (movies, pagination) = parser.parse_movie_list_response(&raw);
    println!(
        "   Parsed {} movies, page {}/{}",
        movies.len(),
        pagination.page,
        pagination.total_pages
    );

    let valid = parser.filter_valid_movies(movies);
    for movie in &valid {
        println!("   ✅ {} ({}) rated {}", movie.title, movie.movie_id, movie.vote_average);
    }

    let trending = parser.extract_trending_data(&raw);
    if let Some(top) = trending.trending_scores.first() {
        println!("   Top trending: {} with score {}", top.title, top.trending_score);
    }
}
