//! # Rate Limiter Benchmarks
//!
//! Cost of admission checks, acquisitions and stats snapshots.
//!
//! Run with: `cargo bench --bench rate_limiter`

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use movie_intake::{RateLimitConfig, RateLimiter};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Budgets large enough that a benchmark batch never runs dry.
fn roomy_config(burst: u32) -> RateLimitConfig {
    RateLimitConfig::new(1_000_000.0, u32::MAX, u32::MAX).with_burst_allowance(burst)
}

/// Benchmark the non-consuming check
fn bench_can_make_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("can_make_request");
    group.throughput(Throughput::Elements(1));

    group.bench_function("idle", |b| {
        let limiter = RateLimiter::new(roomy_config(100));
        b.iter(|| std::hint::black_box(limiter.can_make_request()));
    });

    group.bench_function("cooling_down", |b| {
        let limiter = RateLimiter::new(roomy_config(100));
        limiter.set_rate_limited(Some(Duration::from_secs(3600)));
        b.iter(|| std::hint::black_box(limiter.can_make_request()));
    });

    group.finish();
}

/// Benchmark immediate acquisition with windows of different fill levels
fn bench_acquire(c: &mut Criterion) {
    let mut group = c.benchmark_group("acquire_immediate");

    for batch in [100usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(batch as u64));
        group.bench_with_input(BenchmarkId::from_parameter(batch), &batch, |b, &batch| {
            b.iter_batched(
                || RateLimiter::new(roomy_config(batch as u32)),
                |limiter| {
                    for _ in 0..batch {
                        std::hint::black_box(limiter.acquire(Some(Duration::ZERO)));
                    }
                    limiter
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark rejection on an exhausted bucket
fn bench_rejection(c: &mut Criterion) {
    let mut group = c.benchmark_group("rejection");

    group.bench_function("no_tokens", |b| {
        let limiter = RateLimiter::new(RateLimitConfig::new(0.001, u32::MAX, u32::MAX).with_burst_allowance(1));
        limiter.acquire(Some(Duration::ZERO));
        b.iter(|| std::hint::black_box(limiter.acquire(Some(Duration::ZERO))));
    });

    group.finish();
}

/// Benchmark concurrent acquisition through the shared lock
fn bench_concurrent_acquire(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_acquire");

    for num_threads in [2, 4, 8] {
        group.throughput(Throughput::Elements(num_threads as u64 * 1000));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_threads", num_threads)),
            &num_threads,
            |b, &num_threads| {
                b.iter_custom(|iters| {
                    let mut total_duration = Duration::ZERO;

                    for _ in 0..iters {
                        let limiter = Arc::new(RateLimiter::new(roomy_config(num_threads * 1000)));
                        let start = std::time::Instant::now();

                        let handles: Vec<_> = (0..num_threads)
                            .map(|_| {
                                let limiter = limiter.clone();
                                thread::spawn(move || {
                                    for _ in 0..1000 {
                                        limiter.acquire(Some(Duration::ZERO));
                                    }
                                })
                            })
                            .collect();

                        for handle in handles {
                            handle.join().unwrap();
                        }

                        total_duration += start.elapsed();
                    }

                    total_duration
                });
            },
        );
    }

    group.finish();
}

/// Benchmark stats snapshots with a populated hour window
fn bench_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("stats");

    group.bench_function("get_stats_1000_recorded", |b| {
        let limiter = RateLimiter::new(roomy_config(1000));
        for _ in 0..1000 {
            limiter.acquire(Some(Duration::ZERO));
        }
        b.iter(|| std::hint::black_box(limiter.get_stats()));
    });

    group.bench_function("summary", |b| {
        let stats = RateLimiter::new(roomy_config(10)).get_stats();
        b.iter(|| std::hint::black_box(stats.summary()));
    });

    group.finish();
}

fn bench_reset(c: &mut Criterion) {
    let mut group = c.benchmark_group("reset");

    group.bench_function("reset_limiter", |b| {
        let limiter = RateLimiter::new(roomy_config(500));
        for _ in 0..500 {
            limiter.acquire(Some(Duration::ZERO));
        }

        b.iter(|| {
            limiter.reset();
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_can_make_request,
    bench_acquire,
    bench_rejection,
    bench_concurrent_acquire,
    bench_stats,
    bench_reset,
);

criterion_main!(benches);
