//! Benchmarks for keyword clustering and trend analysis

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kwscope::clustering::ClusteringEngine;
use kwscope::models::{KeywordRecord, SearchIntent};
use kwscope::trend::{TrendAnalyzer, TrendDataPoint};

const HEADS: [&str; 8] = [
    "running shoes",
    "sourdough bread",
    "seo tools",
    "coffee grinder",
    "yoga mat",
    "standing desk",
    "travel insurance",
    "python course",
];
const MODIFIERS: [&str; 8] = [
    "best", "cheap", "buy", "how to choose", "review", "for beginners", "near me", "vs",
];

fn generate_keywords(n: usize) -> Vec<KeywordRecord> {
    let intents = SearchIntent::all();
    (0..n)
        .map(|i| {
            let head = HEADS[i % HEADS.len()];
            let modifier = MODIFIERS[(i / HEADS.len()) % MODIFIERS.len()];
            let text = format!("{modifier} {head} {}", i / (HEADS.len() * MODIFIERS.len()));
            KeywordRecord::new(text, 100 + (i as u64 * 37) % 20_000, intents[i % intents.len()])
        })
        .collect()
}

fn generate_series(days: usize) -> Vec<TrendDataPoint> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid date");
    (0..days)
        .map(|i| {
            let t = i as f64;
            let volume = 1000.0 + t * 0.8 + 200.0 * (t * 0.0172).sin() + 30.0 * (t * 0.9).cos();
            TrendDataPoint::new(start + Duration::days(i as i64), volume, 50.0)
        })
        .collect()
}

fn bench_clustering(c: &mut Criterion) {
    let engine = ClusteringEngine::default();
    let mut group = c.benchmark_group("Clustering");
    group.sample_size(20);

    for size in [50, 100, 200] {
        let keywords = generate_keywords(size);
        group.bench_with_input(BenchmarkId::new("cluster", size), &keywords, |b, keywords| {
            b.iter(|| engine.cluster(black_box(keywords)));
        });
    }

    group.finish();
}

fn bench_trend(c: &mut Criterion) {
    let analyzer = TrendAnalyzer::default();
    let mut group = c.benchmark_group("Trend");

    for days in [90, 365, 730] {
        let series = generate_series(days);
        group.bench_with_input(BenchmarkId::new("analyze", days), &series, |b, series| {
            b.iter(|| analyzer.analyze("bench", black_box(series)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_clustering, bench_trend);
criterion_main!(benches);
