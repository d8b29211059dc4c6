//! Common test utilities
//!
//! Synthetic inputs are generated from seeded RNGs so every run sees the
//! same data.

#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use kwscope::models::{CompetitorMetrics, KeywordRecord, SearchIntent};
use kwscope::trend::TrendDataPoint;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG for fixtures
pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Daily points starting at `start`
pub fn daily_series(start: NaiveDate, values: &[f64]) -> Vec<TrendDataPoint> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| TrendDataPoint::new(start + Duration::days(i as i64), v, 50.0))
        .collect()
}

/// `volume = slope * t + intercept` with no noise
pub fn linear_series(days: usize, slope: f64, intercept: f64) -> Vec<TrendDataPoint> {
    let values: Vec<f64> = (0..days).map(|t| slope * t as f64 + intercept).collect();
    daily_series(date(2024, 1, 1), &values)
}

/// Flat demand with uniform noise of +/- `noise`
pub fn noisy_series(seed: u64, days: usize, base: f64, noise: f64) -> Vec<TrendDataPoint> {
    let mut rng = rng(seed);
    let values: Vec<f64> = (0..days)
        .map(|_| base + rng.gen_range(-noise..=noise))
        .collect();
    daily_series(date(2024, 1, 1), &values)
}

/// Two years of daily demand that triples every November and December
pub fn holiday_series(seed: u64) -> Vec<TrendDataPoint> {
    let mut rng = rng(seed);
    let start = date(2022, 1, 1);
    (0..730)
        .map(|i| {
            let day = start + Duration::days(i);
            let base = if matches!(chrono::Datelike::month(&day), 11 | 12) {
                3000.0
            } else {
                1000.0
            };
            TrendDataPoint::new(day, base + rng.gen_range(-50.0..=50.0), 50.0)
        })
        .collect()
}

pub fn competitor(domain: &str, domain_authority: f64, backlinks: u64) -> CompetitorMetrics {
    CompetitorMetrics {
        backlinks,
        referring_domains: backlinks / 10,
        content_length: 1800,
        page_speed: 70.0,
        page_authority: domain_authority * 0.8,
        ..CompetitorMetrics::new(domain, domain_authority)
    }
}

/// Competitors with random but valid metrics
pub fn random_competitors(seed: u64, count: usize) -> Vec<CompetitorMetrics> {
    let mut rng = rng(seed);
    (0..count)
        .map(|i| CompetitorMetrics {
            page_authority: rng.gen_range(0.0..=100.0),
            backlinks: rng.gen_range(0..20_000),
            referring_domains: rng.gen_range(0..2_000),
            content_length: rng.gen_range(200..5_000),
            page_speed: rng.gen_range(0.0..=100.0),
            social_signals: rng.gen_range(0..1_000),
            brand_mentions: rng.gen_range(0..500),
            ..CompetitorMetrics::new(format!("site{i}.com"), rng.gen_range(0.0..=100.0))
        })
        .collect()
}

pub fn keyword(text: &str, volume: u64, intent: SearchIntent) -> KeywordRecord {
    KeywordRecord::new(text, volume, intent)
}

/// Keyword set with three clear topics and one outlier
pub fn topical_keywords() -> Vec<KeywordRecord> {
    use SearchIntent::*;
    vec![
        keyword("running shoes", 40_000, Commercial).with_competition(0.8),
        keyword("best running shoes", 22_000, Commercial).with_competition(0.7),
        keyword("running shoes for women", 12_000, Commercial).with_competition(0.6),
        keyword("trail running shoes", 9_000, Commercial).with_competition(0.5),
        keyword("how to make sourdough bread", 15_000, Informational).with_difficulty(20.0),
        keyword("sourdough bread recipe", 30_000, Informational).with_difficulty(35.0),
        keyword("easy sourdough bread", 6_000, Informational).with_difficulty(15.0),
        keyword("quantum entanglement", 5_000, Informational),
    ]
}
