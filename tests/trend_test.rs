//! Integration tests for trend analysis

mod common;

use kwscope::error::{Error, ErrorCategory, KwscopeErrorTrait};
use kwscope::trend::{
    analyze_trend, SeasonalPeriod, SpikeKind, TrendAnalyzer, TrendDirection, TrendError,
    TrendOptions, VolatilityLevel,
};

use common::{holiday_series, linear_series, noisy_series};

#[test]
fn test_perfect_linear_growth() {
    let series = linear_series(60, 2.0, 100.0);
    let result = TrendAnalyzer::default().analyze("growth", &series).unwrap();

    assert_eq!(result.overall_trend.direction, TrendDirection::Rising);
    assert!((result.overall_trend.confidence - 1.0).abs() < 1e-9);
    assert!((result.overall_trend.slope - 2.0).abs() < 1e-9);

    for point in [
        &result.forecast.short_term,
        &result.forecast.medium_term,
        &result.forecast.long_term,
    ] {
        assert!(point.upper - point.lower < 1e-6);
        assert!(point.predicted > 0.0);
    }
    assert_eq!(result.forecast.short_term.horizon_days, 30);
    assert_eq!(result.forecast.long_term.horizon_days, 365);
}

#[test]
fn test_perfect_linear_decline() {
    let series = linear_series(60, -3.0, 300.0);
    let result = TrendAnalyzer::default().analyze("decline", &series).unwrap();

    assert_eq!(result.overall_trend.direction, TrendDirection::Falling);
    assert!((result.overall_trend.confidence - 1.0).abs() < 1e-9);
    assert!(result.overall_trend.change_percent < 0.0);
    assert!(result.momentum.current < 0.0);
}

#[test]
fn test_noisy_flat_series_is_stable() {
    let series = noisy_series(42, 120, 1_000.0, 20.0);
    let result = TrendAnalyzer::default().analyze("flat", &series).unwrap();

    assert_eq!(result.overall_trend.direction, TrendDirection::Stable);
    assert!(result.volatility.level <= VolatilityLevel::Medium);
    assert!(result.seasonality.is_empty());
    assert_eq!(result.data_points, 120);
    assert_eq!(result.smoothed.len(), 120);
}

#[test]
fn test_holiday_seasonality() {
    let series = holiday_series(3);
    let result = TrendAnalyzer::default().analyze("gift ideas", &series).unwrap();

    let monthly = result
        .seasonality
        .iter()
        .find(|p| p.period == SeasonalPeriod::Monthly)
        .expect("monthly pattern");
    assert!(monthly.strength > 0.3);
    let top_two: Vec<&str> = monthly.peaks.iter().take(2).map(|p| p.period.as_str()).collect();
    assert!(top_two.contains(&"November"));
    assert!(top_two.contains(&"December"));
    assert!(monthly.peaks[0].intensity > 2.0);

    let quarterly = result
        .seasonality
        .iter()
        .find(|p| p.period == SeasonalPeriod::Quarterly)
        .expect("quarterly pattern");
    assert_eq!(quarterly.peaks[0].period, "Q4");

    assert!(result
        .seasonality
        .iter()
        .all(|p| p.period != SeasonalPeriod::Yearly));
    assert!(result.forecast.seasonally_adjusted);
}

#[test]
fn test_spike_is_reported() {
    let mut series = noisy_series(9, 90, 1_000.0, 20.0);
    series[60].volume = 10_000.0;

    let result = TrendAnalyzer::default().analyze("viral", &series).unwrap();
    assert_eq!(result.anomalies.len(), 1);
    let spike = &result.anomalies[0];
    assert_eq!(spike.date, series[60].date);
    assert_eq!(spike.kind, SpikeKind::Surge);
    assert!(spike.magnitude >= 2.0);
    assert_eq!(result.summary.peak_date, series[60].date);
}

#[test]
fn test_insufficient_data_surfaces() {
    let series = linear_series(29, 1.0, 10.0);
    let err = analyze_trend("short", &series, &TrendOptions::default()).unwrap_err();

    assert!(matches!(
        err,
        TrendError::InsufficientData {
            required: 30,
            actual: 29
        }
    ));
    let err = Error::from(err);
    assert_eq!(err.category(), ErrorCategory::InsufficientData);
    assert!(err.is_recoverable());
}

#[test]
fn test_unsorted_input_is_sorted() {
    let mut series = linear_series(45, 4.0, 50.0);
    series.reverse();

    let result = TrendAnalyzer::default().analyze("shuffled", &series).unwrap();
    assert_eq!(result.overall_trend.direction, TrendDirection::Rising);
    assert!(result.start_date < result.end_date);
}

#[test]
fn test_results_are_deterministic_and_serializable() {
    let series = noisy_series(5, 200, 500.0, 100.0);
    let analyzer = TrendAnalyzer::default();
    let first = analyzer.analyze("kw", &series).unwrap();
    let second = analyzer.analyze("kw", &series).unwrap();
    assert_eq!(first, second);

    let json = serde_json::to_value(&first).unwrap();
    assert!(json.get("overall_trend").is_some());
    assert!(json["overall_trend"]["direction"].is_string());
    assert_eq!(json["data_points"], 200);
}

#[test]
fn test_momentum_and_confidence_bounds() {
    for seed in 0..10 {
        let series = noisy_series(seed, 400, 800.0, 300.0);
        let result = TrendAnalyzer::default().analyze("kw", &series).unwrap();

        let m = &result.momentum;
        for value in [m.current, m.short_term, m.medium_term, m.long_term] {
            assert!((-1.0..=1.0).contains(&value));
        }
        for point in [&result.forecast.short_term, &result.forecast.long_term] {
            assert!((0.1..=0.9).contains(&point.confidence));
            assert!(point.lower >= 0.0);
            assert!(point.lower <= point.predicted && point.predicted <= point.upper);
        }
        assert!((0.0..=1.0).contains(&result.volatility.score));
    }
}
