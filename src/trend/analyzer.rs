//! Keyword trend analysis over daily search volume
//!
//! This module provides functionality for:
//! - Cleaning and smoothing a volume series
//! - Fitting an overall linear trend
//! - Detecting monthly, quarterly and yearly seasonality
//! - Measuring volatility and momentum
//! - Forecasting 30/90/365 days ahead with 95% ranges
//! - Flagging spikes and generating insights

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::types::{
    ForecastPoint, InsightKind, Momentum, OverallTrend, SeasonalPeak, SeasonalPeriod,
    SeasonalityPattern, Spike, SpikeKind, TrendAnalysisResult, TrendDataPoint, TrendDirection,
    TrendForecast, TrendInsight, TrendSummary, Volatility, VolatilityLevel,
};
use super::{TrendError, TrendResult};
use crate::stats::{
    centered_moving_average, detect_outliers, linear_regression, mean, moving_average,
    relative_change, sample_confidence, std_dev, z_scores, Regression,
};

/// Fewest cleaned points accepted for analysis
pub const MIN_DATA_POINTS: usize = 30;

/// Forecast horizons in days (short, medium, long)
pub const FORECAST_HORIZONS: [u32; 3] = [30, 90, 365];

/// Two-sided 95% normal quantile
const Z_95: f64 = 1.96;

/// Volume ratios against the trailing average that qualify as a spike
const SPIKE_SURGE_RATIO: f64 = 2.0;
const SPIKE_DROP_RATIO: f64 = 0.5;

/// Maximum peaks and valleys reported per pattern
const MAX_PEAKS: usize = 3;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Trend analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendOptions {
    /// Centered moving average window
    pub smoothing_window: usize,

    /// Minimum strength for a seasonal pattern to be reported
    pub seasonality_threshold: f64,

    /// Rolling window over daily returns
    pub volatility_window: usize,

    /// Absolute z-score above which a point is reported as a spike
    pub anomaly_threshold: f64,
}

impl Default for TrendOptions {
    fn default() -> Self {
        Self {
            smoothing_window: 7,
            seasonality_threshold: 0.3,
            volatility_window: 30,
            anomaly_threshold: 2.5,
        }
    }
}

impl TrendOptions {
    /// Validate option ranges
    pub fn validate(&self) -> TrendResult<()> {
        if self.smoothing_window == 0 {
            return Err(TrendError::InvalidWindowSize(self.smoothing_window));
        }
        if self.volatility_window == 0 {
            return Err(TrendError::InvalidWindowSize(self.volatility_window));
        }
        if !(0.0..=1.0).contains(&self.seasonality_threshold) {
            return Err(TrendError::InvalidOption(format!(
                "seasonality_threshold must be within [0, 1], got {}",
                self.seasonality_threshold
            )));
        }
        if !self.anomaly_threshold.is_finite() || self.anomaly_threshold <= 0.0 {
            return Err(TrendError::InvalidOption(format!(
                "anomaly_threshold must be positive, got {}",
                self.anomaly_threshold
            )));
        }
        Ok(())
    }
}

/// Stateless trend analyzer
#[derive(Debug, Clone, Default)]
pub struct TrendAnalyzer {
    options: TrendOptions,
}

impl TrendAnalyzer {
    /// Create an analyzer after validating its options
    pub fn new(options: TrendOptions) -> TrendResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    #[must_use]
    pub fn options(&self) -> &TrendOptions {
        &self.options
    }

    /// Analyze a keyword's volume history
    ///
    /// # Errors
    /// Returns [`TrendError::InsufficientData`] when fewer than
    /// [`MIN_DATA_POINTS`] usable points remain after cleaning.
    pub fn analyze(
        &self,
        keyword: &str,
        series: &[TrendDataPoint],
    ) -> TrendResult<TrendAnalysisResult> {
        let points = clean_series(series);
        if points.len() < MIN_DATA_POINTS {
            return Err(TrendError::InsufficientData {
                required: MIN_DATA_POINTS,
                actual: points.len(),
            });
        }

        let values: Vec<f64> = points.iter().map(|p| p.volume).collect();
        let regression = linear_regression(&values);

        let overall_trend = overall_trend(&values, &regression);
        let seasonality = detect_seasonality(&points, self.options.seasonality_threshold);
        let volatility = volatility(&values, self.options.volatility_window);
        let momentum = momentum(&values);
        let monthly_factors = (!seasonality.is_empty()).then(|| monthly_factors(&points));
        let forecast = forecast(&points, &regression, monthly_factors.as_ref());
        let anomalies = detect_spikes(
            &points,
            &values,
            self.options.smoothing_window,
            self.options.anomaly_threshold,
        );
        let insights = insights(&overall_trend, &seasonality, &volatility, &momentum, &anomalies);

        debug!(
            keyword,
            points = points.len(),
            direction = ?overall_trend.direction,
            r_squared = overall_trend.r_squared,
            patterns = seasonality.len(),
            volatility = volatility.score,
            "Trend analysis completed"
        );

        Ok(TrendAnalysisResult {
            keyword: keyword.to_string(),
            data_points: points.len(),
            start_date: points[0].date,
            end_date: points[points.len() - 1].date,
            summary: summary(&points, &values),
            smoothed: centered_moving_average(&values, self.options.smoothing_window),
            overall_trend,
            seasonality,
            volatility,
            momentum,
            forecast,
            anomalies,
            insights,
        })
    }
}

/// Analyze a keyword's volume history with the given options
pub fn analyze_trend(
    keyword: &str,
    series: &[TrendDataPoint],
    options: &TrendOptions,
) -> TrendResult<TrendAnalysisResult> {
    TrendAnalyzer::new(options.clone())?.analyze(keyword, series)
}

/// Drop non-finite rows, clamp negatives and sort chronologically
fn clean_series(series: &[TrendDataPoint]) -> Vec<TrendDataPoint> {
    let mut points: Vec<TrendDataPoint> = series
        .iter()
        .filter(|p| p.volume.is_finite() && p.interest.is_finite())
        .map(|p| TrendDataPoint {
            date: p.date,
            volume: p.volume.max(0.0),
            interest: p.interest.clamp(0.0, 100.0),
        })
        .collect();

    let dropped = series.len() - points.len();
    if dropped > 0 {
        warn!(dropped, "Dropped non-finite trend data points");
    }

    points.sort_by_key(|p| p.date);
    points
}

fn overall_trend(values: &[f64], regression: &Regression) -> OverallTrend {
    let avg = mean(values);
    let first = values.first().copied().unwrap_or(0.0);
    let last = values.last().copied().unwrap_or(0.0);

    let strength = if avg > 0.0 {
        (regression.slope.abs() / avg).min(1.0)
    } else {
        0.0
    };

    OverallTrend {
        direction: TrendDirection::classify(regression.slope, avg, regression.r_squared),
        strength,
        confidence: regression.r_squared.max(0.0),
        slope: regression.slope,
        intercept: regression.intercept,
        r_squared: regression.r_squared,
        change_percent: relative_change(first, last) * 100.0,
    }
}

fn bucket_key(period: SeasonalPeriod, date: NaiveDate) -> i32 {
    match period {
        SeasonalPeriod::Monthly => date.month() as i32,
        SeasonalPeriod::Quarterly => date.month0() as i32 / 3 + 1,
        SeasonalPeriod::Yearly => date.year(),
    }
}

fn bucket_label(period: SeasonalPeriod, key: i32) -> String {
    match period {
        SeasonalPeriod::Monthly => MONTH_NAMES[(key - 1).clamp(0, 11) as usize].to_string(),
        SeasonalPeriod::Quarterly => format!("Q{key}"),
        SeasonalPeriod::Yearly => key.to_string(),
    }
}

/// Seasonal patterns whose strength exceeds `threshold`
fn detect_seasonality(points: &[TrendDataPoint], threshold: f64) -> Vec<SeasonalityPattern> {
    let overall_mean = mean(&points.iter().map(|p| p.volume).collect::<Vec<_>>());
    if overall_mean <= 0.0 {
        return Vec::new();
    }

    let mut periods = vec![SeasonalPeriod::Monthly, SeasonalPeriod::Quarterly];
    if points.len() >= 365 {
        periods.push(SeasonalPeriod::Yearly);
    }

    periods
        .into_iter()
        .filter_map(|period| {
            let mut buckets: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
            for point in points {
                buckets
                    .entry(bucket_key(period, point.date))
                    .or_default()
                    .push(point.volume);
            }
            if buckets.len() < 2 {
                return None;
            }

            let stats: Vec<(i32, f64, usize)> = buckets
                .iter()
                .map(|(&key, volumes)| (key, mean(volumes), volumes.len()))
                .collect();
            let means: Vec<f64> = stats.iter().map(|(_, m, _)| *m).collect();
            let strength = (std_dev(&means) / overall_mean).min(1.0);
            if strength <= threshold {
                return None;
            }

            let to_peak = |&(key, bucket_mean, count): &(i32, f64, usize)| SeasonalPeak {
                period: bucket_label(period, key),
                intensity: bucket_mean / overall_mean,
                confidence: sample_confidence(count, period.reference_size()),
            };
            // Peaks and valleys overlap when there are few buckets
            let k = MAX_PEAKS.min(stats.len());

            let mut ranked = stats;
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
            let peaks = ranked.iter().take(k).map(&to_peak).collect();
            let valleys = ranked.iter().rev().take(k).map(&to_peak).collect();

            Some(SeasonalityPattern {
                period,
                strength,
                peaks,
                valleys,
            })
        })
        .collect()
}

/// Ratio of each calendar month's mean to the overall mean (1.0 when unseen)
fn monthly_factors(points: &[TrendDataPoint]) -> [f64; 12] {
    let overall_mean = mean(&points.iter().map(|p| p.volume).collect::<Vec<_>>());
    let mut by_month: [Vec<f64>; 12] = Default::default();
    for point in points {
        by_month[point.date.month0() as usize].push(point.volume);
    }

    let mut factors = [1.0; 12];
    if overall_mean > 0.0 {
        for (factor, volumes) in factors.iter_mut().zip(&by_month) {
            if !volumes.is_empty() {
                *factor = mean(volumes) / overall_mean;
            }
        }
    }
    factors
}

/// Mean rolling standard deviation of point-to-point returns, scaled by 10
fn volatility(values: &[f64], window: usize) -> Volatility {
    let returns: Vec<f64> = values
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0].max(1.0))
        .collect();

    let score = if returns.len() < 2 {
        0.0
    } else {
        let window = window.clamp(2, returns.len());
        let deviations: Vec<f64> = returns.windows(window).map(std_dev).collect();
        (mean(&deviations) * 10.0).clamp(0.0, 1.0)
    };

    Volatility {
        score,
        level: VolatilityLevel::from_score(score),
    }
}

/// Relative change between the first and last `max(3, 10%)` points
fn edge_change(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let k = (n / 10).max(3).min(n / 2).max(1);
    relative_change(mean(&values[..k]), mean(&values[n - k..])).clamp(-1.0, 1.0)
}

/// Relative change between the two halves of the trailing `span` points
fn split_half_change(values: &[f64], span: usize) -> f64 {
    let tail = &values[values.len().saturating_sub(span)..];
    if tail.len() < 2 {
        return 0.0;
    }
    let mid = tail.len() / 2;
    relative_change(mean(&tail[..mid]), mean(&tail[mid..])).clamp(-1.0, 1.0)
}

fn momentum(values: &[f64]) -> Momentum {
    Momentum {
        current: edge_change(values),
        short_term: split_half_change(values, 30),
        medium_term: split_half_change(values, 90),
        long_term: split_half_change(values, 365),
    }
}

fn forecast(
    points: &[TrendDataPoint],
    regression: &Regression,
    monthly_factors: Option<&[f64; 12]>,
) -> TrendForecast {
    let last_index = (points.len() - 1) as f64;
    let first_date = points[0].date;
    let last_date = points[points.len() - 1].date;
    let rmse = regression.mse.max(0.0).sqrt();

    // Regression runs over point indices; convert day offsets with the mean spacing
    let span_days = (last_date - first_date).num_days() as f64;
    let days_per_point = if last_index > 0.0 && span_days > 0.0 {
        span_days / last_index
    } else {
        1.0
    };

    let project = |horizon_days: u32| {
        let midpoint = horizon_days / 2;
        let target_date = last_date + Duration::days(i64::from(midpoint));
        let seasonal = monthly_factors.map_or(1.0, |f| f[target_date.month0() as usize]);
        let offset = f64::from(midpoint) / days_per_point;
        let predicted = (regression.predict(last_index + offset) * seasonal).max(0.0);

        let confidence = if predicted > 0.0 {
            (1.0 - rmse / predicted).clamp(0.1, 0.9)
        } else {
            0.1
        };

        ForecastPoint {
            horizon_days,
            target_date,
            predicted,
            confidence,
            lower: (predicted - Z_95 * rmse).max(0.0),
            upper: predicted + Z_95 * rmse,
        }
    };

    let [short, medium, long] = FORECAST_HORIZONS;
    TrendForecast {
        short_term: project(short),
        medium_term: project(medium),
        long_term: project(long),
        seasonally_adjusted: monthly_factors.is_some(),
    }
}

/// Points whose z-score exceeds the threshold and whose volume is at least
/// double (or at most half) the trailing average
fn detect_spikes(
    points: &[TrendDataPoint],
    values: &[f64],
    window: usize,
    threshold: f64,
) -> Vec<Spike> {
    let expected = moving_average(values, window);
    let z = z_scores(values);

    detect_outliers(values, threshold)
        .into_iter()
        .filter_map(|i| {
            // No baseline to compare against
            if expected[i] <= 0.0 {
                return None;
            }
            let magnitude = values[i] / expected[i];
            if magnitude > SPIKE_DROP_RATIO && magnitude < SPIKE_SURGE_RATIO {
                return None;
            }
            Some(Spike {
                date: points[i].date,
                volume: values[i],
                expected: expected[i],
                magnitude,
                z_score: z[i],
                kind: if z[i] > 0.0 {
                    SpikeKind::Surge
                } else {
                    SpikeKind::Drop
                },
            })
        })
        .collect()
}

fn summary(points: &[TrendDataPoint], values: &[f64]) -> TrendSummary {
    // First maximum wins
    let peak = points
        .iter()
        .fold(&points[0], |best, p| if p.volume > best.volume { p } else { best });

    TrendSummary {
        mean: mean(values),
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: peak.volume,
        std_dev: std_dev(values),
        total_volume: values.iter().sum(),
        peak_date: peak.date,
        average_interest: mean(&points.iter().map(|p| p.interest).collect::<Vec<_>>()),
    }
}

fn insights(
    trend: &OverallTrend,
    seasonality: &[SeasonalityPattern],
    volatility: &Volatility,
    momentum: &Momentum,
    anomalies: &[Spike],
) -> Vec<TrendInsight> {
    let mut insights = Vec::new();

    match trend.direction {
        TrendDirection::Rising if trend.confidence > 0.6 => insights.push(TrendInsight::new(
            InsightKind::Opportunity,
            format!(
                "Search interest is rising steadily ({:+.1}%); publish and expand content now",
                trend.change_percent
            ),
        )),
        TrendDirection::Falling if trend.confidence > 0.6 => insights.push(TrendInsight::new(
            InsightKind::Risk,
            format!(
                "Search interest is declining ({:+.1}%); refresh existing content or diversify into related keywords",
                trend.change_percent
            ),
        )),
        TrendDirection::Stable => insights.push(TrendInsight::new(
            InsightKind::Info,
            "Demand is stable and well suited to evergreen content",
        )),
        TrendDirection::Volatile => insights.push(TrendInsight::new(
            InsightKind::Info,
            "Demand moves without a clear linear trend; monitor before investing heavily",
        )),
        _ => {}
    }

    if matches!(volatility.level, VolatilityLevel::High | VolatilityLevel::Extreme) {
        insights.push(TrendInsight::new(
            InsightKind::Risk,
            "High volatility: expect large swings in traffic from this keyword",
        ));
    }

    if momentum.current > 0.2 && momentum.short_term > 0.1 {
        insights.push(TrendInsight::new(
            InsightKind::Action,
            "Momentum is accelerating; capitalize quickly before competition catches up",
        ));
    } else if momentum.current < -0.2 && momentum.short_term < -0.1 {
        insights.push(TrendInsight::new(
            InsightKind::Risk,
            "Momentum is fading; avoid large new investments in this keyword",
        ));
    }

    if let Some(strongest) = seasonality
        .iter()
        .max_by(|a, b| a.strength.total_cmp(&b.strength))
    {
        let peaks: Vec<&str> = strongest.peaks.iter().map(|p| p.period.as_str()).collect();
        insights.push(TrendInsight::new(
            InsightKind::Action,
            format!(
                "Seasonal peaks in {}; schedule content 4-6 weeks ahead of them",
                peaks.join(", ")
            ),
        ));
    }

    if !anomalies.is_empty() {
        insights.push(TrendInsight::new(
            InsightKind::Info,
            format!(
                "{} unusual spike(s) detected; check for news events or data issues",
                anomalies.len()
            ),
        ));
    }

    insights
}
