//! Statistical helpers shared by all analyzers
//!
//! This module provides:
//! - Descriptive statistics (mean, population standard deviation)
//! - Min-max normalization and percentiles
//! - Pearson correlation
//! - Trailing and centered moving averages
//! - Z-score outlier detection
//! - Ordinary least-squares regression against the sample index
//!
//! Every function is total: empty inputs and zero denominators produce
//! neutral values (usually `0.0`) instead of `NaN` or infinities.

use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, OrderStatistics, Statistics};

/// Arithmetic mean, `0.0` for an empty slice
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().mean()
}

/// Population standard deviation, `0.0` for fewer than two values
#[must_use]
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    values.iter().population_std_dev()
}

/// Min-max normalize values to `[0.0, 1.0]`
///
/// A constant series maps every value to `0.5`.
#[must_use]
pub fn normalize(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range <= f64::EPSILON {
        return vec![0.5; values.len()];
    }

    values.iter().map(|v| (v - min) / range).collect()
}

/// Percentile `p` (0-100) of the values, `0.0` for an empty slice
#[must_use]
pub fn percentile(values: &[f64], p: usize) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut data = Data::new(values.to_vec());
    data.percentile(p.min(100))
}

/// Pearson correlation coefficient over the common prefix of two series
///
/// Returns `0.0` when either series has zero variance.
#[must_use]
pub fn correlation(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }

    let (xs, ys) = (&xs[..n], &ys[..n]);
    let mean_x = mean(xs);
    let mean_y = mean(ys);

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator <= f64::EPSILON {
        0.0
    } else {
        (cov / denominator).clamp(-1.0, 1.0)
    }
}

/// Trailing simple moving average
///
/// Each output value averages the current point and up to `window - 1`
/// preceding points.
#[must_use]
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = i.saturating_sub(window - 1);
            mean(&values[start..=i])
        })
        .collect()
}

/// Centered moving average
///
/// The window shrinks symmetrically at the edges of the series, so a
/// perfectly linear series is returned unchanged.
#[must_use]
pub fn centered_moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let half = window.max(1) / 2;
    let n = values.len();
    (0..n)
        .map(|i| {
            let reach = half.min(i).min(n - 1 - i);
            mean(&values[i - reach..=i + reach])
        })
        .collect()
}

/// Z-scores of each value against the series mean
#[must_use]
pub fn z_scores(values: &[f64]) -> Vec<f64> {
    let avg = mean(values);
    let sd = std_dev(values);
    values
        .iter()
        .map(|v| if sd > 0.0 { (v - avg) / sd } else { 0.0 })
        .collect()
}

/// Indices of values whose absolute z-score exceeds `threshold`
#[must_use]
pub fn detect_outliers(values: &[f64], threshold: f64) -> Vec<usize> {
    z_scores(values)
        .iter()
        .enumerate()
        .filter(|(_, z)| z.abs() > threshold)
        .map(|(i, _)| i)
        .collect()
}

/// Confidence from sample size relative to a reference size, in `[0.0, 1.0]`
#[must_use]
pub fn sample_confidence(sample_size: usize, reference_size: usize) -> f64 {
    (sample_size as f64 / reference_size.max(1) as f64).min(1.0)
}

/// Relative change from `base` to `current`
///
/// A zero baseline yields `1.0` when the value grew and `0.0` otherwise.
#[must_use]
pub fn relative_change(base: f64, current: f64) -> f64 {
    if base.abs() <= f64::EPSILON {
        if current > 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        (current - base) / base.abs()
    }
}

/// Round to a fixed number of decimal places
#[must_use]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Clamp a score into `[0.0, 100.0]`
#[must_use]
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Ordinary least-squares fit of `value = slope * index + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,

    /// Coefficient of determination (`1 - SSres/SStot`)
    pub r_squared: f64,

    /// Mean squared residual
    pub mse: f64,
}

impl Regression {
    /// Predicted value at a (possibly fractional) index
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit a line through `values` against their index
///
/// Zero variance in either axis yields `slope = 0` and `r_squared = 0`.
#[must_use]
pub fn linear_regression(values: &[f64]) -> Regression {
    let n = values.len();
    if n == 0 {
        return Regression {
            slope: 0.0,
            intercept: 0.0,
            r_squared: 0.0,
            mse: 0.0,
        };
    }

    let mean_y = mean(values);
    let mean_x = (n as f64 - 1.0) / 2.0;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut ss_tot = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        sxy += dx * (y - mean_y);
        sxx += dx * dx;
        ss_tot += (y - mean_y).powi(2);
    }

    if sxx <= f64::EPSILON || ss_tot <= f64::EPSILON {
        let mse = values.iter().map(|y| (y - mean_y).powi(2)).sum::<f64>() / n as f64;
        return Regression {
            slope: 0.0,
            intercept: mean_y,
            r_squared: 0.0,
            mse,
        };
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let ss_res: f64 = values
        .iter()
        .enumerate()
        .map(|(i, y)| (y - (slope * i as f64 + intercept)).powi(2))
        .sum();

    Regression {
        slope,
        intercept,
        r_squared: 1.0 - ss_res / ss_tot,
        mse: ss_res / n as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&values) - 5.0).abs() < 1e-9);
        assert!((std_dev(&values) - 2.0).abs() < 1e-9);
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(std_dev(&[3.0]), 0.0);
    }

    #[test]
    fn test_normalize() {
        let normalized = normalize(&[10.0, 50.0, 30.0]);
        assert!((normalized[0] - 0.0).abs() < 0.01);
        assert!((normalized[1] - 1.0).abs() < 0.01);
        assert!((normalized[2] - 0.5).abs() < 0.01);

        assert_eq!(normalize(&[3.0, 3.0]), vec![0.5, 0.5]);
    }

    #[test]
    fn test_percentile() {
        let values: Vec<f64> = (1..=100).map(f64::from).collect();
        let p50 = percentile(&values, 50);
        assert!((49.0..=51.0).contains(&p50));
        assert_eq!(percentile(&[], 90), 0.0);
    }

    #[test]
    fn test_correlation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        assert!((correlation(&xs, &[2.0, 4.0, 6.0, 8.0]) - 1.0).abs() < 1e-9);
        assert!((correlation(&xs, &[8.0, 6.0, 4.0, 2.0]) + 1.0).abs() < 1e-9);
        assert_eq!(correlation(&xs, &[5.0, 5.0, 5.0, 5.0]), 0.0);
    }

    #[test]
    fn test_moving_average() {
        let avg = moving_average(&[10.0, 20.0, 30.0], 3);
        assert!((avg[0] - 10.0).abs() < 0.01);
        assert!((avg[1] - 15.0).abs() < 0.01);
        assert!((avg[2] - 20.0).abs() < 0.01); // (10 + 20 + 30) / 3 = 20
    }

    #[test]
    fn test_centered_moving_average_preserves_lines() {
        let line: Vec<f64> = (0..20).map(|i| 3.0 * i as f64 + 7.0).collect();
        let smoothed = centered_moving_average(&line, 7);
        for (a, b) in line.iter().zip(&smoothed) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_detect_outliers() {
        let mut values = vec![10.0; 20];
        values[7] = 100.0;
        assert_eq!(detect_outliers(&values, 2.5), vec![7]);
        assert!(detect_outliers(&[5.0; 10], 2.0).is_empty());
    }

    #[test]
    fn test_linear_regression_exact_fit() {
        let values: Vec<f64> = (0..10).map(|i| 2.0 * i as f64 + 1.0).collect();
        let fit = linear_regression(&values);
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!((fit.intercept - 1.0).abs() < 1e-9);
        assert!((fit.r_squared - 1.0).abs() < 1e-9);
        assert!(fit.mse < 1e-12);
    }

    #[test]
    fn test_linear_regression_zero_variance() {
        let fit = linear_regression(&[4.0; 12]);
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.r_squared, 0.0);
        assert!((fit.intercept - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_relative_change_guards_zero_base() {
        assert!((relative_change(100.0, 150.0) - 0.5).abs() < 1e-9);
        assert_eq!(relative_change(0.0, 10.0), 1.0);
        assert_eq!(relative_change(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_rounding_and_clamping() {
        assert_eq!(round_to(0.12345, 2), 0.12);
        assert_eq!(clamp_score(140.0), 100.0);
        assert_eq!(clamp_score(-3.0), 0.0);
        assert_eq!(clamp_score(f64::NAN), 0.0);
        assert_eq!(sample_confidence(15, 30), 0.5);
        assert_eq!(sample_confidence(90, 30), 1.0);
    }
}
