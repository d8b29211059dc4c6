//! Input and result types for keyword trend analysis

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One observation of a keyword's search demand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendDataPoint {
    /// Day of the observation
    pub date: NaiveDate,

    /// Search volume on that day
    pub volume: f64,

    /// Relative interest (0-100)
    #[serde(default)]
    pub interest: f64,
}

impl TrendDataPoint {
    /// Create a new data point
    #[must_use]
    pub fn new(date: NaiveDate, volume: f64, interest: f64) -> Self {
        Self {
            date,
            volume,
            interest,
        }
    }
}

/// Trend direction indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Significant upward slope with a good linear fit
    Rising,

    /// Significant downward slope with a good linear fit
    Falling,

    /// Slope below 1% of the mean per step
    Stable,

    /// Significant slope but poor linear fit
    Volatile,
}

impl TrendDirection {
    /// Classify a fitted trend
    ///
    /// # Classification
    /// - `|slope| < 1% of mean`: Stable
    /// - `r_squared < 0.3`: Volatile
    /// - otherwise Rising or Falling by the sign of the slope
    #[must_use]
    pub fn classify(slope: f64, mean: f64, r_squared: f64) -> Self {
        if slope == 0.0 || slope.abs() < 0.01 * mean.abs() {
            Self::Stable
        } else if r_squared < 0.3 {
            Self::Volatile
        } else if slope > 0.0 {
            Self::Rising
        } else {
            Self::Falling
        }
    }
}

/// Linear trend over the whole series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallTrend {
    pub direction: TrendDirection,

    /// `min(1, |slope| / mean)`
    pub strength: f64,

    /// Goodness of fit, `max(0, r²)`
    pub confidence: f64,

    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,

    /// Change from the first to the last observation, in percent
    pub change_percent: f64,
}

/// Calendar granularity of a seasonal pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalPeriod {
    Monthly,
    Quarterly,
    Yearly,
}

impl SeasonalPeriod {
    /// Daily samples expected in one bucket of this period
    #[must_use]
    pub fn reference_size(&self) -> usize {
        match self {
            Self::Monthly => 30,
            Self::Quarterly => 91,
            Self::Yearly => 365,
        }
    }
}

/// A high or low bucket within a seasonal pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalPeak {
    /// Bucket label, e.g. "December", "Q4" or "2023"
    pub period: String,

    /// Bucket mean relative to the overall mean
    pub intensity: f64,

    /// `min(1, samples / reference size)`
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityPattern {
    pub period: SeasonalPeriod,

    /// Dispersion of bucket means relative to the overall mean (0-1)
    pub strength: f64,

    pub peaks: Vec<SeasonalPeak>,
    pub valleys: Vec<SeasonalPeak>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolatilityLevel {
    Low,
    Medium,
    High,
    Extreme,
}

impl VolatilityLevel {
    /// Band a 0-1 volatility score: <0.2 low, <0.4 medium, <0.7 high
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < 0.2 {
            Self::Low
        } else if score < 0.4 {
            Self::Medium
        } else if score < 0.7 {
            Self::High
        } else {
            Self::Extreme
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volatility {
    /// Scaled mean rolling deviation of daily returns (0-1)
    pub score: f64,
    pub level: VolatilityLevel,
}

/// Normalized directional change, each in `[-1, 1]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Momentum {
    /// First vs last tenth of the series
    pub current: f64,

    /// Split-half change over the last 30 points
    pub short_term: f64,

    /// Split-half change over the last 90 points
    pub medium_term: f64,

    /// Split-half change over the last 365 points
    pub long_term: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub horizon_days: u32,

    /// Midpoint of the horizon the prediction refers to
    pub target_date: NaiveDate,

    pub predicted: f64,

    /// Relative accuracy estimate (0.1-0.9)
    pub confidence: f64,

    /// 95% interval bounds
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendForecast {
    pub short_term: ForecastPoint,
    pub medium_term: ForecastPoint,
    pub long_term: ForecastPoint,

    /// Whether monthly seasonal factors were applied
    pub seasonally_adjusted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpikeKind {
    Surge,
    Drop,
}

/// Spike detection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spike {
    /// When the spike occurred
    pub date: NaiveDate,

    /// Actual volume at spike
    pub volume: f64,

    /// Expected volume (trailing moving average)
    pub expected: f64,

    /// Spike magnitude (volume / expected)
    pub magnitude: f64,

    /// Z-score of the spike
    pub z_score: f64,

    pub kind: SpikeKind,
}

/// Descriptive statistics of the cleaned series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    pub total_volume: f64,
    pub peak_date: NaiveDate,
    pub average_interest: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Opportunity,
    Risk,
    Action,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendInsight {
    pub kind: InsightKind,
    pub message: String,
}

impl TrendInsight {
    pub(crate) fn new(kind: InsightKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Complete trend analysis for one keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysisResult {
    pub keyword: String,

    /// Number of points after cleaning
    pub data_points: usize,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub summary: TrendSummary,

    /// Centered moving average of volume
    pub smoothed: Vec<f64>,

    pub overall_trend: OverallTrend,
    pub seasonality: Vec<SeasonalityPattern>,
    pub volatility: Volatility,
    pub momentum: Momentum,
    pub forecast: TrendForecast,
    pub anomalies: Vec<Spike>,
    pub insights: Vec<TrendInsight>,
}
