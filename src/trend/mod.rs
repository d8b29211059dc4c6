//! Search volume trend analysis
//!
//! Fits an overall trend, finds seasonal patterns, measures volatility and
//! momentum, forecasts future demand and flags unusual spikes.

pub mod analyzer;
pub mod types;

use thiserror::Error;

use crate::error::{ErrorCategory, KwscopeErrorTrait};

pub use analyzer::{analyze_trend, TrendAnalyzer, TrendOptions, FORECAST_HORIZONS, MIN_DATA_POINTS};
pub use types::{
    ForecastPoint, InsightKind, Momentum, OverallTrend, SeasonalPeak, SeasonalPeriod,
    SeasonalityPattern, Spike, SpikeKind, TrendAnalysisResult, TrendDataPoint, TrendDirection,
    TrendForecast, TrendInsight, TrendSummary, Volatility, VolatilityLevel,
};

/// Errors that can occur during trend analysis
#[derive(Debug, Error)]
pub enum TrendError {
    #[error("Insufficient data points: need at least {required}, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Invalid window size: {0}")]
    InvalidWindowSize(usize),

    #[error("Invalid trend option: {0}")]
    InvalidOption(String),
}

impl KwscopeErrorTrait for TrendError {
    fn is_recoverable(&self) -> bool {
        // A longer history makes the same request succeed
        matches!(self, Self::InsufficientData { .. })
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::InsufficientData { .. } => ErrorCategory::InsufficientData,
            Self::InvalidWindowSize(_) | Self::InvalidOption(_) => ErrorCategory::Config,
        }
    }
}

/// Result type for trend analysis operations
pub type TrendResult<T> = Result<T, TrendError>;
