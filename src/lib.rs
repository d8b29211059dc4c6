//! kwscope - Keyword research analytics engine
//!
//! Turns raw keyword, competitor and SERP metrics into actionable scores,
//! clusters, forecasts and recommendations.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`difficulty`] - Seven-factor keyword difficulty scoring
//! - [`clustering`] - Semantic keyword clustering
//! - [`trend`] - Trend, seasonality, volatility and forecast analysis
//! - [`serp`] - SERP competitiveness and feature opportunities
//! - [`batch`] - Concurrent batch driver over the analyzers
//! - [`stats`] - Shared statistical helpers
//! - [`models`] - Core data structures and types
//! - [`config`] - Configuration management and settings
//! - [`metrics`] - Prometheus metrics
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use kwscope::prelude::*;
//!
//! fn main() -> kwscope::Result<()> {
//!     let result = analyze_difficulty(
//!         "buy running shoes",
//!         5000,
//!         &[],
//!         &SerpSnapshot::default(),
//!         "us",
//!     )?;
//!     println!("{} ({})", result.overall_score, result.level.label());
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod clustering;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod metrics;
pub mod models;
pub mod serp;
pub mod stats;
pub mod trend;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::batch::{BatchAnalyzer, BatchConfig};
    pub use crate::clustering::{cluster_keywords, ClusteringEngine, ClusteringOptions, ClusteringResult};
    pub use crate::config::Config;
    pub use crate::difficulty::{analyze_difficulty, DifficultyAnalysisResult};
    pub use crate::error::{Error, ErrorCategory, KwscopeErrorTrait, Result};
    pub use crate::models::{
        CompetitorMetrics, DifficultyLevel, KeywordRecord, SearchIntent, SerpFeatureKind,
        SerpSnapshot,
    };
    pub use crate::serp::{analyze_serp_data, SerpAnalysisData, SerpAnalysisResult};
    pub use crate::trend::{analyze_trend, TrendAnalysisResult, TrendAnalyzer, TrendDataPoint, TrendOptions};
}

// Direct re-exports for convenience
pub use error::{Error, Result};
pub use models::{CompetitorMetrics, KeywordRecord, SearchIntent};
