//! Semantic keyword clustering
//!
//! This module provides functionality for:
//! - Tokenizing and stemming keywords (English and Spanish)
//! - Scoring keyword pairs by token, structural and intent similarity
//! - Average-linkage agglomerative clustering with coherence refinement
//! - Cluster metadata: primary keyword, themes, averages and opportunities

pub mod engine;
pub mod similarity;
pub mod tokenize;

use thiserror::Error;

use crate::error::{ErrorCategory, InputError, KwscopeErrorTrait};
use crate::models::KeywordRecord;

pub use engine::{
    ClusteringEngine, ClusteringOptions, ClusteringResult, ClusteringStatistics, KeywordCluster,
};
pub use similarity::SimilarityWeights;

/// Errors that can occur during keyword clustering
#[derive(Debug, Error)]
pub enum ClusteringError {
    #[error("Invalid clustering options: {0}")]
    InvalidOptions(String),

    #[error("Invalid keyword at index {index}: {source}")]
    InvalidKeyword {
        index: usize,
        #[source]
        source: InputError,
    },
}

impl KwscopeErrorTrait for ClusteringError {
    fn is_recoverable(&self) -> bool {
        false
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidOptions(_) => ErrorCategory::Config,
            Self::InvalidKeyword { .. } => ErrorCategory::Input,
        }
    }
}

/// Cluster keywords with the given options
pub fn cluster_keywords(
    keywords: &[KeywordRecord],
    options: &ClusteringOptions,
) -> Result<ClusteringResult, ClusteringError> {
    ClusteringEngine::new(options.clone())?.cluster(keywords)
}
