//! Concurrent batch driver over the analyzers
//!
//! Every analyzer is a pure synchronous function, so each job runs on the
//! blocking thread pool. A semaphore bounds how many jobs run at once and
//! results come back in input order, one `Result` per job.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::clustering::{ClusteringEngine, ClusteringOptions, ClusteringResult};
use crate::difficulty::{analyze_difficulty, DifficultyAnalysisResult};
use crate::error::{Error, Result};
use crate::metrics;
use crate::models::{CompetitorMetrics, KeywordRecord, SerpSnapshot};
use crate::serp::{analyze_serp_data, SerpAnalysisData, SerpAnalysisResult};
use crate::trend::{TrendAnalysisResult, TrendAnalyzer, TrendDataPoint, TrendOptions};

/// Batch execution configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum number of analyses running at once
    pub max_concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { max_concurrency: 4 }
    }
}

/// One keyword to score for difficulty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyJob {
    pub keyword: String,
    pub search_volume: u64,
    #[serde(default)]
    pub competitors: Vec<CompetitorMetrics>,
    #[serde(default)]
    pub serp: SerpSnapshot,
    #[serde(default)]
    pub location: String,
}

/// One keyword's volume history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendJob {
    pub keyword: String,
    pub series: Vec<TrendDataPoint>,
}

/// Mixed workload accepted by [`BatchAnalyzer::run`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchRequest {
    pub difficulty: Vec<DifficultyJob>,
    pub trends: Vec<TrendJob>,
    pub serp: Vec<SerpAnalysisData>,

    /// Keyword set clustered once as a whole
    pub keywords: Vec<KeywordRecord>,
}

/// Outcome of one job in a serializable form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem<T> {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> BatchItem<T> {
    fn from_result(index: usize, result: Result<T>) -> Self {
        match result {
            Ok(value) => Self {
                index,
                result: Some(value),
                error: None,
            },
            Err(e) => Self {
                index,
                result: None,
                error: Some(e.to_string()),
            },
        }
    }
}

fn items<T>(results: Vec<Result<T>>) -> Vec<BatchItem<T>> {
    results
        .into_iter()
        .enumerate()
        .map(|(i, r)| BatchItem::from_result(i, r))
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub difficulty: Vec<BatchItem<DifficultyAnalysisResult>>,
    pub trends: Vec<BatchItem<TrendAnalysisResult>>,
    pub serp: Vec<BatchItem<SerpAnalysisResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clustering: Option<BatchItem<ClusteringResult>>,
    pub succeeded: usize,
    pub failed: usize,
}

/// Runs analyzer jobs concurrently with bounded parallelism
pub struct BatchAnalyzer {
    /// Concurrency semaphore
    semaphore: Arc<Semaphore>,

    config: BatchConfig,
}

impl BatchAnalyzer {
    /// Create a new batch analyzer
    pub fn new(config: BatchConfig) -> Result<Self> {
        if config.max_concurrency == 0 {
            return Err(Error::config("max_concurrency must be greater than 0"));
        }

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(config.max_concurrency)),
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Run one blocking analysis under a semaphore permit
    async fn run_blocking<T, F>(&self, analyzer: &'static str, job: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| Error::with_source("Failed to acquire semaphore permit", e))?;

        tokio::task::spawn_blocking(move || metrics::observe(analyzer, job))
            .await
            .map_err(|e| Error::with_source("Analysis task failed", e))?
    }

    /// Score difficulty for every job
    pub async fn difficulty_batch(
        &self,
        jobs: Vec<DifficultyJob>,
    ) -> Vec<Result<DifficultyAnalysisResult>> {
        tracing::debug!(jobs = jobs.len(), "Starting difficulty batch");

        let futures = jobs.into_iter().map(|job| {
            self.run_blocking(metrics::DIFFICULTY, move || {
                Ok(analyze_difficulty(
                    &job.keyword,
                    job.search_volume,
                    &job.competitors,
                    &job.serp,
                    &job.location,
                )?)
            })
        });

        futures::future::join_all(futures).await
    }

    /// Analyze every volume history; a short series fails only its own entry
    pub async fn trend_batch(
        &self,
        jobs: Vec<TrendJob>,
        options: TrendOptions,
    ) -> Vec<Result<TrendAnalysisResult>> {
        tracing::debug!(jobs = jobs.len(), "Starting trend batch");

        let analyzer = match TrendAnalyzer::new(options) {
            Ok(analyzer) => Arc::new(analyzer),
            Err(e) => {
                let message = e.to_string();
                return jobs
                    .iter()
                    .map(|_| Err(Error::config(message.clone())))
                    .collect();
            }
        };

        let futures = jobs.into_iter().map(|job| {
            let analyzer = Arc::clone(&analyzer);
            self.run_blocking(metrics::TREND, move || {
                Ok(analyzer.analyze(&job.keyword, &job.series)?)
            })
        });

        futures::future::join_all(futures).await
    }

    /// Analyze every results page
    pub async fn serp_batch(&self, pages: Vec<SerpAnalysisData>) -> Vec<Result<SerpAnalysisResult>> {
        tracing::debug!(pages = pages.len(), "Starting SERP batch");

        let futures = pages.into_iter().map(|page| {
            self.run_blocking(metrics::SERP, move || Ok(analyze_serp_data(&page)?))
        });

        futures::future::join_all(futures).await
    }

    /// Cluster one keyword set off the async runtime
    pub async fn cluster(
        &self,
        keywords: Vec<KeywordRecord>,
        options: ClusteringOptions,
    ) -> Result<ClusteringResult> {
        self.run_blocking(metrics::CLUSTERING, move || {
            let result = ClusteringEngine::new(options)?.cluster(&keywords)?;
            metrics::record_clustering_sizes(keywords.len(), result.clusters.len());
            Ok(result)
        })
        .await
    }

    /// Run a mixed request and collect a serializable report
    pub async fn run(
        &self,
        request: BatchRequest,
        trend_options: TrendOptions,
        clustering_options: ClusteringOptions,
    ) -> BatchReport {
        let BatchRequest {
            difficulty,
            trends,
            serp,
            keywords,
        } = request;

        let clustering = async {
            if keywords.is_empty() {
                None
            } else {
                Some(self.cluster(keywords, clustering_options).await)
            }
        };

        let (difficulty, trends, serp, clustering) = tokio::join!(
            self.difficulty_batch(difficulty),
            self.trend_batch(trends, trend_options),
            self.serp_batch(serp),
            clustering,
        );

        let failed = difficulty.iter().filter(|r| r.is_err()).count()
            + trends.iter().filter(|r| r.is_err()).count()
            + serp.iter().filter(|r| r.is_err()).count()
            + usize::from(matches!(clustering, Some(Err(_))));
        let total =
            difficulty.len() + trends.len() + serp.len() + usize::from(clustering.is_some());

        tracing::info!(total, failed, "Batch completed");

        BatchReport {
            difficulty: items(difficulty),
            trends: items(trends),
            serp: items(serp),
            clustering: clustering.map(|r| BatchItem::from_result(0, r)),
            succeeded: total - failed,
            failed,
        }
    }
}
