//! Prometheus metrics for kwscope analyzers
//!
//! This module provides metrics tracking for:
//! - Analyzer invocations and failures, labeled by analyzer
//! - Analysis duration histograms
//! - Clustering input and output sizes
//!
//! # Usage
//!
//! Call `init_metrics()` at application startup to register all metrics.
//! If initialization fails, metrics operations become no-ops.

use prometheus::{
    register_counter_vec, register_histogram_vec, register_int_gauge_vec, CounterVec, Encoder,
    HistogramVec, IntGaugeVec, TextEncoder,
};
use std::sync::OnceLock;

// ============================================================================
// Metrics Storage
// ============================================================================

/// Analyzer label values
pub const DIFFICULTY: &str = "difficulty";
pub const CLUSTERING: &str = "clustering";
pub const TREND: &str = "trend";
pub const SERP: &str = "serp";

/// Container for all analyzer metrics
struct AnalyzerMetrics {
    analyses: CounterVec,
    errors: CounterVec,
    duration: HistogramVec,
    clustering_sizes: IntGaugeVec,
}

/// Global storage for analyzer metrics
static ANALYZER_METRICS: OnceLock<AnalyzerMetrics> = OnceLock::new();

/// Flag to track if initialization was attempted
static METRICS_INIT_ATTEMPTED: OnceLock<bool> = OnceLock::new();

// ============================================================================
// Initialization
// ============================================================================

/// Initialize all Prometheus metrics
///
/// This function should be called once at application startup.
/// If metric registration fails, subsequent metric operations become no-ops.
///
/// # Example
///
/// ```ignore
/// if let Err(e) = kwscope::metrics::init_metrics() {
///     eprintln!("Warning: Metrics initialization failed: {}", e);
/// }
/// ```
pub fn init_metrics() -> Result<(), Box<dyn std::error::Error>> {
    if METRICS_INIT_ATTEMPTED.get().is_some() {
        return Ok(());
    }
    METRICS_INIT_ATTEMPTED.set(true).ok();

    let metrics = AnalyzerMetrics {
        analyses: register_counter_vec!(
            "kwscope_analyses_total",
            "Total analyses run by analyzer",
            &["analyzer"]
        )?,
        errors: register_counter_vec!(
            "kwscope_analysis_errors_total",
            "Total failed analyses by analyzer",
            &["analyzer"]
        )?,
        duration: register_histogram_vec!(
            "kwscope_analysis_duration_seconds",
            "Analysis duration in seconds",
            &["analyzer"],
            vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0]
        )?,
        clustering_sizes: register_int_gauge_vec!(
            "kwscope_clustering_last_run_size",
            "Keyword and cluster counts of the most recent clustering run",
            &["kind"]
        )?,
    };

    ANALYZER_METRICS
        .set(metrics)
        .map_err(|_| "Analyzer metrics already initialized")?;

    tracing::info!("Prometheus metrics initialized successfully");
    Ok(())
}

/// Check if metrics have been initialized
pub fn metrics_initialized() -> bool {
    ANALYZER_METRICS.get().is_some()
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Render all registered metrics in the Prometheus text format
pub fn gather_text() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Record the outcome of one analysis
pub fn record_analysis(analyzer: &str, success: bool) {
    let Some(m) = ANALYZER_METRICS.get() else {
        return;
    };

    m.analyses.with_label_values(&[analyzer]).inc();
    if !success {
        m.errors.with_label_values(&[analyzer]).inc();
    }
}

/// Record the size of a clustering run
pub fn record_clustering_sizes(keywords: usize, clusters: usize) {
    if let Some(m) = ANALYZER_METRICS.get() {
        m.clustering_sizes
            .with_label_values(&["keywords"])
            .set(keywords as i64);
        m.clustering_sizes
            .with_label_values(&["clusters"])
            .set(clusters as i64);
    }
}

/// Histogram timer guard that records duration on drop
pub struct MetricsTimer {
    timer: Option<prometheus::HistogramTimer>,
}

impl MetricsTimer {
    fn new(timer: prometheus::HistogramTimer) -> Self {
        Self { timer: Some(timer) }
    }

    /// Create a no-op timer when metrics are not initialized
    fn noop() -> Self {
        Self { timer: None }
    }
}

impl Drop for MetricsTimer {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop_and_record();
        }
    }
}

/// Start an analysis timer (returns a timer handle)
pub fn start_analysis_timer(analyzer: &str) -> MetricsTimer {
    match ANALYZER_METRICS.get() {
        Some(m) => MetricsTimer::new(m.duration.with_label_values(&[analyzer]).start_timer()),
        None => MetricsTimer::noop(),
    }
}

/// Time `f` and record its outcome under `analyzer`
pub fn observe<T, E>(analyzer: &str, f: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
    let _timer = start_analysis_timer(analyzer);
    let result = f();
    record_analysis(analyzer, result.is_ok());
    result
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ensure_metrics_initialized() {
        let _ = init_metrics();
    }

    #[test]
    fn test_init_metrics() {
        assert!(init_metrics().is_ok());

        // Second call should also be Ok (idempotent)
        assert!(init_metrics().is_ok());
    }

    #[test]
    fn test_metrics_initialized() {
        ensure_metrics_initialized();
        assert!(metrics_initialized());
    }

    #[test]
    fn test_gather_text() {
        ensure_metrics_initialized();
        record_analysis(TREND, true);
        let text = gather_text().unwrap();
        assert!(text.contains("kwscope_analyses_total"));
    }

    #[test]
    fn test_observe_passes_result_through() {
        ensure_metrics_initialized();
        let ok: Result<u32, String> = observe(DIFFICULTY, || Ok(45));
        assert_eq!(ok, Ok(45));

        let err: Result<u32, String> = observe(SERP, || Err("bad".to_string()));
        assert!(err.is_err());
    }

    #[test]
    fn test_clustering_sizes() {
        ensure_metrics_initialized();
        record_clustering_sizes(120, 8);
        let _timer = start_analysis_timer(CLUSTERING);
    }
}
