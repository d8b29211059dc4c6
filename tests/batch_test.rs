//! Integration tests for the concurrent batch driver

mod common;

use kwscope::batch::{BatchAnalyzer, BatchConfig, BatchRequest, TrendJob};
use kwscope::clustering::ClusteringOptions;
use kwscope::serp::{OrganicResult, SerpAnalysisData};
use kwscope::trend::TrendOptions;

use common::{linear_series, topical_keywords};

fn analyzer(max_concurrency: usize) -> BatchAnalyzer {
    BatchAnalyzer::new(BatchConfig { max_concurrency }).unwrap()
}

#[tokio::test]
async fn test_trend_batch_isolates_failures() {
    let jobs = vec![
        TrendJob {
            keyword: "growing".to_string(),
            series: linear_series(60, 2.0, 100.0),
        },
        TrendJob {
            keyword: "too short".to_string(),
            series: linear_series(10, 2.0, 100.0),
        },
        TrendJob {
            keyword: "declining".to_string(),
            series: linear_series(60, -1.0, 500.0),
        },
    ];

    let results = analyzer(1).trend_batch(jobs, TrendOptions::default()).await;
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().keyword, "growing");
    assert!(results[1].is_err());
    assert_eq!(results[2].as_ref().unwrap().keyword, "declining");
}

#[tokio::test]
async fn test_invalid_trend_options_fail_every_job() {
    let jobs = vec![TrendJob {
        keyword: "kw".to_string(),
        series: linear_series(60, 1.0, 10.0),
    }];
    let options = TrendOptions {
        smoothing_window: 0,
        ..Default::default()
    };

    let results = analyzer(2).trend_batch(jobs, options).await;
    assert_eq!(results.len(), 1);
    assert!(results[0].is_err());
}

#[tokio::test]
async fn test_run_mixed_request() {
    let request = BatchRequest {
        trends: vec![TrendJob {
            keyword: "growing".to_string(),
            series: linear_series(60, 2.0, 100.0),
        }],
        serp: vec![
            SerpAnalysisData::new("crm", 2).with_result(OrganicResult::new(1, "a.com", 60.0)),
            SerpAnalysisData::new("crm", 2).with_result(OrganicResult::new(1, "b.com", 260.0)),
        ],
        keywords: topical_keywords(),
        ..Default::default()
    };

    let report = analyzer(4)
        .run(request, TrendOptions::default(), ClusteringOptions::default())
        .await;

    assert_eq!(report.succeeded, 3);
    assert_eq!(report.failed, 1);
    assert!(report.serp[1].error.is_some());
    assert_eq!(report.serp[1].index, 1);
    let clustering = report.clustering.as_ref().unwrap().result.as_ref().unwrap();
    assert!(!clustering.clusters.is_empty());

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["serp"][1].get("result").is_none());
    assert_eq!(json["failed"], 1);
}
