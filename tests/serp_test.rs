//! Integration tests for SERP analysis

use kwscope::error::InputError;
use kwscope::models::{DifficultyLevel, SerpFeatureKind};
use kwscope::serp::{
    analyze_serp_data, CompetitionLevel, OrganicResult, Priority, SerpAnalysisData, SerpFeature,
};

fn organic(position: u32, domain: &str, da: f64, length: u64, speed: f64, links: u64) -> OrganicResult {
    OrganicResult {
        page_authority: da * 0.8,
        content_length: length,
        page_speed: speed,
        backlinks: links,
        structured_data: true,
        title_match: true,
        ..OrganicResult::new(position, domain, da)
    }
}

fn commercial_serp() -> SerpAnalysisData {
    let mut data = SerpAnalysisData::new("best crm software", 4)
        .with_feature(SerpFeature::present(SerpFeatureKind::FeaturedSnippet))
        .with_feature(SerpFeature::present(SerpFeatureKind::PeopleAlsoAsk))
        .with_feature(SerpFeature::absent(SerpFeatureKind::Videos));
    data.location = "us".to_string();

    let rows = [
        ("hubspot.com", 93.0, 3500, 85.0, 120_000),
        ("salesforce.com", 95.0, 2800, 80.0, 150_000),
        ("hubspot.com", 93.0, 2600, 85.0, 90_000),
        ("zoho.com", 90.0, 2400, 75.0, 60_000),
        ("g2.com", 91.0, 4100, 70.0, 80_000),
        ("smallblog.net", 22.0, 900, 40.0, 300),
        ("capterra.com", 89.0, 3000, 72.0, 70_000),
        ("pcmag.com", 92.0, 2900, 65.0, 65_000),
        ("forbes.com", 95.0, 2500, 60.0, 100_000),
        ("techradar.com", 90.0, 2700, 68.0, 55_000),
        ("eleventh.com", 10.0, 100, 10.0, 1),
    ];
    for (i, (domain, da, length, speed, links)) in rows.into_iter().enumerate() {
        data = data.with_result(organic(i as u32 + 1, domain, da, length, speed, links));
    }
    data
}

#[test]
fn test_commercial_serp_overview() {
    let result = analyze_serp_data(&commercial_serp()).unwrap();
    let overview = &result.overview;

    // 10 - 4 ads - 0.5 * 2 features
    assert_eq!(overview.organic_spots, 5.0);
    // 4 * 2 + 2 * 1.5 = 11
    assert_eq!(overview.competition_level, CompetitionLevel::Extreme);
    assert_eq!(overview.present_features.len(), 2);

    let clicks = &overview.click_distribution;
    assert!((clicks.organic + clicks.paid + clicks.features - 100.0).abs() < 0.2);
    assert!(clicks.organic < 65.0);
    assert_eq!(clicks.paid, 15.0);
}

#[test]
fn test_only_top_ten_are_analyzed() {
    let result = analyze_serp_data(&commercial_serp()).unwrap();
    assert_eq!(result.organic_analysis.results_analyzed, 10);
    assert!(result
        .organic_analysis
        .weak_competitors
        .iter()
        .all(|w| w.domain != "eleventh.com"));
}

#[test]
fn test_weak_competitor_flagged() {
    let result = analyze_serp_data(&commercial_serp()).unwrap();
    let weak = result
        .organic_analysis
        .weak_competitors
        .iter()
        .find(|w| w.domain == "smallblog.net")
        .expect("smallblog.net should be weak");
    assert_eq!(weak.position, 6);
    assert!(weak.weaknesses.contains(&"domain authority".to_string()));
    assert!(result
        .organic_analysis
        .optimization_opportunities
        .iter()
        .any(|o| o.contains("smallblog.net")));
}

#[test]
fn test_long_form_content_gap() {
    let result = analyze_serp_data(&commercial_serp()).unwrap();
    assert!(result.organic_analysis.averages.content_length > 2000.0);
    assert!(result
        .organic_analysis
        .content_gaps
        .iter()
        .any(|g| g.starts_with("Long-form content needed")));
}

#[test]
fn test_competitor_insights() {
    let result = analyze_serp_data(&commercial_serp()).unwrap();
    let insights = &result.competitor_insights;

    assert_eq!(insights.dominant_domains.len(), 1);
    assert_eq!(insights.dominant_domains[0].domain, "hubspot.com");
    assert_eq!(insights.dominant_domains[0].positions, vec![1, 3]);
    assert!((insights.dominant_domains[0].share - 0.2).abs() < 1e-9);

    assert_eq!(insights.weakest.as_ref().unwrap().domain, "smallblog.net");
    assert_ne!(insights.strongest.as_ref().unwrap().domain, "smallblog.net");
}

#[test]
fn test_feature_opportunities_for_absent_features() {
    let result = analyze_serp_data(&commercial_serp()).unwrap();
    let features: Vec<SerpFeatureKind> = result
        .feature_opportunities
        .iter()
        .map(|o| o.feature)
        .collect();

    assert!(!features.contains(&SerpFeatureKind::FeaturedSnippet));
    assert!(!features.contains(&SerpFeatureKind::PeopleAlsoAsk));
    assert!(features.contains(&SerpFeatureKind::Videos));
    assert!(result
        .feature_opportunities
        .iter()
        .all(|o| o.priority != Priority::High));
    assert!(result.feature_opportunities.iter().all(|o| !o.actions.is_empty()));
}

#[test]
fn test_difficulty_breakdown() {
    let result = analyze_serp_data(&commercial_serp()).unwrap();
    let difficulty = &result.difficulty;

    let sum: f64 = difficulty.factors.iter().map(|f| f.value).sum();
    assert_eq!(difficulty.score, sum.min(100.0).round() as u32);
    assert_eq!(difficulty.factors[0].value, 40.0);
    assert_eq!(difficulty.factors[1].value, 10.0);
    assert!(difficulty.level >= DifficultyLevel::VeryHard);
    assert!(!result.recommendations.is_empty());
}

#[test]
fn test_json_input_round_trip() {
    let json = r#"{
        "keyword": "crm",
        "paid_ads": 1,
        "features": [{"type": "images", "present": true, "impact": "low"}],
        "organic_results": [
            {"position": 1, "domain": "a.com", "domain_authority": 40.0}
        ]
    }"#;
    let data: SerpAnalysisData = serde_json::from_str(json).unwrap();
    let result = analyze_serp_data(&data).unwrap();

    assert_eq!(result.overview.competition_level, CompetitionLevel::Medium);
    assert_eq!(result.difficulty.score, 30);
}

#[test]
fn test_invalid_input_rejected() {
    let data = SerpAnalysisData::new("", 0);
    assert_eq!(analyze_serp_data(&data).unwrap_err(), InputError::EmptyKeyword);

    let data = SerpAnalysisData::new("crm", 0).with_result(OrganicResult::new(1, "", 10.0));
    assert!(matches!(
        analyze_serp_data(&data).unwrap_err(),
        InputError::InvalidRecord { index: 0, .. }
    ));
}

#[test]
fn test_identical_inputs_give_identical_results() {
    let data = commercial_serp();
    let first = analyze_serp_data(&data).unwrap();
    let second = analyze_serp_data(&data).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
