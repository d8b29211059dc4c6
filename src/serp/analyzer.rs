use std::collections::BTreeMap;
use tracing::debug;

use super::types::{
    ClickDistribution, CompetitionLevel, CompetitorInsights, CompetitorScore, DomainShare,
    FeatureOpportunity, OrganicAnalysis, OrganicAverages, OrganicResult, Priority,
    SerpAnalysisData, SerpAnalysisResult, SerpDifficulty, SerpDifficultyFactor, SerpOverview,
    WeakCompetitor,
};
use crate::error::InputError;
use crate::models::{DifficultyLevel, SerpFeatureKind};
use crate::stats::{mean, round_to};

/// Results considered for organic and competitor analysis
pub const TOP_RESULTS: usize = 10;

/// Base click shares before feature adjustments
const BASE_ORGANIC_CTR: f64 = 0.65;
const BASE_PAID_CTR: f64 = 0.15;
const BASE_FEATURES_CTR: f64 = 0.20;

/// A competitor below this fraction of the average on a metric is weak there
const WEAKNESS_RATIO: f64 = 0.8;

const MAX_COUNTED_ADS: u32 = 4;
const MIN_ORGANIC_SPOTS: f64 = 3.0;
const MAX_ORGANIC_SPOTS: f64 = 10.0;

/// Average click-through share a present feature takes from organic results
fn feature_ctr(kind: SerpFeatureKind) -> f64 {
    match kind {
        SerpFeatureKind::FeaturedSnippet => 0.08,
        SerpFeatureKind::KnowledgePanel => 0.04,
        SerpFeatureKind::LocalPack => 0.06,
        SerpFeatureKind::Shopping => 0.05,
        SerpFeatureKind::Images => 0.02,
        SerpFeatureKind::Videos => 0.03,
        SerpFeatureKind::News => 0.02,
        SerpFeatureKind::PeopleAlsoAsk => 0.03,
        SerpFeatureKind::Sitelinks => 0.02,
        SerpFeatureKind::Reviews => 0.01,
    }
}

/// Features checked for gaps, with their fixed priority
const OPPORTUNITY_CANDIDATES: [(SerpFeatureKind, Priority); 6] = [
    (SerpFeatureKind::FeaturedSnippet, Priority::High),
    (SerpFeatureKind::PeopleAlsoAsk, Priority::High),
    (SerpFeatureKind::Images, Priority::Medium),
    (SerpFeatureKind::Videos, Priority::Medium),
    (SerpFeatureKind::Sitelinks, Priority::Low),
    (SerpFeatureKind::Reviews, Priority::Low),
];

fn opportunity_actions(kind: SerpFeatureKind) -> &'static [&'static str] {
    match kind {
        SerpFeatureKind::FeaturedSnippet => &[
            "Answer the core question in a 40-60 word paragraph",
            "Use question-style headings followed by direct answers",
            "Add ordered lists or tables for step and comparison queries",
        ],
        SerpFeatureKind::PeopleAlsoAsk => &[
            "Add an FAQ section covering related questions",
            "Mark up questions with FAQPage structured data",
        ],
        SerpFeatureKind::Images => &[
            "Publish original images with descriptive file names",
            "Write keyword-relevant alt text",
        ],
        SerpFeatureKind::Videos => &[
            "Produce a short video covering the topic",
            "Add VideoObject markup and timestamps",
        ],
        SerpFeatureKind::Sitelinks => &[
            "Strengthen site structure and internal linking",
            "Use clear, descriptive navigation labels",
        ],
        SerpFeatureKind::Reviews => &[
            "Collect customer reviews",
            "Add Review or AggregateRating markup",
        ],
        _ => &[],
    }
}

/// Analyze a results page for competitiveness and opportunities
///
/// # Errors
/// Returns an [`InputError`] if the keyword is empty or any organic
/// result carries out-of-range metrics.
pub fn analyze_serp_data(data: &SerpAnalysisData) -> Result<SerpAnalysisResult, InputError> {
    data.validate()?;

    let top = top_results(&data.organic_results);
    let overview = overview(data);
    let feature_opportunities = feature_opportunities(data);
    let organic_analysis = organic_analysis(&top);
    let competitor_insights = competitor_insights(&top);
    let difficulty = serp_difficulty(
        data.paid_ads,
        overview.present_features.len(),
        organic_analysis.averages.domain_authority,
    );
    let recommendations = recommendations(
        &overview,
        &feature_opportunities,
        &organic_analysis,
        &difficulty,
    );

    debug!(
        keyword = %data.keyword,
        paid_ads = data.paid_ads,
        features = overview.present_features.len(),
        results = top.len(),
        difficulty = difficulty.score,
        "SERP analysis completed"
    );

    Ok(SerpAnalysisResult {
        keyword: data.keyword.clone(),
        location: data.location.clone(),
        overview,
        feature_opportunities,
        organic_analysis,
        competitor_insights,
        difficulty,
        recommendations,
    })
}

/// The best-ranked results, ordered by position
fn top_results(results: &[OrganicResult]) -> Vec<&OrganicResult> {
    let mut top: Vec<&OrganicResult> = results.iter().collect();
    top.sort_by_key(|r| r.position);
    top.truncate(TOP_RESULTS);
    top
}

fn overview(data: &SerpAnalysisData) -> SerpOverview {
    let present: Vec<SerpFeatureKind> = data.present_features().into_iter().collect();
    let feature_count = present.len() as f64;

    let organic_spots = (MAX_ORGANIC_SPOTS
        - f64::from(data.paid_ads.min(MAX_COUNTED_ADS))
        - 0.5 * feature_count)
        .clamp(MIN_ORGANIC_SPOTS, MAX_ORGANIC_SPOTS);
    let pressure = f64::from(data.paid_ads) * 2.0 + feature_count * 1.5;

    SerpOverview {
        click_distribution: click_distribution(&present),
        present_features: present,
        paid_ads: data.paid_ads,
        organic_spots,
        competition_level: CompetitionLevel::from_pressure(pressure),
    }
}

/// Shift clicks from organic results to the features that capture them
pub fn click_distribution(present: &[SerpFeatureKind]) -> ClickDistribution {
    let mut organic = BASE_ORGANIC_CTR;
    let mut paid = BASE_PAID_CTR;
    let mut features = BASE_FEATURES_CTR;

    for &kind in present {
        let ctr = feature_ctr(kind).min(organic);
        organic -= ctr;
        if kind == SerpFeatureKind::Shopping {
            paid += ctr;
        } else {
            features += ctr;
        }
    }

    let total = organic + paid + features;
    ClickDistribution {
        organic: round_to(organic / total * 100.0, 1),
        paid: round_to(paid / total * 100.0, 1),
        features: round_to(features / total * 100.0, 1),
    }
}

fn feature_opportunities(data: &SerpAnalysisData) -> Vec<FeatureOpportunity> {
    let present = data.present_features();
    OPPORTUNITY_CANDIDATES
        .iter()
        .filter(|(kind, _)| !present.contains(kind))
        .map(|&(feature, priority)| FeatureOpportunity {
            feature,
            priority,
            actions: opportunity_actions(feature)
                .iter()
                .map(|a| (*a).to_string())
                .collect(),
        })
        .collect()
}

fn share(top: &[&OrganicResult], predicate: impl Fn(&OrganicResult) -> bool) -> f64 {
    if top.is_empty() {
        return 0.0;
    }
    top.iter().filter(|r| predicate(**r)).count() as f64 / top.len() as f64
}

fn organic_analysis(top: &[&OrganicResult]) -> OrganicAnalysis {
    let metric = |f: fn(&OrganicResult) -> f64| mean(&top.iter().map(|r| f(*r)).collect::<Vec<_>>());
    let averages = OrganicAverages {
        domain_authority: metric(|r| r.domain_authority),
        page_authority: metric(|r| r.page_authority),
        content_length: metric(|r| r.content_length as f64),
        page_speed: metric(|r| r.page_speed),
        backlinks: metric(|r| r.backlinks as f64),
    };

    let mut content_gaps = Vec::new();
    if averages.content_length > 2000.0 {
        content_gaps.push(format!(
            "Long-form content needed: top results average {:.0} words",
            averages.content_length
        ));
    } else if averages.content_length > 1200.0 {
        content_gaps.push(format!(
            "Comprehensive coverage expected: top results average {:.0} words",
            averages.content_length
        ));
    }
    if share(top, |r| r.structured_data) > 0.5 {
        content_gaps.push("Most top results use structured data markup".to_string());
    }
    if share(top, |r| r.title_match) > 0.7 {
        content_gaps.push("Include the exact keyword in the page title".to_string());
    }

    let mut technical_gaps = Vec::new();
    if averages.page_speed > 80.0 {
        technical_gaps.push(format!(
            "Fast pages required: top results average a speed score of {:.0}",
            averages.page_speed
        ));
    }
    if averages.domain_authority > 60.0 {
        technical_gaps.push("High-authority domains dominate; build topical authority first".to_string());
    }
    if averages.backlinks > 1000.0 {
        technical_gaps.push(format!(
            "Strong link profiles: top results average {:.0} backlinks",
            averages.backlinks
        ));
    }
    if share(top, |r| r.mobile_optimized) > 0.9 {
        technical_gaps.push("Mobile optimization is table stakes for this query".to_string());
    }
    if share(top, |r| r.https) > 0.9 {
        technical_gaps.push("Serve the page over HTTPS".to_string());
    }

    let weak_competitors: Vec<WeakCompetitor> = top
        .iter()
        .filter_map(|r| {
            let weaknesses: Vec<String> = [
                ("domain authority", r.domain_authority, averages.domain_authority),
                ("content length", r.content_length as f64, averages.content_length),
                ("page speed", r.page_speed, averages.page_speed),
                ("backlinks", r.backlinks as f64, averages.backlinks),
            ]
            .into_iter()
            .filter(|&(_, value, avg)| value < WEAKNESS_RATIO * avg)
            .map(|(name, _, _)| name.to_string())
            .collect();

            (!weaknesses.is_empty()).then(|| WeakCompetitor {
                position: r.position,
                domain: r.domain.clone(),
                weaknesses,
            })
        })
        .collect();

    let optimization_opportunities = weak_competitors
        .iter()
        .map(|w| {
            format!(
                "Position {} ({}) is beatable: below average {}",
                w.position,
                w.domain,
                w.weaknesses.join(", ")
            )
        })
        .collect();

    OrganicAnalysis {
        results_analyzed: top.len(),
        averages,
        content_gaps,
        technical_gaps,
        optimization_opportunities,
        weak_competitors,
    }
}

/// Composite strength of one ranking page
#[must_use]
pub fn competitor_score(r: &OrganicResult) -> f64 {
    let structured = if r.structured_data { 10.0 } else { 0.0 };
    0.3 * r.domain_authority
        + 0.2 * r.page_authority
        + 10.0 * (r.backlinks as f64 + 1.0).log10() * 0.2
        + 0.1 * r.page_speed
        + 0.1 * r.content_length as f64 / 100.0
        + 0.1 * structured
}

fn competitor_insights(top: &[&OrganicResult]) -> CompetitorInsights {
    let mut by_domain: BTreeMap<&str, Vec<u32>> = BTreeMap::new();
    for r in top {
        by_domain.entry(r.domain.as_str()).or_default().push(r.position);
    }

    let mut dominant_domains: Vec<DomainShare> = by_domain
        .into_iter()
        .filter(|(_, positions)| positions.len() > 1)
        .map(|(domain, positions)| DomainShare {
            domain: domain.to_string(),
            share: positions.len() as f64 / top.len() as f64,
            positions,
        })
        .collect();
    dominant_domains.sort_by(|a, b| {
        b.positions
            .len()
            .cmp(&a.positions.len())
            .then_with(|| a.positions[0].cmp(&b.positions[0]))
    });

    let scored: Vec<CompetitorScore> = top
        .iter()
        .map(|r| CompetitorScore {
            position: r.position,
            domain: r.domain.clone(),
            score: round_to(competitor_score(r), 2),
        })
        .collect();

    // First occurrence wins ties in both directions
    let strongest = scored
        .iter()
        .fold(None::<&CompetitorScore>, |best, s| match best {
            Some(b) if s.score <= b.score => Some(b),
            _ => Some(s),
        })
        .cloned();
    let weakest = scored
        .iter()
        .fold(None::<&CompetitorScore>, |worst, s| match worst {
            Some(w) if s.score >= w.score => Some(w),
            _ => Some(s),
        })
        .cloned();

    CompetitorInsights {
        dominant_domains,
        strongest,
        weakest,
        average_score: round_to(mean(&scored.iter().map(|s| s.score).collect::<Vec<_>>()), 2),
    }
}

/// Additive SERP difficulty with each term kept as a labeled factor
#[must_use]
pub fn serp_difficulty(paid_ads: u32, present_features: usize, avg_domain_authority: f64) -> SerpDifficulty {
    let factors = vec![
        SerpDifficultyFactor {
            name: "Paid ads".to_string(),
            value: 10.0 * f64::from(paid_ads),
            description: format!("{paid_ads} ads push organic results down"),
        },
        SerpDifficultyFactor {
            name: "SERP features".to_string(),
            value: 5.0 * present_features as f64,
            description: format!("{present_features} features compete for clicks"),
        },
        SerpDifficultyFactor {
            name: "Competitor authority".to_string(),
            value: 0.375 * avg_domain_authority,
            description: format!("Top results average DA {avg_domain_authority:.0}"),
        },
    ];

    let total: f64 = factors.iter().map(|f| f.value).sum();
    let score = total.min(100.0).round() as u32;

    SerpDifficulty {
        score,
        level: DifficultyLevel::from_score(f64::from(score)),
        factors,
    }
}

fn recommendations(
    overview: &SerpOverview,
    opportunities: &[FeatureOpportunity],
    organic: &OrganicAnalysis,
    difficulty: &SerpDifficulty,
) -> Vec<String> {
    let mut recs = Vec::new();

    match overview.competition_level {
        CompetitionLevel::Extreme | CompetitionLevel::High => recs.push(
            "Heavy commercial competition: target long-tail variations or consider paid search"
                .to_string(),
        ),
        CompetitionLevel::Medium => {
            recs.push("Moderate competition: differentiate with depth and SERP features".to_string())
        }
        CompetitionLevel::Low => {
            recs.push("Low competition: a well-optimized page can rank quickly".to_string())
        }
    }

    if let Some(top) = opportunities.iter().find(|o| o.priority == Priority::High) {
        recs.push(format!("Target the {} opportunity", top.feature.label().to_lowercase()));
    }

    if !organic.weak_competitors.is_empty() {
        recs.push(format!(
            "{} top-10 result(s) show weaknesses you can outperform",
            organic.weak_competitors.len()
        ));
    }

    if overview.organic_spots <= 5.0 {
        recs.push("Few organic spots are visible; optimize titles and snippets for click-through".to_string());
    }

    if difficulty.score >= 65 {
        recs.push("Build authority with supporting content before targeting this keyword".to_string());
    }

    recs
}
