//! Keyword difficulty scoring
//!
//! Combines seven weighted factors (see [`factors`]) into a 0-100 difficulty
//! score, a qualitative level, a success probability and recommendations.

pub mod factors;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::InputError;
use crate::models::{CompetitorMetrics, DifficultyLevel, Impact, SerpSnapshot};

pub use factors::{DifficultyFactor, FactorKind};

/// Factors above this value with negative impact produce targeted advice
const STRONG_FACTOR_THRESHOLD: f64 = 70.0;

/// Expected effort to rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffortLevel {
    Minimal,
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl EffortLevel {
    fn from_score(score: u32) -> Self {
        match score {
            0..=19 => Self::Minimal,
            20..=34 => Self::Low,
            35..=49 => Self::Moderate,
            50..=64 => Self::High,
            65..=79 => Self::VeryHigh,
            _ => Self::Extreme,
        }
    }
}

/// Complete difficulty assessment for one keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyAnalysisResult {
    pub keyword: String,
    pub location: String,
    pub search_volume: u64,

    /// Weighted difficulty (0-100)
    pub overall_score: u32,

    pub level: DifficultyLevel,
    pub factors: Vec<DifficultyFactor>,

    /// Estimated chance of reaching the first page (5-95)
    pub success_probability: u32,

    /// Expected time to rank, e.g. "3-6 months"
    pub time_to_rank: String,

    pub effort_required: EffortLevel,

    /// Competitors among the top five with a strength above 50
    pub strong_competitors: usize,

    pub competitor_count: usize,
    pub recommendations: Vec<String>,
}

impl DifficultyAnalysisResult {
    /// Look up a factor by kind
    #[must_use]
    pub fn factor(&self, kind: FactorKind) -> Option<&DifficultyFactor> {
        self.factors.iter().find(|f| f.kind == kind)
    }
}

/// Score how hard it is to rank for `keyword`
///
/// Competitors are expected in ranking order. An empty competitor list is
/// not an error: competitor-driven factors fall back to fixed constants.
pub fn analyze_difficulty(
    keyword: &str,
    search_volume: u64,
    competitors: &[CompetitorMetrics],
    serp: &SerpSnapshot,
    location: &str,
) -> Result<DifficultyAnalysisResult, InputError> {
    if keyword.trim().is_empty() {
        return Err(InputError::EmptyKeyword);
    }
    for (index, competitor) in competitors.iter().enumerate() {
        competitor.validate().map_err(|e| e.at(index))?;
    }

    if competitors.is_empty() {
        warn!(keyword, "No competitor data supplied, using fallback factor values");
    }

    let (top_competitors, strong_competitors) = factors::top_competitor_factor(competitors);
    let factors = vec![
        factors::volume_factor(search_volume),
        factors::competition_factor(competitors),
        top_competitors,
        factors::serp_features_factor(serp),
        factors::content_quality_factor(keyword, competitors),
        factors::backlink_factor(competitors),
        factors::commercial_intent_factor(keyword),
    ];

    let overall_score = overall_score(&factors);
    let success_probability = success_probability(overall_score, &factors);

    debug!(
        keyword,
        location,
        search_volume,
        overall_score,
        success_probability,
        strong_competitors,
        "Keyword difficulty computed"
    );

    Ok(DifficultyAnalysisResult {
        keyword: keyword.to_string(),
        location: location.to_string(),
        search_volume,
        overall_score,
        level: DifficultyLevel::from_score(f64::from(overall_score)),
        success_probability,
        time_to_rank: time_to_rank(overall_score).to_string(),
        effort_required: EffortLevel::from_score(overall_score),
        strong_competitors,
        competitor_count: competitors.len(),
        recommendations: recommendations(overall_score, &factors),
        factors,
    })
}

/// Weighted average of factor contributions, rounded to an integer
#[must_use]
pub fn overall_score(factors: &[DifficultyFactor]) -> u32 {
    let total_weight: f64 = factors.iter().map(|f| f.weight).sum();
    if total_weight <= 0.0 {
        return 0;
    }

    let weighted: f64 = factors
        .iter()
        .map(|f| f.difficulty_contribution() * f.weight)
        .sum();

    (weighted / total_weight).round().clamp(0.0, 100.0) as u32
}

/// Chance of success, penalized for very high volume and competition
#[must_use]
pub fn success_probability(score: u32, factors: &[DifficultyFactor]) -> u32 {
    let value_of = |kind: FactorKind| {
        factors
            .iter()
            .find(|f| f.kind == kind)
            .map_or(0.0, |f| f.value)
    };

    let mut probability = (100 - i64::from(score.min(100))).clamp(5, 95);
    if value_of(FactorKind::SearchVolume) > 80.0 {
        probability -= 10;
    }
    if value_of(FactorKind::CompetitionLevel) > 70.0 {
        probability -= 15;
    }

    probability.clamp(5, 95) as u32
}

fn time_to_rank(score: u32) -> &'static str {
    match score {
        0..=19 => "1-3 months",
        20..=34 => "2-4 months",
        35..=49 => "3-6 months",
        50..=64 => "6-9 months",
        65..=79 => "9-12 months",
        _ => "12+ months",
    }
}

fn recommendations(score: u32, factors: &[DifficultyFactor]) -> Vec<String> {
    let mut recommendations: Vec<String> = match score {
        0..=34 => vec![
            "Target this keyword directly with well-optimized content".to_string(),
            "Quick ranking is realistic; publish and monitor within weeks".to_string(),
        ],
        35..=64 => vec![
            "Create comprehensive content that covers the topic better than current results"
                .to_string(),
            "Support the page with internal links and a moderate link-building effort".to_string(),
        ],
        _ => vec![
            "Consider long-tail variations before targeting this keyword directly".to_string(),
            "Plan a long-term authority-building campaign for this topic".to_string(),
        ],
    };

    recommendations.extend(
        factors
            .iter()
            .filter(|f| f.value > STRONG_FACTOR_THRESHOLD && f.impact == Impact::Negative)
            .map(|f| f.kind.recommendation().to_string()),
    );

    recommendations
}
