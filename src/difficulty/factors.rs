//! Seven-factor keyword difficulty model
//!
//! Weights: search volume=0.15, competition level=0.20, top-competitor
//! strength=0.25, SERP features=0.15, content quality=0.10, backlinks=0.10,
//! commercial intent=0.05.
//!
//! Every factor value is clamped to `[0, 100]`. Empty competitor lists fall
//! back to fixed constants instead of failing.

use serde::{Deserialize, Serialize};

use crate::models::{CompetitorMetrics, Impact, SerpFeatureKind, SerpSnapshot};
use crate::stats::{clamp_score, mean};
use crate::utils::word_count;

pub const WEIGHT_SEARCH_VOLUME: f64 = 0.15;
pub const WEIGHT_COMPETITION_LEVEL: f64 = 0.20;
pub const WEIGHT_TOP_COMPETITOR_STRENGTH: f64 = 0.25;
pub const WEIGHT_SERP_FEATURES: f64 = 0.15;
pub const WEIGHT_CONTENT_QUALITY: f64 = 0.10;
pub const WEIGHT_BACKLINK_REQUIREMENT: f64 = 0.10;
pub const WEIGHT_COMMERCIAL_INTENT: f64 = 0.05;

/// Competition factor used when no competitor data is available
pub const FALLBACK_COMPETITION: f64 = 50.0;

/// Top-competitor strength used when no competitor data is available
pub const FALLBACK_COMPETITOR_STRENGTH: f64 = 50.0;

/// Number of leading competitors considered for strength scoring
pub const TOP_COMPETITORS: usize = 5;

/// A competitor scoring above this is counted as strong
pub const STRONG_COMPETITOR_THRESHOLD: f64 = 50.0;

const TRANSACTIONAL_TERMS: &[&str] = &[
    "buy", "price", "cheap", "discount", "coupon", "order", "purchase", "for sale", "shop",
    "comprar", "precio", "barato", "oferta",
];

const COMMERCIAL_TERMS: &[&str] = &[
    "best", "review", "compare", "comparison", " vs ", "alternative", "mejor", "opiniones",
];

const INFORMATIONAL_TERMS: &[&str] = &[
    "how to", "what is", "guide", "tutorial", "tips", "why", "learn", "como", "qué es", "guía",
];

/// Identity of a difficulty factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    SearchVolume,
    CompetitionLevel,
    TopCompetitorStrength,
    SerpFeatures,
    ContentQuality,
    BacklinkRequirement,
    CommercialIntent,
}

impl FactorKind {
    /// All factors in evaluation order
    pub const ALL: [Self; 7] = [
        Self::SearchVolume,
        Self::CompetitionLevel,
        Self::TopCompetitorStrength,
        Self::SerpFeatures,
        Self::ContentQuality,
        Self::BacklinkRequirement,
        Self::CommercialIntent,
    ];

    /// Fixed weight of this factor in the overall score
    #[must_use]
    pub fn weight(&self) -> f64 {
        match self {
            Self::SearchVolume => WEIGHT_SEARCH_VOLUME,
            Self::CompetitionLevel => WEIGHT_COMPETITION_LEVEL,
            Self::TopCompetitorStrength => WEIGHT_TOP_COMPETITOR_STRENGTH,
            Self::SerpFeatures => WEIGHT_SERP_FEATURES,
            Self::ContentQuality => WEIGHT_CONTENT_QUALITY,
            Self::BacklinkRequirement => WEIGHT_BACKLINK_REQUIREMENT,
            Self::CommercialIntent => WEIGHT_COMMERCIAL_INTENT,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::SearchVolume => "Search Volume",
            Self::CompetitionLevel => "Competition Level",
            Self::TopCompetitorStrength => "Top Competitor Strength",
            Self::SerpFeatures => "SERP Features",
            Self::ContentQuality => "Content Quality Requirement",
            Self::BacklinkRequirement => "Backlink Requirement",
            Self::CommercialIntent => "Commercial Intent",
        }
    }

    /// Advice emitted when this factor is a strong negative
    #[must_use]
    pub fn recommendation(&self) -> &'static str {
        match self {
            Self::SearchVolume => {
                "High search volume attracts heavy competition; build topical authority with supporting content first"
            }
            Self::CompetitionLevel => {
                "Competing domains have strong authority; earn links from high-authority sites in your niche"
            }
            Self::TopCompetitorStrength => {
                "Top results are dominated by strong pages; differentiate with original data, tools or formats"
            }
            Self::SerpFeatures => {
                "SERP features push organic results down; optimize for featured snippets and rich results"
            }
            Self::ContentQuality => {
                "Produce in-depth content that exceeds competitor length and topical coverage"
            }
            Self::BacklinkRequirement => {
                "A significant backlink profile is required; prioritize a sustained link acquisition campaign"
            }
            Self::CommercialIntent => {
                "Commercial intent is strong; optimize landing pages for conversions and comparisons"
            }
        }
    }
}

/// One scored component of keyword difficulty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyFactor {
    pub kind: FactorKind,
    pub name: String,

    /// Factor score (0-100)
    pub value: f64,

    /// Fixed weight (0-1)
    pub weight: f64,

    pub impact: Impact,
    pub description: String,
}

impl DifficultyFactor {
    fn new(kind: FactorKind, value: f64, impact: Impact, description: impl Into<String>) -> Self {
        Self {
            kind,
            name: kind.label().to_string(),
            value: clamp_score(value),
            weight: kind.weight(),
            impact,
            description: description.into(),
        }
    }

    /// Contribution of this factor to the difficulty score before weighting
    ///
    /// Negative factors count at face value; positive factors are inverted.
    #[must_use]
    pub fn difficulty_contribution(&self) -> f64 {
        match self.impact {
            Impact::Negative => self.value,
            Impact::Positive => 100.0 - self.value,
        }
    }
}

/// Sum of all factor weights (always 1.0)
#[must_use]
pub fn total_weight() -> f64 {
    FactorKind::ALL.iter().map(FactorKind::weight).sum()
}

/// Banded search volume score
///
/// Thresholds 100 / 1k / 10k / 50k map to 10 / 25 / 50 / 75 / 90.
#[must_use]
pub fn volume_factor(search_volume: u64) -> DifficultyFactor {
    let (value, description) = match search_volume {
        0..=99 => (10.0, "Very low search volume, little competition for traffic"),
        100..=999 => (25.0, "Low search volume, niche opportunity"),
        1_000..=9_999 => (50.0, "Moderate search volume"),
        10_000..=49_999 => (75.0, "High search volume attracts many competitors"),
        _ => (90.0, "Very high search volume, heavily contested"),
    };

    let impact = if search_volume < 1_000 {
        Impact::Positive
    } else {
        Impact::Negative
    };

    DifficultyFactor::new(FactorKind::SearchVolume, value, impact, description)
}

/// Competition level from average domain authority and backlinks
#[must_use]
pub fn competition_factor(competitors: &[CompetitorMetrics]) -> DifficultyFactor {
    if competitors.is_empty() {
        return DifficultyFactor::new(
            FactorKind::CompetitionLevel,
            FALLBACK_COMPETITION,
            Impact::Negative,
            "No competitor data available; assuming moderate competition",
        );
    }

    let avg_da = mean(&domain_authorities(competitors));
    let avg_backlinks = mean(&backlink_counts(competitors));

    let mut value = 30.0;
    value += if avg_da > 80.0 {
        30.0
    } else if avg_da > 60.0 {
        20.0
    } else if avg_da > 40.0 {
        10.0
    } else {
        -5.0
    };
    value += if avg_backlinks > 100_000.0 {
        25.0
    } else if avg_backlinks > 10_000.0 {
        20.0
    } else if avg_backlinks > 1_000.0 {
        15.0
    } else {
        10.0
    };

    let description = format!(
        "Competitors average DA {avg_da:.0} with {avg_backlinks:.0} backlinks"
    );
    DifficultyFactor::new(FactorKind::CompetitionLevel, value, Impact::Negative, description)
}

/// Per-competitor strength sub-score
///
/// Base 20 plus bands on domain authority, backlinks, content length and
/// page speed.
#[must_use]
pub fn competitor_strength(competitor: &CompetitorMetrics) -> f64 {
    let mut score = 20.0;

    score += if competitor.domain_authority > 80.0 {
        25.0
    } else if competitor.domain_authority > 60.0 {
        20.0
    } else if competitor.domain_authority > 40.0 {
        15.0
    } else {
        10.0
    };

    score += match competitor.backlinks {
        b if b > 100_000 => 20.0,
        b if b > 10_000 => 15.0,
        b if b > 1_000 => 10.0,
        _ => 5.0,
    };

    if competitor.content_length > 3_000 {
        score += 10.0;
    } else if competitor.content_length > 1_500 {
        score += 5.0;
    }

    if competitor.page_speed > 90.0 {
        score += 5.0;
    } else if competitor.page_speed < 50.0 {
        score -= 5.0;
    }

    clamp_score(score)
}

/// Average strength of the top competitors and how many of them are strong
#[must_use]
pub fn top_competitor_factor(competitors: &[CompetitorMetrics]) -> (DifficultyFactor, usize) {
    if competitors.is_empty() {
        let factor = DifficultyFactor::new(
            FactorKind::TopCompetitorStrength,
            FALLBACK_COMPETITOR_STRENGTH,
            Impact::Negative,
            "No competitor data available; assuming average competitor strength",
        );
        return (factor, 0);
    }

    let scores: Vec<f64> = competitors
        .iter()
        .take(TOP_COMPETITORS)
        .map(competitor_strength)
        .collect();
    let strong = scores
        .iter()
        .filter(|&&s| s > STRONG_COMPETITOR_THRESHOLD)
        .count();

    let description = match strong {
        0 => "Top results are held by weak competitors".to_string(),
        1 | 2 => format!("{strong} strong competitor(s) in the top results"),
        _ => format!("Top results dominated by {strong} strong competitors"),
    };

    let factor = DifficultyFactor::new(
        FactorKind::TopCompetitorStrength,
        mean(&scores),
        Impact::Negative,
        description,
    );
    (factor, strong)
}

/// Point cost of a SERP feature for organic visibility
#[must_use]
pub fn serp_feature_points(feature: SerpFeatureKind) -> f64 {
    match feature {
        SerpFeatureKind::FeaturedSnippet => 15.0,
        SerpFeatureKind::KnowledgePanel => 10.0,
        SerpFeatureKind::LocalPack => 12.0,
        SerpFeatureKind::Shopping => 8.0,
        SerpFeatureKind::Images => 5.0,
        SerpFeatureKind::Videos => 7.0,
        SerpFeatureKind::News => 6.0,
        SerpFeatureKind::PeopleAlsoAsk => 4.0,
        SerpFeatureKind::Sitelinks | SerpFeatureKind::Reviews => 0.0,
    }
}

/// Additive SERP feature pressure plus three points per paid ad, capped at 100
#[must_use]
pub fn serp_features_factor(serp: &SerpSnapshot) -> DifficultyFactor {
    let feature_points: f64 = serp.features.iter().copied().map(serp_feature_points).sum();
    let value = (feature_points + f64::from(serp.paid_ads) * 3.0).min(100.0);

    let description = if serp.features.is_empty() && serp.paid_ads == 0 {
        "Clean SERP with no ads or special features".to_string()
    } else {
        let names: Vec<&str> = serp.features.iter().map(SerpFeatureKind::label).collect();
        format!(
            "{} paid ad(s); features: {}",
            serp.paid_ads,
            if names.is_empty() {
                "none".to_string()
            } else {
                names.join(", ")
            }
        )
    };

    DifficultyFactor::new(FactorKind::SerpFeatures, value, Impact::Negative, description)
}

/// Content depth needed to compete
#[must_use]
pub fn content_quality_factor(keyword: &str, competitors: &[CompetitorMetrics]) -> DifficultyFactor {
    let mut value = 30.0;

    if !competitors.is_empty() {
        let lengths: Vec<f64> = competitors.iter().map(|c| c.content_length as f64).collect();
        let avg_length = mean(&lengths);
        let max_length = lengths.iter().copied().fold(0.0, f64::max);

        value += if avg_length > 3_000.0 {
            25.0
        } else if avg_length > 2_000.0 {
            15.0
        } else if avg_length > 1_000.0 {
            10.0
        } else {
            0.0
        };
        value += if max_length > 5_000.0 {
            15.0
        } else if max_length > 3_000.0 {
            10.0
        } else {
            0.0
        };
    }

    let words = word_count(keyword);
    if words == 1 {
        value += 10.0;
    } else if words > 4 {
        value -= 5.0;
    }

    let description = if value >= 60.0 {
        "Comprehensive long-form content required"
    } else if value >= 40.0 {
        "Solid, well-structured content required"
    } else {
        "Standard content depth is sufficient"
    };

    DifficultyFactor::new(FactorKind::ContentQuality, value, Impact::Negative, description)
}

/// Link profile needed to compete
#[must_use]
pub fn backlink_factor(competitors: &[CompetitorMetrics]) -> DifficultyFactor {
    let mut value = 20.0;

    if !competitors.is_empty() {
        let avg_backlinks = mean(&backlink_counts(competitors));
        let avg_domains = mean(
            &competitors
                .iter()
                .map(|c| c.referring_domains as f64)
                .collect::<Vec<_>>(),
        );

        value += if avg_backlinks > 100_000.0 {
            40.0
        } else if avg_backlinks > 10_000.0 {
            30.0
        } else if avg_backlinks > 1_000.0 {
            20.0
        } else if avg_backlinks > 100.0 {
            10.0
        } else {
            0.0
        };
        value += if avg_domains > 1_000.0 {
            30.0
        } else if avg_domains > 500.0 {
            20.0
        } else if avg_domains > 100.0 {
            10.0
        } else if avg_domains > 10.0 {
            5.0
        } else {
            0.0
        };
    }

    let description = if value >= 70.0 {
        "Strong backlink profile from many referring domains needed"
    } else if value >= 40.0 {
        "Moderate link building needed"
    } else {
        "Few backlinks needed to compete"
    };

    DifficultyFactor::new(
        FactorKind::BacklinkRequirement,
        value,
        Impact::Negative,
        description,
    )
}

/// Commercial intent from fixed term lists; first match wins
///
/// Transactional terms are checked first, then commercial, then
/// informational.
#[must_use]
pub fn commercial_intent_factor(keyword: &str) -> DifficultyFactor {
    let padded = format!(" {} ", keyword.to_lowercase());
    let contains_any = |terms: &[&str]| terms.iter().any(|term| padded.contains(term));

    let (value, impact, description) = if contains_any(TRANSACTIONAL_TERMS) {
        (80.0, Impact::Negative, "Transactional intent: high commercial value")
    } else if contains_any(COMMERCIAL_TERMS) {
        (60.0, Impact::Negative, "Commercial investigation intent")
    } else if contains_any(INFORMATIONAL_TERMS) {
        (25.0, Impact::Positive, "Informational intent: lower commercial pressure")
    } else {
        (35.0, Impact::Positive, "Mixed or unclear intent")
    };

    DifficultyFactor::new(FactorKind::CommercialIntent, value, impact, description)
}

fn domain_authorities(competitors: &[CompetitorMetrics]) -> Vec<f64> {
    competitors.iter().map(|c| c.domain_authority).collect()
}

fn backlink_counts(competitors: &[CompetitorMetrics]) -> Vec<f64> {
    competitors.iter().map(|c| c.backlinks as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn competitor(da: f64, backlinks: u64) -> CompetitorMetrics {
        CompetitorMetrics {
            backlinks,
            referring_domains: backlinks / 10,
            content_length: 1_800,
            page_speed: 70.0,
            ..CompetitorMetrics::new("example.com", da)
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        assert!((total_weight() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_volume_bands() {
        assert_eq!(volume_factor(50).value, 10.0);
        assert_eq!(volume_factor(500).value, 25.0);
        assert_eq!(volume_factor(5_000).value, 50.0);
        assert_eq!(volume_factor(20_000).value, 75.0);
        assert_eq!(volume_factor(80_000).value, 90.0);
        assert_eq!(volume_factor(50).impact, Impact::Positive);
        assert_eq!(volume_factor(80_000).impact, Impact::Negative);
    }

    #[test]
    fn test_competition_bands() {
        let strong = competition_factor(&[competitor(85.0, 200_000)]);
        assert_eq!(strong.value, 85.0); // 30 + 30 + 25

        let weak = competition_factor(&[competitor(20.0, 50)]);
        assert_eq!(weak.value, 35.0); // 30 - 5 + 10

        assert_eq!(competition_factor(&[]).value, FALLBACK_COMPETITION);
    }

    #[test]
    fn test_competitor_strength_bands() {
        let mut c = competitor(85.0, 200_000);
        c.content_length = 4_000;
        c.page_speed = 95.0;
        assert_eq!(competitor_strength(&c), 80.0); // 20 + 25 + 20 + 10 + 5

        let mut weak = competitor(10.0, 10);
        weak.content_length = 200;
        weak.page_speed = 30.0;
        assert_eq!(competitor_strength(&weak), 30.0); // 20 + 10 + 5 - 5
    }

    #[test]
    fn test_top_competitor_counts_strong() {
        let competitors = vec![
            competitor(85.0, 200_000),
            competitor(70.0, 20_000),
            competitor(10.0, 10),
        ];
        let (factor, strong) = top_competitor_factor(&competitors);
        assert_eq!(strong, 2);
        assert!(factor.value > 40.0);
    }

    #[test]
    fn test_top_competitor_only_uses_first_five() {
        let mut competitors = vec![competitor(10.0, 10); TOP_COMPETITORS];
        competitors.push(competitor(95.0, 500_000));
        let (_, strong) = top_competitor_factor(&competitors);
        assert_eq!(strong, 0);
    }

    #[test]
    fn test_serp_feature_cost() {
        let factor = serp_features_factor(&SerpSnapshot::default());
        assert_eq!(factor.value, 39.0); // 15 + 12 + 4 * 3

        let crowded = SerpSnapshot {
            paid_ads: 30,
            features: [
                SerpFeatureKind::FeaturedSnippet,
                SerpFeatureKind::KnowledgePanel,
            ]
            .into_iter()
            .collect(),
        };
        assert_eq!(serp_features_factor(&crowded).value, 100.0);
    }

    #[test]
    fn test_content_quality_keyword_length() {
        assert_eq!(content_quality_factor("shoes", &[]).value, 40.0);
        assert_eq!(content_quality_factor("buy running shoes", &[]).value, 30.0);
        assert_eq!(
            content_quality_factor("best trail running shoes for women", &[]).value,
            25.0
        );
    }

    #[test]
    fn test_backlink_fallback() {
        assert_eq!(backlink_factor(&[]).value, 20.0);
        let heavy = backlink_factor(&[competitor(60.0, 150_000)]);
        assert_eq!(heavy.value, 90.0); // 20 + 40 + 30
    }

    #[test]
    fn test_commercial_intent_order() {
        assert_eq!(commercial_intent_factor("buy running shoes").value, 80.0);
        assert_eq!(commercial_intent_factor("best running shoes").value, 60.0);
        assert_eq!(commercial_intent_factor("how to tie shoes").value, 25.0);
        assert_eq!(commercial_intent_factor("running shoes").value, 35.0);
        // transactional wins over commercial
        assert_eq!(commercial_intent_factor("buy best running shoes").value, 80.0);
    }
}
