//! SERP snapshot input and analysis result types

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::InputError;
use crate::models::{DifficultyLevel, SerpFeatureKind};

/// Expected click impact of a SERP feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureImpact {
    High,
    #[default]
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerpFeature {
    #[serde(rename = "type")]
    pub kind: SerpFeatureKind,
    pub present: bool,
    #[serde(default)]
    pub impact: FeatureImpact,
}

impl SerpFeature {
    #[must_use]
    pub fn present(kind: SerpFeatureKind) -> Self {
        Self {
            kind,
            present: true,
            impact: FeatureImpact::default(),
        }
    }

    #[must_use]
    pub fn absent(kind: SerpFeatureKind) -> Self {
        Self {
            kind,
            present: false,
            impact: FeatureImpact::default(),
        }
    }
}

/// One organic listing with the ranking page's metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganicResult {
    /// 1-based rank
    pub position: u32,
    pub domain: String,
    pub domain_authority: f64,
    #[serde(default)]
    pub page_authority: f64,

    /// Word count
    #[serde(default)]
    pub content_length: u64,

    /// Page speed score (0-100)
    #[serde(default)]
    pub page_speed: f64,

    #[serde(default)]
    pub backlinks: u64,

    #[serde(default)]
    pub https: bool,
    #[serde(default)]
    pub structured_data: bool,
    #[serde(default)]
    pub mobile_optimized: bool,
    #[serde(default)]
    pub title_match: bool,
    #[serde(default)]
    pub url_match: bool,
    #[serde(default)]
    pub meta_match: bool,
}

impl OrganicResult {
    /// Create a result with the given rank and authority; other metrics default to zero
    #[must_use]
    pub fn new(position: u32, domain: impl Into<String>, domain_authority: f64) -> Self {
        Self {
            position,
            domain: domain.into(),
            domain_authority,
            page_authority: 0.0,
            content_length: 0,
            page_speed: 0.0,
            backlinks: 0,
            https: true,
            structured_data: false,
            mobile_optimized: true,
            title_match: false,
            url_match: false,
            meta_match: false,
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if self.domain.trim().is_empty() {
            return Err(InputError::EmptyField { field: "domain" });
        }
        for (field, value) in [
            ("domain_authority", self.domain_authority),
            ("page_authority", self.page_authority),
            ("page_speed", self.page_speed),
        ] {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(InputError::OutOfRange {
                    field,
                    value,
                    min: 0.0,
                    max: 100.0,
                });
            }
        }
        Ok(())
    }
}

/// Everything known about one results page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerpAnalysisData {
    pub keyword: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub paid_ads: u32,

    #[serde(default)]
    pub features: Vec<SerpFeature>,

    #[serde(default)]
    pub organic_results: Vec<OrganicResult>,
}

impl SerpAnalysisData {
    #[must_use]
    pub fn new(keyword: impl Into<String>, paid_ads: u32) -> Self {
        Self {
            keyword: keyword.into(),
            location: String::new(),
            paid_ads,
            features: Vec::new(),
            organic_results: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_feature(mut self, feature: SerpFeature) -> Self {
        self.features.push(feature);
        self
    }

    #[must_use]
    pub fn with_result(mut self, result: OrganicResult) -> Self {
        self.organic_results.push(result);
        self
    }

    /// Distinct features marked present
    #[must_use]
    pub fn present_features(&self) -> BTreeSet<SerpFeatureKind> {
        self.features
            .iter()
            .filter(|f| f.present)
            .map(|f| f.kind)
            .collect()
    }

    /// Reject empty keywords and malformed organic results
    pub fn validate(&self) -> Result<(), InputError> {
        if self.keyword.trim().is_empty() {
            return Err(InputError::EmptyKeyword);
        }
        for (index, result) in self.organic_results.iter().enumerate() {
            result.validate().map_err(|e| e.at(index))?;
        }
        Ok(())
    }
}

/// Commercial pressure on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionLevel {
    Low,
    Medium,
    High,
    Extreme,
}

impl CompetitionLevel {
    /// Band `paid_ads * 2 + features * 1.5`: <3 low, <6 medium, <10 high
    #[must_use]
    pub fn from_pressure(pressure: f64) -> Self {
        if pressure < 3.0 {
            Self::Low
        } else if pressure < 6.0 {
            Self::Medium
        } else if pressure < 10.0 {
            Self::High
        } else {
            Self::Extreme
        }
    }
}

/// Estimated share of clicks in percent, summing to 100
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickDistribution {
    pub organic: f64,
    pub paid: f64,
    pub features: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerpOverview {
    pub present_features: Vec<SerpFeatureKind>,
    pub paid_ads: u32,

    /// Effective organic listings visible above the fold
    pub organic_spots: f64,

    pub competition_level: CompetitionLevel,
    pub click_distribution: ClickDistribution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// An absent feature worth targeting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureOpportunity {
    pub feature: SerpFeatureKind,
    pub priority: Priority,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganicAverages {
    pub domain_authority: f64,
    pub page_authority: f64,
    pub content_length: f64,
    pub page_speed: f64,
    pub backlinks: f64,
}

/// A top-10 result trailing the average on at least one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeakCompetitor {
    pub position: u32,
    pub domain: String,
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganicAnalysis {
    pub results_analyzed: usize,
    pub averages: OrganicAverages,
    pub content_gaps: Vec<String>,
    pub technical_gaps: Vec<String>,
    pub optimization_opportunities: Vec<String>,
    pub weak_competitors: Vec<WeakCompetitor>,
}

/// A domain holding several top-10 positions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainShare {
    pub domain: String,
    pub positions: Vec<u32>,

    /// Fraction of analyzed results held by this domain
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorScore {
    pub position: u32,
    pub domain: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorInsights {
    pub dominant_domains: Vec<DomainShare>,
    pub strongest: Option<CompetitorScore>,
    pub weakest: Option<CompetitorScore>,
    pub average_score: f64,
}

/// One labeled term of the SERP difficulty sum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerpDifficultyFactor {
    pub name: String,
    pub value: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerpDifficulty {
    /// `min(100, 10 * ads + 5 * features + 0.375 * avg DA)`, rounded
    pub score: u32,
    pub level: DifficultyLevel,
    pub factors: Vec<SerpDifficultyFactor>,
}

/// Complete SERP analysis for one keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerpAnalysisResult {
    pub keyword: String,
    pub location: String,
    pub overview: SerpOverview,
    pub feature_opportunities: Vec<FeatureOpportunity>,
    pub organic_analysis: OrganicAnalysis,
    pub competitor_insights: CompetitorInsights,
    pub difficulty: SerpDifficulty,
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_deserializes_type_field() {
        let feature: SerpFeature =
            serde_json::from_str(r#"{"type": "featured_snippet", "present": true}"#).unwrap();
        assert_eq!(feature.kind, SerpFeatureKind::FeaturedSnippet);
        assert_eq!(feature.impact, FeatureImpact::Medium);
    }

    #[test]
    fn test_validate_reports_result_index() {
        let data = SerpAnalysisData::new("seo tools", 2)
            .with_result(OrganicResult::new(1, "a.com", 50.0))
            .with_result(OrganicResult::new(2, "b.com", 140.0));
        let err = data.validate().unwrap_err();
        assert!(matches!(err, InputError::InvalidRecord { index: 1, .. }));
    }

    #[test]
    fn test_present_features_are_distinct() {
        let data = SerpAnalysisData::new("seo tools", 0)
            .with_feature(SerpFeature::present(SerpFeatureKind::Images))
            .with_feature(SerpFeature::present(SerpFeatureKind::Images))
            .with_feature(SerpFeature::absent(SerpFeatureKind::Videos));
        assert_eq!(data.present_features().len(), 1);
    }

    #[test]
    fn test_competition_bands() {
        assert_eq!(CompetitionLevel::from_pressure(2.5), CompetitionLevel::Low);
        assert_eq!(CompetitionLevel::from_pressure(3.0), CompetitionLevel::Medium);
        assert_eq!(CompetitionLevel::from_pressure(9.5), CompetitionLevel::High);
        assert_eq!(CompetitionLevel::from_pressure(11.0), CompetitionLevel::Extreme);
    }
}
