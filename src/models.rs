//! Shared data vocabulary used by every analyzer
//!
//! These types are produced by external keyword/SERP data providers and
//! consumed read-only by the analyzers. Boundary validation lives in the
//! `validate()` methods so analyzers can assume well-formed numbers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::InputError;
use crate::utils::normalize_whitespace;

/// Search intent behind a keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchIntent {
    /// Looking for information (guides, how-tos)
    Informational,

    /// Looking for a specific site or brand
    Navigational,

    /// Researching before a purchase
    Commercial,

    /// Ready to buy or convert
    Transactional,
}

impl SearchIntent {
    /// All intents in their canonical order
    #[must_use]
    pub fn all() -> [Self; 4] {
        [
            Self::Informational,
            Self::Navigational,
            Self::Commercial,
            Self::Transactional,
        ]
    }

    /// Get string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Informational => "informational",
            Self::Navigational => "navigational",
            Self::Commercial => "commercial",
            Self::Transactional => "transactional",
        }
    }

    /// Parse intent from a string
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "informational" | "info" => Some(Self::Informational),
            "navigational" | "nav" => Some(Self::Navigational),
            "commercial" => Some(Self::Commercial),
            "transactional" => Some(Self::Transactional),
            _ => None,
        }
    }

    /// Whether two distinct intents are closely related
    ///
    /// commercial <-> transactional and informational <-> navigational.
    #[must_use]
    pub fn is_adjacent(&self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Commercial, Self::Transactional)
                | (Self::Transactional, Self::Commercial)
                | (Self::Informational, Self::Navigational)
                | (Self::Navigational, Self::Informational)
        )
    }
}

/// A keyword with its market metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRecord {
    /// Keyword text as searched
    pub keyword: String,

    /// Monthly search volume
    pub search_volume: u64,

    /// Cost per click
    #[serde(default)]
    pub cpc: f64,

    /// Advertiser competition (0.0 to 1.0)
    #[serde(default)]
    pub competition: f64,

    /// Search intent
    pub intent: SearchIntent,

    /// SERP feature names observed for this keyword
    #[serde(default)]
    pub serp_features: BTreeSet<String>,

    /// Keyword difficulty (0-100), when the provider supplies one
    #[serde(default)]
    pub difficulty: Option<f64>,
}

impl KeywordRecord {
    /// Create a keyword record with zero cpc and competition
    pub fn new(keyword: impl Into<String>, search_volume: u64, intent: SearchIntent) -> Self {
        Self {
            keyword: keyword.into(),
            search_volume,
            cpc: 0.0,
            competition: 0.0,
            intent,
            serp_features: BTreeSet::new(),
            difficulty: None,
        }
    }

    /// Set cost per click
    #[must_use]
    pub fn with_cpc(mut self, cpc: f64) -> Self {
        self.cpc = cpc;
        self
    }

    /// Set advertiser competition
    #[must_use]
    pub fn with_competition(mut self, competition: f64) -> Self {
        self.competition = competition;
        self
    }

    /// Set keyword difficulty
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: f64) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Add an observed SERP feature
    #[must_use]
    pub fn with_serp_feature(mut self, feature: impl Into<String>) -> Self {
        self.serp_features.insert(feature.into());
        self
    }

    /// Lowercased keyword with collapsed whitespace
    #[must_use]
    pub fn normalized_keyword(&self) -> String {
        normalize_whitespace(&self.keyword.to_lowercase())
    }

    /// Difficulty used for aggregation: provider KD, else competition scaled to 0-100
    #[must_use]
    pub fn effective_difficulty(&self) -> f64 {
        self.difficulty
            .unwrap_or(self.competition * 100.0)
            .clamp(0.0, 100.0)
    }

    /// Reject malformed records before analysis
    pub fn validate(&self) -> Result<(), InputError> {
        if self.keyword.trim().is_empty() {
            return Err(InputError::EmptyKeyword);
        }
        check_non_negative("cpc", self.cpc)?;
        check_range("competition", self.competition, 0.0, 1.0)?;
        if let Some(difficulty) = self.difficulty {
            check_range("difficulty", difficulty, 0.0, 100.0)?;
        }
        Ok(())
    }
}

/// Ranking strength metrics for one competing page/domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorMetrics {
    pub domain: String,

    /// Domain authority (0-100)
    pub domain_authority: f64,

    /// Page authority (0-100)
    #[serde(default)]
    pub page_authority: f64,

    #[serde(default)]
    pub backlinks: u64,

    #[serde(default)]
    pub referring_domains: u64,

    /// Content length in words
    #[serde(default)]
    pub content_length: u64,

    /// Page speed score (0-100)
    #[serde(default)]
    pub page_speed: f64,

    #[serde(default)]
    pub social_signals: u64,

    #[serde(default)]
    pub brand_mentions: u64,
}

impl CompetitorMetrics {
    /// Create competitor metrics with only domain and authority set
    pub fn new(domain: impl Into<String>, domain_authority: f64) -> Self {
        Self {
            domain: domain.into(),
            domain_authority,
            page_authority: 0.0,
            backlinks: 0,
            referring_domains: 0,
            content_length: 0,
            page_speed: 0.0,
            social_signals: 0,
            brand_mentions: 0,
        }
    }

    /// Reject out-of-range metrics
    pub fn validate(&self) -> Result<(), InputError> {
        check_range("domain_authority", self.domain_authority, 0.0, 100.0)?;
        check_range("page_authority", self.page_authority, 0.0, 100.0)?;
        check_range("page_speed", self.page_speed, 0.0, 100.0)?;
        Ok(())
    }
}

/// Non-organic result types that can appear on a results page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerpFeatureKind {
    FeaturedSnippet,
    KnowledgePanel,
    LocalPack,
    Shopping,
    Images,
    Videos,
    News,
    PeopleAlsoAsk,
    Sitelinks,
    Reviews,
}

impl SerpFeatureKind {
    /// Get string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FeaturedSnippet => "featured_snippet",
            Self::KnowledgePanel => "knowledge_panel",
            Self::LocalPack => "local_pack",
            Self::Shopping => "shopping",
            Self::Images => "images",
            Self::Videos => "videos",
            Self::News => "news",
            Self::PeopleAlsoAsk => "people_also_ask",
            Self::Sitelinks => "sitelinks",
            Self::Reviews => "reviews",
        }
    }

    /// Human readable label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::FeaturedSnippet => "Featured snippet",
            Self::KnowledgePanel => "Knowledge panel",
            Self::LocalPack => "Local pack",
            Self::Shopping => "Shopping results",
            Self::Images => "Image results",
            Self::Videos => "Video results",
            Self::News => "News results",
            Self::PeopleAlsoAsk => "People also ask",
            Self::Sitelinks => "Sitelinks",
            Self::Reviews => "Reviews",
        }
    }

    /// Parse a feature from a provider string
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "featured_snippet" | "snippet" => Some(Self::FeaturedSnippet),
            "knowledge_panel" => Some(Self::KnowledgePanel),
            "local_pack" => Some(Self::LocalPack),
            "shopping" | "shopping_results" => Some(Self::Shopping),
            "images" | "image" | "image_pack" => Some(Self::Images),
            "videos" | "video" => Some(Self::Videos),
            "news" | "top_stories" => Some(Self::News),
            "people_also_ask" | "paa" => Some(Self::PeopleAlsoAsk),
            "sitelinks" => Some(Self::Sitelinks),
            "reviews" => Some(Self::Reviews),
            _ => None,
        }
    }
}

/// Minimal SERP snapshot consumed by the difficulty scorer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerpSnapshot {
    /// Number of paid ads shown
    pub paid_ads: u32,

    /// Features present on the page
    #[serde(default)]
    pub features: BTreeSet<SerpFeatureKind>,
}

impl SerpSnapshot {
    /// Snapshot with no ads and no features
    #[must_use]
    pub fn empty() -> Self {
        Self {
            paid_ads: 0,
            features: BTreeSet::new(),
        }
    }

    /// Add a present feature
    #[must_use]
    pub fn with_feature(mut self, feature: SerpFeatureKind) -> Self {
        self.features.insert(feature);
        self
    }

    /// Whether a feature is present
    #[must_use]
    pub fn has(&self, feature: SerpFeatureKind) -> bool {
        self.features.contains(&feature)
    }
}

impl Default for SerpSnapshot {
    /// Typical commercial SERP: four ads, featured snippet and local pack
    fn default() -> Self {
        Self {
            paid_ads: 4,
            features: [SerpFeatureKind::FeaturedSnippet, SerpFeatureKind::LocalPack]
                .into_iter()
                .collect(),
        }
    }
}

/// Direction in which a factor moves ranking difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    /// Makes ranking easier
    Positive,

    /// Makes ranking harder
    Negative,
}

/// Qualitative keyword difficulty band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    VeryEasy,
    Easy,
    Medium,
    Hard,
    VeryHard,
    ExtremelyHard,
}

impl DifficultyLevel {
    /// Classify a 0-100 difficulty score
    ///
    /// - `< 20`: Very Easy
    /// - `< 35`: Easy
    /// - `< 50`: Medium
    /// - `< 65`: Hard
    /// - `< 80`: Very Hard
    /// - otherwise: Extremely Hard
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < 20.0 {
            Self::VeryEasy
        } else if score < 35.0 {
            Self::Easy
        } else if score < 50.0 {
            Self::Medium
        } else if score < 65.0 {
            Self::Hard
        } else if score < 80.0 {
            Self::VeryHard
        } else {
            Self::ExtremelyHard
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryEasy => "Very Easy",
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::VeryHard => "Very Hard",
            Self::ExtremelyHard => "Extremely Hard",
        }
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), InputError> {
    if !value.is_finite() || value < 0.0 {
        return Err(InputError::InvalidValue {
            field,
            value,
            reason: "must be a finite non-negative number",
        });
    }
    Ok(())
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), InputError> {
    if !value.is_finite() || value < min || value > max {
        return Err(InputError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_string_roundtrip() {
        for intent in SearchIntent::all() {
            assert_eq!(SearchIntent::parse(intent.as_str()), Some(intent));
        }
        assert_eq!(SearchIntent::parse("unknown"), None);
    }

    #[test]
    fn test_intent_adjacency() {
        assert!(SearchIntent::Commercial.is_adjacent(SearchIntent::Transactional));
        assert!(SearchIntent::Navigational.is_adjacent(SearchIntent::Informational));
        assert!(!SearchIntent::Commercial.is_adjacent(SearchIntent::Informational));
        assert!(!SearchIntent::Commercial.is_adjacent(SearchIntent::Commercial));
    }

    #[test]
    fn test_effective_difficulty_fallback() {
        let record = KeywordRecord::new("seo tools", 1000, SearchIntent::Commercial)
            .with_competition(0.42);
        assert!((record.effective_difficulty() - 42.0).abs() < 1e-9);

        let record = record.with_difficulty(17.0);
        assert!((record.effective_difficulty() - 17.0).abs() < 1e-9);
    }

    #[test]
    fn test_keyword_validation() {
        let valid = KeywordRecord::new("seo", 10, SearchIntent::Informational);
        assert!(valid.validate().is_ok());

        let empty = KeywordRecord::new("   ", 10, SearchIntent::Informational);
        assert_eq!(empty.validate(), Err(InputError::EmptyKeyword));

        let bad_competition = valid.clone().with_competition(1.5);
        assert!(bad_competition.validate().is_err());

        let bad_cpc = valid.with_cpc(f64::NAN);
        assert!(bad_cpc.validate().is_err());
    }

    #[test]
    fn test_competitor_validation() {
        let mut competitor = CompetitorMetrics::new("example.com", 55.0);
        assert!(competitor.validate().is_ok());
        competitor.domain_authority = 120.0;
        assert!(competitor.validate().is_err());
    }

    #[test]
    fn test_serp_feature_parse() {
        assert_eq!(
            SerpFeatureKind::parse("Featured Snippet"),
            Some(SerpFeatureKind::FeaturedSnippet)
        );
        assert_eq!(
            SerpFeatureKind::parse("people-also-ask"),
            Some(SerpFeatureKind::PeopleAlsoAsk)
        );
        assert_eq!(SerpFeatureKind::parse("carousel"), None);
    }

    #[test]
    fn test_default_snapshot() {
        let serp = SerpSnapshot::default();
        assert_eq!(serp.paid_ads, 4);
        assert!(serp.has(SerpFeatureKind::FeaturedSnippet));
        assert!(serp.has(SerpFeatureKind::LocalPack));
        assert!(!serp.has(SerpFeatureKind::Shopping));
    }

    #[test]
    fn test_difficulty_level_bands() {
        assert_eq!(DifficultyLevel::from_score(0.0), DifficultyLevel::VeryEasy);
        assert_eq!(DifficultyLevel::from_score(20.0), DifficultyLevel::Easy);
        assert_eq!(DifficultyLevel::from_score(49.9), DifficultyLevel::Medium);
        assert_eq!(DifficultyLevel::from_score(50.0), DifficultyLevel::Hard);
        assert_eq!(DifficultyLevel::from_score(79.0), DifficultyLevel::VeryHard);
        assert_eq!(DifficultyLevel::from_score(80.0), DifficultyLevel::ExtremelyHard);
    }
}
