//! SERP competitiveness analysis
//!
//! Scores a results page from paid-ad density, feature presence and the
//! quality of the ranking competitors, and lists the feature gaps worth
//! targeting.

pub mod analyzer;
pub mod types;

pub use analyzer::{analyze_serp_data, click_distribution, competitor_score, serp_difficulty, TOP_RESULTS};
pub use types::{
    ClickDistribution, CompetitionLevel, CompetitorInsights, CompetitorScore, DomainShare,
    FeatureImpact, FeatureOpportunity, OrganicAnalysis, OrganicAverages, OrganicResult, Priority,
    SerpAnalysisData, SerpAnalysisResult, SerpDifficulty, SerpDifficultyFactor, SerpFeature,
    SerpOverview, WeakCompetitor,
};
