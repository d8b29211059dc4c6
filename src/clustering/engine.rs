//! Average-linkage agglomerative keyword clustering
//!
//! Pipeline: profile keywords, build the pairwise similarity matrix, merge
//! clusters greedily by average linkage, refine members by coherence, then
//! derive per-cluster metadata and global statistics.
//!
//! The matrix costs O(n²) similarity evaluations and the merge loop O(n²)
//! per step; callers are expected to cap the keyword set size.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use super::similarity::{keyword_similarity, KeywordProfile, SimilarityWeights};
use super::tokenize::tokenize;
use super::ClusteringError;
use crate::models::{KeywordRecord, SearchIntent};
use crate::stats::{mean, round_to};
use crate::utils::title_case;

/// Members below this fraction of the best member's coherence are dropped
const REFINEMENT_RATIO: f64 = 0.6;

/// Fraction of members a token must appear in to become a theme
const THEME_MIN_SHARE: f64 = 0.3;

const MAX_THEMES: usize = 5;

const QUICK_WIN_DIFFICULTY: f64 = 30.0;
const HIGH_VOLUME_TOTAL: u64 = 50_000;
const EASY_KEYWORD_DIFFICULTY: f64 = 25.0;
const PILLAR_CLUSTER_SIZE: usize = 10;

/// Clustering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringOptions {
    /// Smallest cluster kept after refinement
    pub min_cluster_size: usize,

    /// Upper bound on the number of clusters returned
    pub max_clusters: usize,

    /// Merges below this average-linkage similarity are rejected
    pub similarity_threshold: f64,

    pub semantic_weight: f64,
    pub structural_weight: f64,
    pub intent_weight: f64,
}

impl Default for ClusteringOptions {
    fn default() -> Self {
        let weights = SimilarityWeights::default();
        Self {
            min_cluster_size: 3,
            max_clusters: 50,
            similarity_threshold: 0.6,
            semantic_weight: weights.semantic,
            structural_weight: weights.structural,
            intent_weight: weights.intent,
        }
    }
}

impl ClusteringOptions {
    /// Similarity weights carried by these options
    #[must_use]
    pub fn weights(&self) -> SimilarityWeights {
        SimilarityWeights {
            semantic: self.semantic_weight,
            structural: self.structural_weight,
            intent: self.intent_weight,
        }
    }

    /// Validate option ranges
    pub fn validate(&self) -> Result<(), ClusteringError> {
        if self.min_cluster_size == 0 {
            return Err(ClusteringError::InvalidOptions(
                "min_cluster_size must be greater than 0".to_string(),
            ));
        }
        if self.max_clusters == 0 {
            return Err(ClusteringError::InvalidOptions(
                "max_clusters must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ClusteringError::InvalidOptions(format!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }
        let weights = [
            self.semantic_weight,
            self.structural_weight,
            self.intent_weight,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ClusteringError::InvalidOptions(
                "similarity weights must be finite and non-negative".to_string(),
            ));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(ClusteringError::InvalidOptions(
                "at least one similarity weight must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// A group of semantically related keywords
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordCluster {
    /// Stable identifier derived from the member keywords
    pub id: String,
    pub name: String,
    pub keywords: Vec<KeywordRecord>,

    /// Member with the highest search volume
    pub primary_keyword: String,

    /// Plurality intent of the members
    pub intent: SearchIntent,

    pub avg_volume: u64,
    pub avg_difficulty: f64,
    pub avg_cpc: f64,
    pub total_volume: u64,
    pub size: usize,

    /// Mean pairwise similarity of members (0-1)
    pub coherence_score: f64,

    pub themes: Vec<String>,
    pub opportunities: Vec<String>,
}

/// Aggregate figures for one clustering run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusteringStatistics {
    pub total_keywords: usize,
    pub clustered_keywords: usize,
    pub unclustered_keywords: usize,
    pub cluster_count: usize,
    pub avg_cluster_size: f64,
    pub avg_coherence: f64,
    pub largest_cluster_size: usize,

    /// Share of keywords placed in a cluster (0-1)
    pub clustering_rate: f64,
}

/// Output of a clustering run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringResult {
    pub clusters: Vec<KeywordCluster>,
    pub unclustered: Vec<KeywordRecord>,
    pub statistics: ClusteringStatistics,

    /// Keyword counts per intent over the whole input
    pub intent_distribution: BTreeMap<SearchIntent, usize>,

    pub recommendations: Vec<String>,
}

/// Stateless keyword clustering engine
#[derive(Debug, Clone, Default)]
pub struct ClusteringEngine {
    options: ClusteringOptions,
}

impl ClusteringEngine {
    /// Create an engine after validating its options
    pub fn new(options: ClusteringOptions) -> Result<Self, ClusteringError> {
        options.validate()?;
        Ok(Self { options })
    }

    #[must_use]
    pub fn options(&self) -> &ClusteringOptions {
        &self.options
    }

    /// Group keywords into clusters
    ///
    /// Every input keyword ends up either in exactly one cluster or in
    /// `unclustered`.
    pub fn cluster(&self, keywords: &[KeywordRecord]) -> Result<ClusteringResult, ClusteringError> {
        for (index, record) in keywords.iter().enumerate() {
            record
                .validate()
                .map_err(|source| ClusteringError::InvalidKeyword { index, source })?;
        }

        debug!(
            keywords = keywords.len(),
            min_cluster_size = self.options.min_cluster_size,
            max_clusters = self.options.max_clusters,
            threshold = self.options.similarity_threshold,
            "Clustering started"
        );

        let matrix = similarity_matrix(keywords, &self.options.weights());
        let merged = agglomerate(&matrix, &self.options);

        let mut unclustered: Vec<usize> = Vec::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for members in merged {
            let (kept, dropped) = refine(members, &matrix, self.options.min_cluster_size);
            unclustered.extend(dropped);
            if kept.len() >= self.options.min_cluster_size {
                groups.push(kept);
            } else {
                unclustered.extend(kept);
            }
        }

        // Largest total volume first; ties keep input order
        let total_volume =
            |members: &[usize]| members.iter().map(|&i| keywords[i].search_volume).sum::<u64>();
        groups.sort_by(|a, b| total_volume(b).cmp(&total_volume(a)).then(a[0].cmp(&b[0])));
        if groups.len() > self.options.max_clusters {
            for overflow in groups.split_off(self.options.max_clusters) {
                unclustered.extend(overflow);
            }
        }

        let clusters: Vec<KeywordCluster> = groups
            .iter()
            .map(|members| build_cluster(members, keywords, &matrix))
            .collect();

        unclustered.sort_unstable();
        let unclustered: Vec<KeywordRecord> =
            unclustered.into_iter().map(|i| keywords[i].clone()).collect();

        let statistics = statistics(keywords.len(), &clusters, unclustered.len());
        let intent_distribution = intent_distribution(keywords);
        let recommendations = recommendations(&clusters, &statistics, &intent_distribution);

        info!(
            keywords = keywords.len(),
            clusters = clusters.len(),
            unclustered = unclustered.len(),
            "Clustering completed"
        );

        Ok(ClusteringResult {
            clusters,
            unclustered,
            statistics,
            intent_distribution,
            recommendations,
        })
    }
}

/// Full symmetric similarity matrix, rows computed in parallel
fn similarity_matrix(keywords: &[KeywordRecord], weights: &SimilarityWeights) -> Vec<Vec<f64>> {
    let profiles: Vec<KeywordProfile> = keywords.iter().map(KeywordProfile::from_record).collect();

    (0..profiles.len())
        .into_par_iter()
        .map(|i| {
            (0..profiles.len())
                .map(|j| {
                    if i == j {
                        1.0
                    } else {
                        keyword_similarity(&profiles[i], &profiles[j], weights)
                    }
                })
                .collect::<Vec<f64>>()
        })
        .collect()
}

/// Greedy average-linkage merging
///
/// Stops once the cluster count reaches `n - max_clusters` or the best merge
/// falls below the similarity threshold. Ties resolve to the first pair found.
fn agglomerate(matrix: &[Vec<f64>], options: &ClusteringOptions) -> Vec<Vec<usize>> {
    let n = matrix.len();
    let mut members: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
    let mut active = vec![true; n];
    // Sum of cross-cluster similarities between cluster slots
    let mut linkage: Vec<Vec<f64>> = matrix.to_vec();

    let target = n.saturating_sub(options.max_clusters);
    let mut remaining = n;

    while remaining > target.max(1) {
        let mut best: Option<(usize, usize, f64)> = None;
        for i in 0..n {
            if !active[i] {
                continue;
            }
            for j in (i + 1)..n {
                if !active[j] {
                    continue;
                }
                let pairs = (members[i].len() * members[j].len()) as f64;
                let average = linkage[i][j] / pairs;
                if best.map_or(true, |(_, _, s)| average > s) {
                    best = Some((i, j, average));
                }
            }
        }

        let Some((i, j, similarity)) = best else {
            break;
        };
        if similarity < options.similarity_threshold {
            break;
        }

        let absorbed = std::mem::take(&mut members[j]);
        members[i].extend(absorbed);
        active[j] = false;
        for k in 0..n {
            if active[k] && k != i {
                let combined = linkage[i][k] + linkage[j][k];
                linkage[i][k] = combined;
                linkage[k][i] = combined;
            }
        }
        remaining -= 1;
    }

    members
        .into_iter()
        .zip(active)
        .filter(|(_, is_active)| *is_active)
        .map(|(mut group, _)| {
            group.sort_unstable();
            group
        })
        .collect()
}

/// Mean similarity of `member` to every other member of its group
fn member_coherence(member: usize, group: &[usize], matrix: &[Vec<f64>]) -> f64 {
    let others: Vec<f64> = group
        .iter()
        .filter(|&&other| other != member)
        .map(|&other| matrix[member][other])
        .collect();
    if others.is_empty() {
        1.0
    } else {
        mean(&others)
    }
}

/// Drop weakly attached members from groups larger than the minimum size
fn refine(group: Vec<usize>, matrix: &[Vec<f64>], min_size: usize) -> (Vec<usize>, Vec<usize>) {
    if group.len() <= min_size {
        return (group, Vec::new());
    }

    let coherence: Vec<f64> = group
        .iter()
        .map(|&m| member_coherence(m, &group, matrix))
        .collect();
    let top = coherence.iter().copied().fold(0.0, f64::max);
    let cutoff = top * REFINEMENT_RATIO;

    let mut kept = Vec::new();
    let mut dropped = Vec::new();
    for (&member, &c) in group.iter().zip(&coherence) {
        if c >= cutoff {
            kept.push(member);
        } else {
            dropped.push(member);
        }
    }
    (kept, dropped)
}

/// Mean pairwise similarity of a group, 1.0 for singletons
fn group_coherence(group: &[usize], matrix: &[Vec<f64>]) -> f64 {
    let mut pairs = Vec::new();
    for (a, &i) in group.iter().enumerate() {
        for &j in &group[a + 1..] {
            pairs.push(matrix[i][j]);
        }
    }
    if pairs.is_empty() {
        1.0
    } else {
        mean(&pairs)
    }
}

fn build_cluster(members: &[usize], keywords: &[KeywordRecord], matrix: &[Vec<f64>]) -> KeywordCluster {
    let records: Vec<KeywordRecord> = members.iter().map(|&i| keywords[i].clone()).collect();
    let size = records.len();

    // First member wins ties
    let primary = records
        .iter()
        .fold(None::<&KeywordRecord>, |best, r| match best {
            Some(b) if b.search_volume >= r.search_volume => Some(b),
            _ => Some(r),
        })
        .map(|r| r.keyword.clone())
        .unwrap_or_default();

    let total_volume: u64 = records.iter().map(|r| r.search_volume).sum();
    let volumes: Vec<f64> = records.iter().map(|r| r.search_volume as f64).collect();
    let difficulties: Vec<f64> = records.iter().map(KeywordRecord::effective_difficulty).collect();
    let cpcs: Vec<f64> = records.iter().map(|r| r.cpc).collect();

    let avg_volume = mean(&volumes).round() as u64;
    let avg_difficulty = mean(&difficulties).round();
    let avg_cpc = round_to(mean(&cpcs), 2);

    let intent = dominant_intent(&records);
    let themes = themes(&records);
    let coherence_score = round_to(group_coherence(members, matrix), 2);

    let easy_share = difficulties
        .iter()
        .filter(|&&d| d < EASY_KEYWORD_DIFFICULTY)
        .count() as f64
        / size.max(1) as f64;

    let name = if themes.is_empty() {
        title_case(&primary)
    } else {
        title_case(&themes.iter().take(3).cloned().collect::<Vec<_>>().join(" "))
    };

    KeywordCluster {
        id: cluster_id(&records),
        name,
        opportunities: opportunities(avg_difficulty, total_volume, easy_share, intent),
        primary_keyword: primary,
        intent,
        avg_volume,
        avg_difficulty,
        avg_cpc,
        total_volume,
        size,
        coherence_score,
        themes,
        keywords: records,
    }
}

/// Plurality intent; ties resolve in canonical intent order
fn dominant_intent(records: &[KeywordRecord]) -> SearchIntent {
    let mut counts: BTreeMap<SearchIntent, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.intent).or_insert(0) += 1;
    }

    SearchIntent::all()
        .into_iter()
        .fold((SearchIntent::Informational, 0), |(best, best_count), intent| {
            let count = counts.get(&intent).copied().unwrap_or(0);
            if count > best_count {
                (intent, count)
            } else {
                (best, best_count)
            }
        })
        .0
}

/// Tokens shared by at least 30% of members, most frequent first
fn themes(records: &[KeywordRecord]) -> Vec<String> {
    let min_members = (THEME_MIN_SHARE * records.len() as f64).ceil() as usize;

    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        let mut tokens = tokenize(&record.keyword);
        tokens.sort_unstable();
        tokens.dedup();
        for token in tokens {
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    let mut frequent: Vec<(String, usize)> = counts
        .into_iter()
        .filter(|(_, count)| *count >= min_members.max(1))
        .collect();
    frequent.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    frequent.truncate(MAX_THEMES);
    frequent.into_iter().map(|(token, _)| token).collect()
}

fn opportunities(
    avg_difficulty: f64,
    total_volume: u64,
    easy_share: f64,
    intent: SearchIntent,
) -> Vec<String> {
    let mut opportunities = Vec::new();

    if avg_difficulty < QUICK_WIN_DIFFICULTY {
        opportunities.push("Quick wins: low average difficulty".to_string());
    }
    if total_volume > HIGH_VOLUME_TOTAL {
        opportunities.push("High volume potential across the cluster".to_string());
    }
    if easy_share > 0.5 {
        opportunities.push("Multiple easy keywords to target first".to_string());
    }

    opportunities.push(
        match intent {
            SearchIntent::Informational => "Build a pillar guide with supporting articles",
            SearchIntent::Navigational => "Strengthen brand and landing pages for navigational queries",
            SearchIntent::Commercial => "Publish comparison and review content",
            SearchIntent::Transactional => "Optimize product and conversion-focused landing pages",
        }
        .to_string(),
    );

    opportunities
}

/// Stable id: hash of the sorted, normalized member keywords
fn cluster_id(records: &[KeywordRecord]) -> String {
    let mut keys: Vec<String> = records.iter().map(KeywordRecord::normalized_keyword).collect();
    keys.sort_unstable();

    let mut hasher = Sha256::new();
    hasher.update(keys.join("\n").as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("cluster-{}", &digest[..12])
}

fn statistics(total: usize, clusters: &[KeywordCluster], unclustered: usize) -> ClusteringStatistics {
    let clustered: usize = clusters.iter().map(|c| c.size).sum();
    let coherences: Vec<f64> = clusters.iter().map(|c| c.coherence_score).collect();

    ClusteringStatistics {
        total_keywords: total,
        clustered_keywords: clustered,
        unclustered_keywords: unclustered,
        cluster_count: clusters.len(),
        avg_cluster_size: round_to(clustered as f64 / clusters.len().max(1) as f64, 2),
        avg_coherence: round_to(mean(&coherences), 2),
        largest_cluster_size: clusters.iter().map(|c| c.size).max().unwrap_or(0),
        clustering_rate: round_to(clustered as f64 / total.max(1) as f64, 4),
    }
}

fn intent_distribution(keywords: &[KeywordRecord]) -> BTreeMap<SearchIntent, usize> {
    let mut distribution: BTreeMap<SearchIntent, usize> =
        SearchIntent::all().into_iter().map(|i| (i, 0)).collect();
    for record in keywords {
        *distribution.entry(record.intent).or_insert(0) += 1;
    }
    distribution
}

fn recommendations(
    clusters: &[KeywordCluster],
    statistics: &ClusteringStatistics,
    intents: &BTreeMap<SearchIntent, usize>,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if statistics.total_keywords == 0 {
        return recommendations;
    }

    if clusters.is_empty() {
        recommendations.push(
            "No coherent clusters found; expand the keyword list with closely related terms"
                .to_string(),
        );
    }

    let quick_wins = clusters
        .iter()
        .filter(|c| c.avg_difficulty < QUICK_WIN_DIFFICULTY)
        .count();
    if quick_wins > 0 {
        recommendations.push(format!(
            "Prioritize {quick_wins} low-difficulty cluster(s) for quick wins"
        ));
    }

    if let Some(largest) = clusters.iter().find(|c| c.size >= PILLAR_CLUSTER_SIZE) {
        recommendations.push(format!(
            "Build a pillar page around \"{}\" and link the cluster's supporting articles to it",
            largest.primary_keyword
        ));
    }

    if statistics.clustering_rate < 0.5 {
        recommendations.push(
            "Over half of the keywords are unclustered; lower the similarity threshold or broaden the keyword set"
                .to_string(),
        );
    }

    let dominant = intents
        .iter()
        .fold(None::<(SearchIntent, usize)>, |best, (&intent, &count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((intent, count)),
        });
    if let Some((intent, _)) = dominant {
        recommendations.push(
            match intent {
                SearchIntent::Informational => {
                    "Informational intent dominates; invest in guides and educational content"
                }
                SearchIntent::Navigational => {
                    "Navigational intent dominates; make sure brand and product pages rank"
                }
                SearchIntent::Commercial => {
                    "Commercial intent dominates; publish comparisons, reviews and buying guides"
                }
                SearchIntent::Transactional => {
                    "Transactional intent dominates; focus on product pages and conversion paths"
                }
            }
            .to_string(),
        );
    }

    recommendations
}
