use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::tokenize::{stem, tokenize};
use crate::models::{KeywordRecord, SearchIntent};

/// Similarity for distinct but related intents
pub const ADJACENT_INTENT_SIMILARITY: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityWeights {
    pub semantic: f64,   // 0.4
    pub structural: f64, // 0.3
    pub intent: f64,     // 0.3
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            semantic: 0.4,
            structural: 0.3,
            intent: 0.3,
        }
    }
}

impl SimilarityWeights {
    fn total(&self) -> f64 {
        self.semantic + self.structural + self.intent
    }
}

/// Precomputed text features of one keyword
#[derive(Debug, Clone)]
pub struct KeywordProfile {
    pub text: String,
    chars: Vec<char>,
    pub tokens: BTreeSet<String>,
    pub stems: BTreeSet<String>,
    pub intent: SearchIntent,
}

impl KeywordProfile {
    #[must_use]
    pub fn from_record(record: &KeywordRecord) -> Self {
        let text = record.normalized_keyword();
        let tokens: BTreeSet<String> = tokenize(&text).into_iter().collect();
        let stems = tokens.iter().map(|t| stem(t)).collect();
        Self {
            chars: text.chars().collect(),
            text,
            tokens,
            stems,
            intent: record.intent,
        }
    }
}

/// |A ∩ B| / |A ∪ B|
#[must_use]
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// |A ∩ B| / min(|A|, |B|)
#[must_use]
pub fn overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / smaller as f64
}

/// Edit distance over characters
#[must_use]
pub fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Token/stem overlap: 0.4 Jaccard(tokens) + 0.4 Jaccard(stems) + 0.2 overlap(tokens)
#[must_use]
pub fn semantic_similarity(a: &KeywordProfile, b: &KeywordProfile) -> f64 {
    0.4 * jaccard(&a.tokens, &b.tokens)
        + 0.4 * jaccard(&a.stems, &b.stems)
        + 0.2 * overlap(&a.tokens, &b.tokens)
}

/// Shape similarity: 0.6 length similarity + 0.4 character similarity
#[must_use]
pub fn structural_similarity(a: &KeywordProfile, b: &KeywordProfile) -> f64 {
    let (len_a, len_b) = (a.chars.len(), b.chars.len());
    let longer = len_a.max(len_b);
    if longer == 0 {
        return 1.0;
    }

    let length_similarity = 1.0 - len_a.abs_diff(len_b) as f64 / longer as f64;
    let distance = levenshtein(&a.chars, &b.chars);
    let character_similarity = (longer - distance.min(longer)) as f64 / longer as f64;

    0.6 * length_similarity + 0.4 * character_similarity
}

/// 1.0 for equal intents, 0.7 for adjacent ones, else 0.0
#[must_use]
pub fn intent_similarity(a: SearchIntent, b: SearchIntent) -> f64 {
    if a == b {
        1.0
    } else if a.is_adjacent(b) {
        ADJACENT_INTENT_SIMILARITY
    } else {
        0.0
    }
}

/// Weighted keyword similarity in `[0, 1]`
///
/// Weights are normalized by their sum, so the defaults (summing to one)
/// apply unchanged.
#[must_use]
pub fn keyword_similarity(a: &KeywordProfile, b: &KeywordProfile, w: &SimilarityWeights) -> f64 {
    let total = w.total();
    if total <= 0.0 {
        return 0.0;
    }

    let s = w.semantic * semantic_similarity(a, b)
        + w.structural * structural_similarity(a, b)
        + w.intent * intent_similarity(a.intent, b.intent);

    (s / total).clamp(0.0, 1.0)
}
