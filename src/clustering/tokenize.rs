//! Keyword tokenization and light stemming
//!
//! Tokens are lowercased, stripped of punctuation and filtered against a
//! fixed English/Spanish stop-word list. Stemming strips a small table of
//! suffixes and never leaves a stem shorter than three characters.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Minimum stem length left after stripping a suffix
const MIN_STEM_CHARS: usize = 3;

/// Suffixes checked longest first
const SUFFIXES: &[&str] = &[
    // Spanish
    "mente", "iendo", "ando", "ción", "sión",
    // English
    "ing", "est", "ed", "er", "ly", "s",
];

lazy_static! {
    static ref STOP_WORDS: HashSet<&'static str> = [
        // English
        "a", "an", "the", "and", "or", "but", "of", "for", "to", "in", "on", "at", "by",
        "with", "from", "into", "about", "is", "are", "was", "were", "be", "been", "it",
        "its", "this", "that", "these", "those", "as", "my", "your", "our", "their", "i",
        "you", "we", "they", "me", "do", "does", "can", "will", "near",
        // Spanish
        "el", "la", "los", "las", "lo", "de", "del", "al", "y", "o", "u", "en", "un",
        "una", "unos", "unas", "para", "por", "con", "sin", "que", "se", "es", "su",
        "sus", "mi", "tu", "como", "mas", "más",
    ]
    .into_iter()
    .collect();

    static ref PUNCTUATION: Regex =
        Regex::new(r"[^\p{L}\p{N}\s]+").expect("Invalid regex pattern");
}

/// Whether a token is a stop word
#[must_use]
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Split a keyword into content tokens
#[must_use]
pub fn tokenize(keyword: &str) -> Vec<String> {
    let lowered = keyword.to_lowercase();
    PUNCTUATION
        .replace_all(&lowered, " ")
        .split_whitespace()
        .filter(|token| token.chars().count() > 1 && !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

/// Strip the first matching suffix from a token
#[must_use]
pub fn stem(token: &str) -> String {
    for suffix in SUFFIXES {
        if let Some(root) = token.strip_suffix(suffix) {
            if root.chars().count() >= MIN_STEM_CHARS {
                return root.to_string();
            }
        }
    }
    token.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_strips_punctuation_and_stop_words() {
        assert_eq!(tokenize("How to fix SEO-tools!"), vec!["how", "fix", "seo", "tools"]);
        assert_eq!(tokenize("la mejor guía de SEO"), vec!["mejor", "guía", "seo"]);
        assert!(tokenize("a of the").is_empty());
    }

    #[test]
    fn test_tokenize_drops_single_characters() {
        assert_eq!(tokenize("x ray b vitamins"), vec!["ray", "vitamins"]);
    }

    #[test]
    fn test_stem_english() {
        assert_eq!(stem("running"), "runn");
        assert_eq!(stem("tools"), "tool");
        assert_eq!(stem("quickly"), "quick");
        assert_eq!(stem("fastest"), "fast");
        assert_eq!(stem("best"), "best");
        assert_eq!(stem("is"), "is");
    }

    #[test]
    fn test_stem_spanish() {
        assert_eq!(stem("optimización"), "optimiza");
        assert_eq!(stem("rápidamente"), "rápida");
        assert_eq!(stem("buscando"), "busc");
    }
}
