// Count vectorizer: bag-of-words term counts over a fitted vocabulary.
//
// Tokens are lowercase runs of two or more Unicode word characters
// (letters, combining marks, digits), so Devanagari and Tamil text
// tokenizes the same way as Latin script. The vocabulary
// is sorted alphabetically and each term's index is its position, so a
// fitted vectorizer serializes to a stable JSON artifact.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::traits::{SparseVector, TextVectorizer};

static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").unwrap());

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountVectorizer {
    /// term -> feature index
    vocabulary: BTreeMap<String, usize>,
}

impl CountVectorizer {
    /// Learn the vocabulary from a corpus.
    pub fn fit(texts: &[String]) -> Result<Self> {
        let terms: BTreeSet<String> = texts.iter().flat_map(|t| tokenize(t)).collect();
        if terms.is_empty() {
            anyhow::bail!(
                "Empty vocabulary from {} texts; they contain no tokens of two or more characters",
                texts.len()
            );
        }

        let vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(i, term)| (term, i))
            .collect();
        Ok(Self { vocabulary })
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    fn vectorize(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokenize(text) {
            if let Some(&index) = self.vocabulary.get(&token) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }
        SparseVector {
            entries: counts.into_iter().collect(),
        }
    }
}

impl TextVectorizer for CountVectorizer {
    fn transform(&self, texts: &[String]) -> Vec<SparseVector> {
        texts.iter().map(|t| self.vectorize(t)).collect()
    }

    fn feature_count(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Split text into lowercase tokens of two or more word characters.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tokenize_drops_single_chars_and_punctuation() {
        assert_eq!(
            tokenize("A Flood, near the coast!! x"),
            vec!["flood", "near", "the", "coast"]
        );
    }

    #[test]
    fn test_vocabulary_is_sorted() {
        let v = CountVectorizer::fit(&corpus(&["storm surge", "cyclone storm"])).unwrap();
        let terms: Vec<&String> = v.vocabulary().keys().collect();
        assert_eq!(terms, vec!["cyclone", "storm", "surge"]);
        assert_eq!(v.vocabulary()["surge"], 2);
    }

    #[test]
    fn test_transform_counts_and_skips_unknown_terms() {
        let v = CountVectorizer::fit(&corpus(&["fire fire smoke"])).unwrap();
        let rows = v.transform(&corpus(&["Fire and more FIRE", "earthquake"]));
        // fire = 0, smoke = 1
        assert_eq!(rows[0].entries, vec![(0, 2.0)]);
        assert!(rows[1].is_empty());
    }

    #[test]
    fn test_tokenize_non_ascii_scripts() {
        assert_eq!(tokenize("Café flooding"), vec!["café", "flooding"]);
        assert_eq!(tokenize("समुद्र में ऊंची लहरें"), vec!["समुद्र", "में", "ऊंची", "लहरें"]);
        assert_eq!(tokenize("வெள்ளம் வந்தது"), vec!["வெள்ளம்", "வந்தது"]);
    }

    #[test]
    fn test_fit_on_devanagari_corpus() {
        let v = CountVectorizer::fit(&corpus(&["समुद्र में ऊंची लहरें", "ऊंची लहरें"])).unwrap();
        assert_eq!(v.feature_count(), 4);
        let rows = v.transform(&corpus(&["लहरें लहरें"]));
        assert_eq!(rows[0].entries, vec![(v.vocabulary()["लहरें"], 2.0)]);
    }

    #[test]
    fn test_fit_fails_without_tokens() {
        assert!(CountVectorizer::fit(&corpus(&["a b c", "!"])).is_err());
    }
}
