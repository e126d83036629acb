//! Lexical relevance scoring for memory recall.
//!
//! Text is reduced to lowercase alphanumeric tokens of at least two
//! characters, minus common English stop words, and compared as
//! term-frequency vectors with cosine similarity.

use std::collections::HashMap;

const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "been", "but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has",
    "have", "he", "her", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "just", "me", "my", "no", "not", "of", "on", "or", "our", "she", "so", "some", "than",
    "that", "the", "their", "them", "then", "there", "these", "they", "this", "to", "up",
    "us", "was", "we", "were", "what", "when", "which", "who", "will", "with", "would", "you",
    "your",
];

/// Tokenize `text` into normalized terms.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|token| token.chars().count() >= 2 && !STOP_WORDS.contains(&token.as_str()))
        .collect()
}

fn term_frequencies(text: &str) -> HashMap<String, f64> {
    let mut counts = HashMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0.0) += 1.0;
    }
    counts
}

/// Cosine similarity of the two texts' term vectors, in `[0, 1]`.
///
/// Returns 0 when either side has no terms.
pub fn similarity(query: &str, document: &str) -> f64 {
    let q = term_frequencies(query);
    let d = term_frequencies(document);
    if q.is_empty() || d.is_empty() {
        return 0.0;
    }

    let dot: f64 = q
        .iter()
        .filter_map(|(term, qf)| d.get(term).map(|df| qf * df))
        .sum();
    let q_norm = q.values().map(|v| v * v).sum::<f64>().sqrt();
    let d_norm = d.values().map(|v| v * v).sum::<f64>().sqrt();

    (dot / (q_norm * d_norm)).clamp(0.0, 1.0)
}
