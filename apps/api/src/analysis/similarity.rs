//! Bag-of-words cosine similarity between résumé text and job-description text.
//!
//! Term-frequency vectors live in `BTreeMap`s so summation order, and therefore the
//! floating-point result, is identical on every run.

use std::collections::BTreeMap;

const STOP_WORDS: &[&str] = &[
    "a", "about", "an", "and", "are", "as", "at", "be", "been", "but", "by", "can", "for",
    "from", "has", "have", "in", "into", "is", "it", "its", "of", "on", "or", "our", "that",
    "the", "their", "this", "to", "we", "were", "will", "with", "you", "your",
];

/// Tokenizes text for similarity: lowercase, split on anything other than alphanumerics
/// and `+ # .`, strip edge dots, drop stop words and single-character tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.')))
        .map(|t| t.trim_matches('.'))
        .filter(|t| t.chars().count() > 1 && !STOP_WORDS.contains(t))
        .map(String::from)
        .collect()
}

fn term_frequencies(tokens: &[String]) -> BTreeMap<&str, f64> {
    let mut tf = BTreeMap::new();
    for token in tokens {
        *tf.entry(token.as_str()).or_insert(0.0) += 1.0;
    }
    tf
}

/// Cosine similarity of term-frequency vectors, in [0, 1]. Zero when either side is empty.
pub fn cosine_similarity(a: &str, b: &str) -> f64 {
    let tokens_a = tokenize(a);
    let tokens_b = tokenize(b);
    let tf_a = term_frequencies(&tokens_a);
    let tf_b = term_frequencies(&tokens_b);

    let dot: f64 = tf_a
        .iter()
        .filter_map(|(term, x)| tf_b.get(term).map(|y| x * y))
        .sum();
    let norm_a: f64 = tf_a.values().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = tf_b.values().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}
