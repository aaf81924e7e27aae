//! Skill Detector — literal substring detection of vocabulary terms in document text.
//!
//! A term is detected iff it occurs as a contiguous substring of the lowercased text.
//! There is no word-boundary check: "c" would match inside "clojure". Scores depend on
//! this exact rule, so keep it.

use serde::{Deserialize, Serialize};

use crate::catalog::SkillVocabulary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub source_text: String,
    pub detected_skills: Vec<String>,
}

/// Baseline normalization for detection: lowercase only.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
}

/// Returns the terms (in `terms` order) that occur inside `text`.
pub fn detect_skills(text: &str, terms: &[String]) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let normalized = normalize(text);

    let mut detected: Vec<String> = Vec::new();
    for term in terms {
        if !term.is_empty() && normalized.contains(term.as_str()) && !detected.contains(term) {
            detected.push(term.clone());
        }
    }
    detected
}

pub fn detect(text: &str, vocabulary: &SkillVocabulary) -> DetectionResult {
    DetectionResult {
        source_text: text.to_string(),
        detected_skills: detect_skills(text, vocabulary.terms()),
    }
}
