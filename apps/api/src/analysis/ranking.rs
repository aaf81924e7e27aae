//! Ranker — total, deterministic ordering of candidate results.
//!
//! Sort key: score ↓, matched-skill count ↓, candidate id ↑. The output order depends
//! only on the results, never on the order they were computed or supplied in.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::analysis::engine::MatchResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// 1-based position.
    pub rank: usize,
    #[serde(flatten)]
    pub result: MatchResult,
}

fn compare(a: &MatchResult, b: &MatchResult) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.matched_skills.len().cmp(&a.matched_skills.len()))
        .then_with(|| a.candidate_id.cmp(&b.candidate_id))
}

/// Returns a new ranked sequence; the input is left untouched.
pub fn rank(results: &[MatchResult]) -> Vec<RankingEntry> {
    let mut ordered: Vec<&MatchResult> = results.iter().collect();
    ordered.sort_by(|a, b| compare(a, b));

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, result)| RankingEntry {
            rank: i + 1,
            result: result.clone(),
        })
        .collect()
}
