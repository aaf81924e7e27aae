//! Analysis pipeline: extract → detect → score, for one candidate or a batch.
//!
//! Each document is independent. A document that fails extraction is scored on empty
//! text and flagged; it never aborts the batch. Output order comes from `rank`, not
//! from processing order.

use bytes::Bytes;
use tracing::{info, warn};

use crate::analysis::engine::{MatchResult, PreparedTarget, ScoreEngine};
use crate::analysis::extract::TextExtractor;
use crate::analysis::ranking::{rank, RankingEntry};

/// An uploaded résumé before extraction.
#[derive(Debug, Clone)]
pub struct CandidateDocument {
    pub candidate_id: String,
    pub content: Bytes,
}

/// Extracts and scores a single document.
pub async fn analyze_document(
    engine: &ScoreEngine,
    extractor: &dyn TextExtractor,
    document: CandidateDocument,
    target: &PreparedTarget,
) -> MatchResult {
    let CandidateDocument {
        candidate_id,
        content,
    } = document;

    let result = match extractor.extract(content).await {
        Ok(text) => engine.evaluate(&candidate_id, &text, target),
        Err(e) => {
            warn!(candidate_id = %candidate_id, error = %e, "Document extraction failed; scoring as empty");
            engine.evaluate_unreadable(&candidate_id, &e.to_string(), target)
        }
    };

    info!(
        candidate_id = %result.candidate_id,
        score = result.score,
        matched = result.matched_skills.len(),
        required = result.required_skills.len(),
        "Scored candidate"
    );
    result
}

/// Extracts, scores and ranks a batch of documents.
pub async fn rank_documents(
    engine: &ScoreEngine,
    extractor: &dyn TextExtractor,
    documents: Vec<CandidateDocument>,
    target: &PreparedTarget,
) -> Vec<RankingEntry> {
    let total = documents.len();
    let mut results = Vec::with_capacity(total);
    for document in documents {
        results.push(analyze_document(engine, extractor, document, target).await);
    }

    let failed = results
        .iter()
        .filter(|r| r.extraction_error.is_some())
        .count();
    info!(candidates = total, failed, "Ranked batch");

    rank(&results)
}

/// Scores and ranks candidates whose text is already available.
pub fn rank_texts(
    engine: &ScoreEngine,
    candidates: &[(String, String)],
    target: &PreparedTarget,
) -> Vec<RankingEntry> {
    let results: Vec<MatchResult> = candidates
        .iter()
        .map(|(candidate_id, text)| engine.evaluate(candidate_id, text, target))
        .collect();
    info!(candidates = results.len(), "Ranked text batch");
    rank(&results)
}
