use std::sync::Arc;

use crate::analysis::engine::ScoreEngine;
use crate::analysis::extract::TextExtractor;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Scoring engine over the read-only skill catalog loaded at startup.
    pub engine: ScoreEngine,
    /// Pluggable text extractor. Default: DocumentExtractor (PDF or plain text).
    pub extractor: Arc<dyn TextExtractor>,
}
