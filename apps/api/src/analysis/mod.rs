// Skill analysis: detection, scoring, ranking and export of résumé matches.
// Everything below `handlers` is synchronous and pure except `extract` and `pipeline`,
// which own the async document boundary.

pub mod detector;
pub mod engine;
pub mod export;
pub mod extract;
pub mod handlers;
pub mod pipeline;
pub mod ranking;
pub mod scoring;
pub mod similarity;
