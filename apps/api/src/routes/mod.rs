pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Catalog
        .route("/api/v1/roles", get(handlers::handle_list_roles))
        // Single-candidate analysis
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route("/api/v1/analyze/text", post(handlers::handle_analyze_text))
        // Batch ranking (JSON or CSV via ?format=csv)
        .route("/api/v1/rank", post(handlers::handle_rank))
        .route("/api/v1/rank/text", post(handlers::handle_rank_text))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
