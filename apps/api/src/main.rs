mod analysis;
mod catalog;
mod config;
mod errors;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::engine::ScoreEngine;
use crate::analysis::extract::DocumentExtractor;
use crate::catalog::SkillCatalog;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillMatch API v{}", env!("CARGO_PKG_VERSION"));

    // Load the skill catalog once; it is read-only for the life of the process.
    let catalog = load_catalog(&config)?;
    info!(
        roles = catalog.roles().len(),
        skills = catalog.all_skills().len(),
        fallback = ?config.role_fallback,
        "Skill catalog loaded"
    );

    let engine = ScoreEngine::new(Arc::new(catalog), config.role_fallback);
    let extractor = Arc::new(DocumentExtractor::new(config.extraction_timeout));

    // Build app state
    let state = AppState {
        config: config.clone(),
        engine,
        extractor,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Built-in table unless `SKILL_CATALOG_PATH` points at a JSON catalog.
fn load_catalog(config: &Config) -> Result<SkillCatalog> {
    match &config.skill_catalog_path {
        Some(path) => {
            info!("Loading skill catalog from {}", path.display());
            SkillCatalog::from_json_file(path)
                .with_context(|| format!("Failed to load skill catalog '{}'", path.display()))
        }
        None => Ok(SkillCatalog::builtin()),
    }
}
