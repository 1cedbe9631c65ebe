mod config;
mod db;
mod errors;
mod matching;
mod models;
mod routes;
mod state;
mod stats;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{JobStore, PgJobStore};
use crate::matching::matcher::JobMatcher;
use crate::matching::ranking::{KeywordBonusScorer, RelevanceScorer};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Job Matcher v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Job store: host={} database={} user={}",
        config.db_host, config.db_name, config.db_user
    );

    // One connection per request, opened from these options
    let store: Arc<dyn JobStore> = Arc::new(PgJobStore::new(config.connect_options()));

    let scorer: Arc<dyn RelevanceScorer> = Arc::new(KeywordBonusScorer::default());
    info!(
        "Relevance scorer: {} (result limit {})",
        scorer.name(),
        config.search_result_limit
    );

    let matcher = JobMatcher::new(store.clone(), scorer, config.search_result_limit);
    let state = AppState { store, matcher };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
