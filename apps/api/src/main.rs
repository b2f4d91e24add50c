mod analysis;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod resumes;
mod routes;
mod shortlist;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::shortlist::fetcher::ResumeFetcher;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http=info",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobNest API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, config.database_max_connections).await?;

    // Initialize Gemini client
    let llm = GeminiClient::new(
        config.gemini_api_base.clone(),
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    )?
    .with_retry_policy(config.llm_max_attempts, Duration::from_secs(1));
    info!("LLM client initialized (model: {})", config.gemini_model);

    let fetcher = ResumeFetcher::new(Duration::from_secs(config.resume_fetch_timeout_secs))?;

    // Build app state
    let state = AppState {
        db,
        llm: Arc::new(llm),
        fetcher,
        config: config.clone(),
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
