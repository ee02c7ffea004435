mod analysis;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod prediction;
mod routes;
mod schema;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::orchestrator::ParameterExtractor;
use crate::llm_client::LlmClient;
use crate::prediction::registry::ModelRegistry;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
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

    info!("Starting Phishing Predictor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        &config.llm_base_url,
        config.llm_timeout,
    )
    .context("Failed to build LLM client")?;
    let extractor = ParameterExtractor::new(
        Arc::new(llm),
        config.llm_models.clone(),
        config.llm_temperature,
        config.llm_timeout,
    );
    info!(
        "LLM client initialized (models: {})",
        config.llm_models.join(", ")
    );

    // Load prediction artifacts once; they are read-only for the life of the process
    let registry = ModelRegistry::load(&config.models_dir);
    let loaded = registry.loaded_families();
    if loaded.is_empty() {
        warn!(
            "No model families loaded from {}; analysis requests will be rejected",
            config.models_dir.display()
        );
    } else {
        info!("Loaded model families: {loaded:?}");
    }

    // Build app state
    let state = AppState {
        extractor: Arc::new(extractor),
        registry: Arc::new(registry),
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
