use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use covergen::config::ServerConfig;
use covergen::generation::fit_scoring::LlmFitScorer;
use covergen::llm_client::OpenAiClient;
use covergen::routes::build_router;
use covergen::state::AppState;
use covergen::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = ServerConfig::from_env()?;

    // Initialize structured logging
    telemetry::init(&config.rust_log, env!("CARGO_CRATE_NAME"));

    info!("Starting covergen API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = Arc::new(OpenAiClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.openai_model.clone(),
    )?);
    info!("LLM client initialized (model: {})", llm.model());

    let fit_scorer = Arc::new(LlmFitScorer::new(llm.clone()));

    let state = AppState {
        llm,
        fit_scorer,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // exposes x-fit-score to browser clients

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
