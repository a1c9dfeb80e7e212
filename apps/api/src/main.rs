mod auth;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod parsing;
mod resumes;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::JwtKeys;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::AiClient;
use crate::parsing::pipeline::ResumePipeline;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first; a missing AI_API_KEY or SECRET_KEY aborts startup.
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV Filler API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;

    let ai = AiClient::new(
        config.ai_api_url.clone(),
        config.ai_api_key.clone(),
        config.ai_model.clone(),
    )?;
    info!("AI client initialized (model: {})", ai.model());

    let scratch_dir = config.scratch_dir();
    tokio::fs::create_dir_all(&scratch_dir).await?;
    info!("Upload scratch directory: {}", scratch_dir.display());
    let pipeline = ResumePipeline::new(Arc::new(ai), scratch_dir);

    let jwt = JwtKeys::new(&config.secret_key, config.token_ttl_days);

    let state = AppState {
        db,
        pipeline,
        jwt,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
