use sqlx::SqlitePool;

use crate::auth::JwtKeys;
use crate::config::Config;
use crate::parsing::pipeline::ResumePipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    /// Extraction and advice runs; holds the model client behind `Arc<dyn ChatCompletion>`.
    pub pipeline: ResumePipeline,
    pub jwt: JwtKeys,
    pub config: Config,
}
