use axum::Json;
use serde_json::{json, Value};

/// GET /health and GET /api/health
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "cvfiller-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
