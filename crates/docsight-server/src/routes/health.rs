//! Readiness endpoint — reports capability availability and triggers lazy
//! initialization if it has not happened yet.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let registry = state.registry().await;

    Json(serde_json::json!({
        "status": "healthy",
        "models_loaded": registry.models_loaded(),
        "model_details": {
            "generation_available": registry.generation_available(),
            "summarization_available": registry.summarization_available(),
            "sentiment_available": registry.sentiment_available(),
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
