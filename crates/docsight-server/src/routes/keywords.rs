//! Keyword extraction endpoint — exposes the Keyword Extractor in isolation.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use docsight_extract::gateway::GenerationGateway;
use docsight_extract::extract_keywords;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/keywords", post(keywords))
}

#[derive(Debug, Deserialize)]
pub struct KeywordsRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,
}

fn default_max_keywords() -> usize {
    10
}

async fn keywords(
    State(state): State<Arc<AppState>>,
    Json(req): Json<KeywordsRequest>,
) -> Json<serde_json::Value> {
    let registry = state.registry().await;
    let gateway = GenerationGateway::new(registry.generator());

    let keywords = extract_keywords(&gateway, &req.text, req.max_keywords).await;

    Json(serde_json::json!({
        "keywords": keywords,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
