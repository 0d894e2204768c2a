//! Summarization endpoint — exposes the Summarizer in isolation.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use docsight_extract::gateway::GenerationGateway;
use docsight_extract::summarize_text;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/summarize", post(summarize))
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_max_length() -> usize {
    150
}

async fn summarize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SummarizeRequest>,
) -> Json<serde_json::Value> {
    let registry = state.registry().await;
    let gateway = GenerationGateway::new(registry.generator());
    let summarizer = registry.summarizer();

    let summary = summarize_text(&summarizer, &gateway, &req.text, req.max_length).await;

    Json(serde_json::json!({
        "summary": summary,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
