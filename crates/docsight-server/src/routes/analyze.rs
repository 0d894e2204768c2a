//! Main analysis endpoint — runs the full extraction pipeline.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use docsight_extract::gateway::GenerationGateway;
use docsight_extract::{
    extract_keywords, extract_metrics, generate_insights, generate_plot_data, summarize_text,
};

use crate::state::AppState;

const ERR_NO_TEXT: &str = "No text provided";
const ERR_TOO_SHORT: &str = "Document text too short for meaningful analysis";

/// Minimum document length accepted for analysis, in characters.
const MIN_TEXT_LEN: usize = 20;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/analyze", post(analyze))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default = "default_summary_length")]
    pub max_summary_length: usize,
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,
}

fn default_summary_length() -> usize {
    300
}

fn default_max_keywords() -> usize {
    10
}

/// Validate the request, returning the trimmed document text.
fn validate(req: &AnalyzeRequest) -> Result<String, &'static str> {
    let text = req.text.as_deref().ok_or(ERR_NO_TEXT)?.trim();
    if text.chars().count() < MIN_TEXT_LEN {
        return Err(ERR_TOO_SHORT);
    }
    Ok(text.to_string())
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    let text = match validate(&req) {
        Ok(text) => text,
        Err(message) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": message })));
        }
    };

    match run_analysis(&state, &text, req.max_summary_length, req.max_keywords).await {
        Ok(body) => (StatusCode::OK, Json(body)),
        Err(e) => {
            error!("Error processing document: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": e.to_string(),
                    "fallback_processed": true,
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                })),
            )
        }
    }
}

/// Run every pipeline stage and assemble the analysis response.
///
/// Summarization, keyword extraction, and metric extraction depend only on
/// the document and run concurrently; insight and plot synthesis follow their
/// data dependencies. Each stage contains its own failures, so a degraded
/// model never knocks out a sibling stage.
async fn run_analysis(
    state: &Arc<AppState>,
    text: &str,
    max_summary_length: usize,
    max_keywords: usize,
) -> anyhow::Result<serde_json::Value> {
    let registry = state.registry().await;
    let gateway = GenerationGateway::new(registry.generator());
    let summarizer = registry.summarizer();

    info!("Processing document ({} characters)", text.chars().count());
    let start = Instant::now();

    let (summary, keywords, metrics) = tokio::join!(
        summarize_text(&summarizer, &gateway, text, max_summary_length),
        extract_keywords(&gateway, text, max_keywords),
        extract_metrics(&gateway, text),
    );

    let insights = generate_insights(&gateway, &keywords, &metrics, &summary).await;
    let plot_data = generate_plot_data(&gateway, &keywords, &metrics).await;

    let processing_time = (start.elapsed().as_secs_f64() * 100.0).round() / 100.0;

    info!(
        "Document processed in {:.2}s - Summary: {} chars, Keywords: {}, Metrics: {}",
        processing_time,
        summary.chars().count(),
        keywords.len(),
        metrics.len()
    );

    Ok(json!({
        "summary": summary,
        "keywords": keywords,
        "metrics": metrics,
        "insights": insights,
        "plotData": plot_data,
        "processedLocally": true,
        "processedWithAI": registry.models_loaded(),
        "model": registry.reported_model(),
        "processing_time": processing_time,
        "text_length": text.chars().count(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
