//! Configuration from environment variables.

use serde::{Deserialize, Serialize};

pub const DEFAULT_GENERATION_MODEL: &str = "meta-llama/Llama-3.1-8B-Instruct";
pub const DEFAULT_SUMMARIZATION_MODEL: &str = "facebook/bart-large-cnn";
pub const DEFAULT_SENTIMENT_MODEL: &str = "cardiffnlp/twitter-roberta-base-sentiment-latest";

/// Top-level DocSight configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsightConfig {
    /// HTTP server port.
    pub port: u16,
    /// Base URL of the local inference sidecar.
    pub sidecar_url: String,
    /// Text-generation model served by the sidecar.
    pub generation_model: String,
    /// Summarization model served by the sidecar.
    pub summarization_model: String,
    /// Sentiment model served by the sidecar.
    pub sentiment_model: String,
    /// Per-request timeout for sidecar calls, in seconds.
    pub sidecar_timeout_secs: u64,
}

impl DocsightConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5001);

        let sidecar_url = std::env::var("DOCSIGHT_SIDECAR_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());

        let generation_model = std::env::var("DOCSIGHT_GENERATION_MODEL")
            .unwrap_or_else(|_| DEFAULT_GENERATION_MODEL.to_string());
        let summarization_model = std::env::var("DOCSIGHT_SUMMARIZATION_MODEL")
            .unwrap_or_else(|_| DEFAULT_SUMMARIZATION_MODEL.to_string());
        let sentiment_model = std::env::var("DOCSIGHT_SENTIMENT_MODEL")
            .unwrap_or_else(|_| DEFAULT_SENTIMENT_MODEL.to_string());

        let sidecar_timeout_secs = std::env::var("DOCSIGHT_SIDECAR_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(120);

        Self {
            port,
            sidecar_url,
            generation_model,
            summarization_model,
            sentiment_model,
            sidecar_timeout_secs,
        }
    }
}

impl Default for DocsightConfig {
    fn default() -> Self {
        Self {
            port: 5001,
            sidecar_url: "http://127.0.0.1:8080".to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            summarization_model: DEFAULT_SUMMARIZATION_MODEL.to_string(),
            sentiment_model: DEFAULT_SENTIMENT_MODEL.to_string(),
            sidecar_timeout_secs: 120,
        }
    }
}
