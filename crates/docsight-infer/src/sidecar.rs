//! HTTP implementations backed by a local inference sidecar.
//!
//! The sidecar serves Hugging Face pipelines behind a small JSON API:
//!
//! - `GET  /health`   → `{"generation": bool, "summarization": bool, "sentiment": bool}`
//! - `POST /generate` → TGI-style `{"inputs", "parameters": {...}}`,
//!   returns `{"generated_text": "..."}` (or a one-element array of it)
//! - `POST /summarize` → `{"inputs", "parameters": {"max_length", "min_length"}}`,
//!   returns `[{"summary_text": "..."}]`
//! - `POST /sentiment` → `{"inputs"}`, returns `[[{"label", "score"}, ...]]`
//!
//! Responses are parsed defensively; the sidecar is never trusted to be
//! well-formed.

use std::time::Duration;

use async_trait::async_trait;
use docsight_core::{DocsightConfig, Error, Result};
use reqwest::Client;
use serde_json::json;
use tracing::debug;

/// Shared HTTP client and base URL for all sidecar capabilities.
#[derive(Clone)]
pub struct SidecarClient {
    client: Client,
    base_url: String,
}

/// Capability flags reported by the sidecar health endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarHealth {
    pub generation: bool,
    pub summarization: bool,
    pub sentiment: bool,
}

impl SidecarClient {
    pub fn new(config: &DocsightConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.sidecar_timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.sidecar_url.trim_end_matches('/').to_string(),
        })
    }

    /// Probe the sidecar health endpoint. Unreachable means all capabilities off.
    pub async fn probe(&self) -> SidecarHealth {
        let url = format!("{}/health", self.base_url);
        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!("Sidecar probe failed: {}", e);
                return SidecarHealth::default();
            }
        };

        if !response.status().is_success() {
            return SidecarHealth::default();
        }

        let body: serde_json::Value = match response.json().await {
            Ok(v) => v,
            Err(_) => return SidecarHealth::default(),
        };

        SidecarHealth {
            generation: body["generation"].as_bool().unwrap_or(false),
            summarization: body["summarization"].as_bool().unwrap_or(false),
            sentiment: body["sentiment"].as_bool().unwrap_or(false),
        }
    }

    async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Http(format!("request to {} failed: {}", path, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Http(format!("{} returned {}: {}", path, status, text)));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Http(format!("invalid JSON from {}: {}", path, e)))
    }
}

/// Text generation over the sidecar `/generate` endpoint.
pub struct SidecarGenerator {
    sidecar: SidecarClient,
    model: String,
}

impl SidecarGenerator {
    pub fn new(sidecar: SidecarClient, model: impl Into<String>) -> Self {
        Self {
            sidecar,
            model: model.into(),
        }
    }
}

#[async_trait]
impl crate::backend::TextGenerator for SidecarGenerator {
    async fn generate(&self, request: &crate::backend::GenerationRequest) -> Result<String> {
        let body = json!({
            "inputs": request.prompt,
            "parameters": {
                "max_new_tokens": request.max_new_tokens,
                "temperature": request.temperature,
                "do_sample": !request.deterministic,
                "repetition_penalty": request.repetition_penalty,
                "no_repeat_ngram_size": request.no_repeat_ngram_size,
                "return_full_text": false,
            },
        });

        let value = self.sidecar.post_json("/generate", body).await?;

        // Single object or one-element array, depending on sidecar version.
        let text = value["generated_text"]
            .as_str()
            .or_else(|| value[0]["generated_text"].as_str())
            .ok_or_else(|| Error::Generation("no generated_text in response".into()))?;

        Ok(text.trim().to_string())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Summarization over the sidecar `/summarize` endpoint.
pub struct SidecarSummarizer {
    sidecar: SidecarClient,
    model: String,
}

impl SidecarSummarizer {
    pub fn new(sidecar: SidecarClient, model: impl Into<String>) -> Self {
        Self {
            sidecar,
            model: model.into(),
        }
    }
}

#[async_trait]
impl crate::backend::SummarizerBackend for SidecarSummarizer {
    async fn summarize(
        &self,
        text: &str,
        max_length: usize,
        min_length: usize,
    ) -> Result<String> {
        let body = json!({
            "inputs": text,
            "parameters": {
                "max_length": max_length,
                "min_length": min_length,
                "do_sample": false,
                "length_penalty": 1.0,
                "no_repeat_ngram_size": 3,
            },
        });

        let value = self.sidecar.post_json("/summarize", body).await?;

        let summary = value[0]["summary_text"]
            .as_str()
            .or_else(|| value["summary_text"].as_str())
            .ok_or_else(|| Error::Summarization("no summary_text in response".into()))?;

        Ok(summary.trim().to_string())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Sentiment classification over the sidecar `/sentiment` endpoint.
pub struct SidecarSentiment {
    sidecar: SidecarClient,
}

impl SidecarSentiment {
    pub fn new(sidecar: SidecarClient) -> Self {
        Self { sidecar }
    }
}

#[async_trait]
impl crate::backend::SentimentBackend for SidecarSentiment {
    async fn classify(&self, text: &str) -> Result<String> {
        let body = json!({ "inputs": text });
        let value = self.sidecar.post_json("/sentiment", body).await?;

        // Pipeline shape: [[{"label": ..., "score": ...}, ...]]
        let scores = value[0]
            .as_array()
            .ok_or_else(|| Error::Sentiment("unexpected response shape".into()))?;

        let top = scores
            .iter()
            .max_by(|a, b| {
                let sa = a["score"].as_f64().unwrap_or(0.0);
                let sb = b["score"].as_f64().unwrap_or(0.0);
                sa.partial_cmp(&sb).unwrap_or(std::cmp::Ordering::Equal)
            })
            .and_then(|v| v["label"].as_str())
            .ok_or_else(|| Error::Sentiment("no label in response".into()))?;

        Ok(top.to_string())
    }

    fn is_available(&self) -> bool {
        true
    }
}
