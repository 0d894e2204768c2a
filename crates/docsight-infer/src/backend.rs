//! Backend traits and noop implementations.
//!
//! The generation/summarization/sentiment models are opaque collaborators:
//! complete text in, complete text out, no token streaming. Each trait has a
//! noop implementation that reports itself unavailable so callers can select
//! their deterministic fallback.

use async_trait::async_trait;
use docsight_core::{Error, Result};

/// A single generation call. Constructed per call, not persisted.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_new_tokens: u32,
    pub temperature: f64,
    /// When set, sampling is disabled for reproducible output.
    pub deterministic: bool,
    /// Suppresses loop artifacts typical of small/distilled models.
    pub repetition_penalty: f64,
    pub no_repeat_ngram_size: u32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, max_new_tokens: u32, temperature: f64) -> Self {
        Self {
            prompt: prompt.into(),
            max_new_tokens,
            temperature,
            deterministic: false,
            repetition_penalty: 1.2,
            no_repeat_ngram_size: 3,
        }
    }
}

/// Trait for text-generation backends.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for the request. Returns the raw model text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    /// Check if the backend is available (model reachable).
    fn is_available(&self) -> bool;

    /// Name of the underlying model.
    fn model_name(&self) -> &str;
}

/// Trait for dedicated summarization backends.
#[async_trait]
pub trait SummarizerBackend: Send + Sync {
    /// Summarize `text` into roughly `min_length..=max_length` words.
    async fn summarize(&self, text: &str, max_length: usize, min_length: usize)
        -> Result<String>;

    fn is_available(&self) -> bool;

    fn model_name(&self) -> &str;
}

/// Trait for sentiment-classification backends.
#[async_trait]
pub trait SentimentBackend: Send + Sync {
    /// Classify sentiment, returning the top label (e.g. "positive").
    async fn classify(&self, text: &str) -> Result<String>;

    fn is_available(&self) -> bool;
}

/// Placeholder generator used when no sidecar is reachable.
pub struct NoopGenerator;

#[async_trait]
impl TextGenerator for NoopGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
        Err(Error::BackendUnavailable("text generation".into()))
    }

    fn is_available(&self) -> bool {
        false
    }

    fn model_name(&self) -> &str {
        "none"
    }
}

/// Placeholder summarizer used when no sidecar is reachable.
pub struct NoopSummarizer;

#[async_trait]
impl SummarizerBackend for NoopSummarizer {
    async fn summarize(
        &self,
        _text: &str,
        _max_length: usize,
        _min_length: usize,
    ) -> Result<String> {
        Err(Error::BackendUnavailable("summarization".into()))
    }

    fn is_available(&self) -> bool {
        false
    }

    fn model_name(&self) -> &str {
        "none"
    }
}

/// Placeholder sentiment classifier used when no sidecar is reachable.
pub struct NoopSentiment;

#[async_trait]
impl SentimentBackend for NoopSentiment {
    async fn classify(&self, _text: &str) -> Result<String> {
        Err(Error::BackendUnavailable("sentiment".into()))
    }

    fn is_available(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_request_defaults() {
        let req = GenerationRequest::new("prompt", 200, 0.7);
        assert!(!req.deterministic);
        assert_eq!(req.repetition_penalty, 1.2);
        assert_eq!(req.no_repeat_ngram_size, 3);
    }

    #[tokio::test]
    async fn test_noop_backends_signal_unavailable() {
        let generator = NoopGenerator;
        assert!(!generator.is_available());
        let result = generator
            .generate(&GenerationRequest::new("prompt", 10, 0.5))
            .await;
        assert!(matches!(result, Err(Error::BackendUnavailable(_))));

        let summarizer = NoopSummarizer;
        assert!(!summarizer.is_available());
        assert!(summarizer.summarize("text", 100, 30).await.is_err());

        let sentiment = NoopSentiment;
        assert!(!sentiment.is_available());
        assert!(sentiment.classify("text").await.is_err());
    }
}
