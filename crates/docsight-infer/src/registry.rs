//! Process-wide capability registry.
//!
//! Holds the shared backend handles for all requests. The registry is built
//! at most once (the server guards construction behind a `tokio::sync::OnceCell`)
//! and is read-only afterwards.

use std::sync::Arc;

use docsight_core::DocsightConfig;
use tracing::{info, warn};

use crate::backend::{
    NoopGenerator, NoopSentiment, NoopSummarizer, SentimentBackend, SummarizerBackend,
    TextGenerator,
};
use crate::sidecar::{SidecarClient, SidecarGenerator, SidecarSentiment, SidecarSummarizer};

/// Shared, read-only handles to the inference capabilities.
pub struct InferenceRegistry {
    generator: Arc<dyn TextGenerator>,
    summarizer: Arc<dyn SummarizerBackend>,
    sentiment: Arc<dyn SentimentBackend>,
}

impl InferenceRegistry {
    /// Probe the sidecar and build the best available backend for each
    /// capability. Missing capabilities get noop backends; every pipeline
    /// stage treats that as expected and uses its deterministic fallback.
    pub async fn initialize(config: &DocsightConfig) -> Self {
        let sidecar = match SidecarClient::new(config) {
            Ok(c) => c,
            Err(e) => {
                warn!("Sidecar client unavailable: {}. Running with fallbacks only.", e);
                return Self::unavailable();
            }
        };

        let health = sidecar.probe().await;

        let generator: Arc<dyn TextGenerator> = if health.generation {
            info!("Text generation available ({})", config.generation_model);
            Arc::new(SidecarGenerator::new(
                sidecar.clone(),
                config.generation_model.clone(),
            ))
        } else {
            warn!("Text generation unavailable. Using deterministic fallbacks.");
            Arc::new(NoopGenerator)
        };

        let summarizer: Arc<dyn SummarizerBackend> = if health.summarization {
            info!("Summarization available ({})", config.summarization_model);
            Arc::new(SidecarSummarizer::new(
                sidecar.clone(),
                config.summarization_model.clone(),
            ))
        } else {
            warn!("Summarization unavailable. Routing summaries through generation.");
            Arc::new(NoopSummarizer)
        };

        let sentiment: Arc<dyn SentimentBackend> = if health.sentiment {
            info!("Sentiment classification available ({})", config.sentiment_model);
            Arc::new(SidecarSentiment::new(sidecar))
        } else {
            Arc::new(NoopSentiment)
        };

        Self {
            generator,
            summarizer,
            sentiment,
        }
    }

    /// Registry with every capability absent (sidecar unreachable or tests).
    pub fn unavailable() -> Self {
        Self {
            generator: Arc::new(NoopGenerator),
            summarizer: Arc::new(NoopSummarizer),
            sentiment: Arc::new(NoopSentiment),
        }
    }

    pub fn generator(&self) -> Arc<dyn TextGenerator> {
        self.generator.clone()
    }

    pub fn summarizer(&self) -> Arc<dyn SummarizerBackend> {
        self.summarizer.clone()
    }

    pub fn sentiment(&self) -> Arc<dyn SentimentBackend> {
        self.sentiment.clone()
    }

    pub fn generation_available(&self) -> bool {
        self.generator.is_available()
    }

    pub fn summarization_available(&self) -> bool {
        self.summarizer.is_available()
    }

    pub fn sentiment_available(&self) -> bool {
        self.sentiment.is_available()
    }

    /// True when any model-backed capability is available.
    pub fn models_loaded(&self) -> bool {
        self.generator.is_available()
            || self.summarizer.is_available()
            || self.sentiment.is_available()
    }

    /// Model name reported in analysis provenance.
    pub fn reported_model(&self) -> String {
        if self.generator.is_available() {
            self.generator.model_name().to_string()
        } else if self.summarizer.is_available() {
            self.summarizer.model_name().to_string()
        } else {
            "Limited AI processing".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_registry() {
        let registry = InferenceRegistry::unavailable();
        assert!(!registry.models_loaded());
        assert!(!registry.generation_available());
        assert!(!registry.summarization_available());
        assert!(!registry.sentiment_available());
        assert_eq!(registry.reported_model(), "Limited AI processing");
    }

    #[tokio::test]
    async fn test_initialize_without_sidecar_degrades() {
        let config = docsight_core::DocsightConfig {
            sidecar_url: "http://127.0.0.1:1".to_string(),
            sidecar_timeout_secs: 1,
            ..Default::default()
        };
        let registry = InferenceRegistry::initialize(&config).await;
        assert!(!registry.models_loaded());
    }
}
