//! Generation gateway — the single choke point for all free-text model calls.
//!
//! Wraps prompts in the fixed conversational template the generation model
//! was tuned on, applies sampling controls that suppress loop artifacts, and
//! absorbs every backend failure locally. Callers always get a string back.

use std::sync::Arc;

use docsight_infer::{GenerationRequest, TextGenerator};
use tracing::warn;

use crate::clean::clean_generated;

/// Returned whenever the backend is absent or errors. Generation failure is
/// contained here, never propagated.
pub const DEGRADED_NOTICE: &str = "Analysis completed with limited AI processing capabilities.";

/// Returned when the model produced output but nothing survived cleaning.
pub const COMPLETED_NOTICE: &str = "Analysis completed with AI processing.";

const SYSTEM_PROMPT: &str =
    "You are an expert business analyst. Provide concise, professional analysis.";

/// Gateway over the text-generation capability.
pub struct GenerationGateway {
    backend: Arc<dyn TextGenerator>,
}

impl GenerationGateway {
    pub fn new(backend: Arc<dyn TextGenerator>) -> Self {
        Self { backend }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    /// Wrap a user prompt in the Llama-style conversational template.
    fn structured_prompt(prompt: &str) -> String {
        format!(
            "<|begin_of_text|><|start_header_id|>system<|end_header_id|>\n\
             {SYSTEM_PROMPT}<|eot_id|><|start_header_id|>user<|end_header_id|>\n\
             {prompt}<|eot_id|><|start_header_id|>assistant<|end_header_id|>\n"
        )
    }

    /// Generate cleaned text for a prompt. Never fails: backend errors and
    /// empty output degrade to fixed notices.
    pub async fn generate(&self, prompt: &str, max_new_tokens: u32, temperature: f64) -> String {
        let structured = Self::structured_prompt(prompt);
        let request = GenerationRequest::new(structured.clone(), max_new_tokens, temperature);

        match self.backend.generate(&request).await {
            Ok(raw) => {
                let cleaned = clean_generated(raw.trim(), &structured);
                if cleaned.is_empty() {
                    COMPLETED_NOTICE.to_string()
                } else {
                    cleaned
                }
            }
            Err(e) => {
                warn!("Text generation error: {}", e);
                DEGRADED_NOTICE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docsight_core::{Error, Result};

    struct Scripted(&'static str);

    #[async_trait]
    impl TextGenerator for Scripted {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
            Ok(self.0.to_string())
        }
        fn is_available(&self) -> bool {
            true
        }
        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    struct Failing;

    #[async_trait]
    impl TextGenerator for Failing {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
            Err(Error::Generation("connection refused".into()))
        }
        fn is_available(&self) -> bool {
            false
        }
        fn model_name(&self) -> &str {
            "none"
        }
    }

    #[tokio::test]
    async fn test_absorbs_backend_failure() {
        let gateway = GenerationGateway::new(Arc::new(Failing));
        let out = gateway.generate("Analyze this", 100, 0.7).await;
        assert_eq!(out, DEGRADED_NOTICE);
    }

    #[tokio::test]
    async fn test_cleans_scripted_output() {
        let gateway = GenerationGateway::new(Arc::new(Scripted(
            "Revenue grew strongly this year. Revenue grew strongly this year.",
        )));
        let out = gateway.generate("Analyze this", 100, 0.7).await;
        assert_eq!(out, "Revenue grew strongly this year.");
    }

    #[tokio::test]
    async fn test_empty_output_degrades_to_notice() {
        let gateway = GenerationGateway::new(Arc::new(Scripted("ok. no.")));
        let out = gateway.generate("Analyze this", 100, 0.7).await;
        assert_eq!(out, COMPLETED_NOTICE);
    }

    #[test]
    fn test_template_wraps_prompt() {
        let structured = GenerationGateway::structured_prompt("What changed?");
        assert!(structured.starts_with("<|begin_of_text|>"));
        assert!(structured.contains("What changed?"));
        assert!(structured.ends_with("<|start_header_id|>assistant<|end_header_id|>\n"));
    }
}
