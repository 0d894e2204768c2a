//! Summarization stage — dedicated summarization model when available,
//! generation gateway otherwise, extractive fallback on failure.

use std::sync::Arc;

use docsight_infer::SummarizerBackend;
use tracing::warn;

use crate::clean::clean_generated;
use crate::gateway::GenerationGateway;
use crate::normalize::{normalize_whitespace, truncate_chars, word_count};

/// Fixed response for inputs below the summarization threshold. No model call
/// is made for these.
pub const TOO_SHORT_NOTICE: &str = "Document too short for summarization.";

/// Input ceiling of the summarization model, in characters.
const SUMMARIZER_INPUT_LIMIT: usize = 1024;

/// Summarize `text` to roughly `max_length` length.
///
/// Inputs under 50 characters get the fixed too-short notice. When the
/// dedicated summarizer is available and the normalized text is over 100
/// characters it is used with length bounds derived from the input's word
/// count; otherwise the generation gateway is prompted with an explicit word
/// budget at low temperature. Summarizer errors fall back to extractive
/// summarization.
pub async fn summarize_text(
    summarizer: &Arc<dyn SummarizerBackend>,
    gateway: &GenerationGateway,
    text: &str,
    max_length: usize,
) -> String {
    if text.trim().chars().count() < 50 {
        return TOO_SHORT_NOTICE.to_string();
    }

    let clean_text = normalize_whitespace(text);

    if summarizer.is_available() && clean_text.chars().count() > 100 {
        let input_text = truncate_chars(&clean_text, SUMMARIZER_INPUT_LIMIT);
        let capped_max = max_length.min(word_count(input_text) / 2);
        let min_length = 30.max(max_length / 4);

        match summarizer.summarize(input_text, capped_max, min_length).await {
            Ok(raw) => {
                let summary = clean_generated(&raw, "");
                if summary.is_empty() {
                    format!("{}...", truncate_chars(input_text, max_length))
                } else {
                    summary
                }
            }
            Err(e) => {
                warn!("Summarization error: {}", e);
                extractive_summary(text, max_length)
            }
        }
    } else {
        let prompt = format!(
            "Summarize this business document in exactly {} words or less. \
             Focus on key facts and numbers:\n\n{}\n\nConcise summary:",
            max_length,
            truncate_chars(&clean_text, 1000)
        );
        gateway.generate(&prompt, (max_length / 2) as u32, 0.3).await
    }
}

/// Extractive fallback: the first three sentences longer than 20 characters,
/// truncated to `max_length` with a forced trailing period.
pub fn extractive_summary(text: &str, max_length: usize) -> String {
    let sentences: Vec<&str> = text
        .split('.')
        .map(str::trim)
        .filter(|s| s.chars().count() > 20)
        .take(3)
        .collect();

    let joined = sentences.join(". ");
    let mut result = truncate_chars(&joined, max_length).to_string();
    if !result.ends_with('.') {
        result.push('.');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docsight_core::{Error, Result};
    use docsight_infer::{GenerationRequest, NoopSummarizer, TextGenerator};

    struct CountingGenerator(std::sync::atomic::AtomicUsize);

    #[async_trait]
    impl TextGenerator for CountingGenerator {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok("A generated business summary with enough length.".to_string())
        }
        fn is_available(&self) -> bool {
            true
        }
        fn model_name(&self) -> &str {
            "counting"
        }
    }

    struct FixedSummarizer(&'static str);

    #[async_trait]
    impl SummarizerBackend for FixedSummarizer {
        async fn summarize(
            &self,
            _text: &str,
            _max_length: usize,
            _min_length: usize,
        ) -> Result<String> {
            Ok(self.0.to_string())
        }
        fn is_available(&self) -> bool {
            true
        }
        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    struct ErroringSummarizer;

    #[async_trait]
    impl SummarizerBackend for ErroringSummarizer {
        async fn summarize(
            &self,
            _text: &str,
            _max_length: usize,
            _min_length: usize,
        ) -> Result<String> {
            Err(Error::Summarization("model crashed".into()))
        }
        fn is_available(&self) -> bool {
            true
        }
        fn model_name(&self) -> &str {
            "erroring"
        }
    }

    fn noop_summarizer() -> Arc<dyn SummarizerBackend> {
        Arc::new(NoopSummarizer)
    }

    #[tokio::test]
    async fn test_short_input_skips_generation() {
        let counter = Arc::new(CountingGenerator(std::sync::atomic::AtomicUsize::new(0)));
        let gateway = GenerationGateway::new(counter.clone());
        let summarizer = noop_summarizer();

        let out = summarize_text(&summarizer, &gateway, "too short to bother", 150).await;
        assert_eq!(out, TOO_SHORT_NOTICE);
        assert_eq!(counter.0.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dedicated_summarizer_output_is_cleaned() {
        let summarizer: Arc<dyn SummarizerBackend> = Arc::new(FixedSummarizer(
            "The company grew revenue sharply. The company grew revenue sharply.",
        ));
        let gateway = GenerationGateway::new(Arc::new(CountingGenerator(
            std::sync::atomic::AtomicUsize::new(0),
        )));

        let text = "The annual report covers revenue, margins, headcount, and product \
                    strategy across all regions for the fiscal year in detail.";
        let out = summarize_text(&summarizer, &gateway, text, 150).await;
        assert_eq!(out, "The company grew revenue sharply.");
    }

    #[tokio::test]
    async fn test_summarizer_error_falls_back_to_extractive() {
        let summarizer: Arc<dyn SummarizerBackend> = Arc::new(ErroringSummarizer);
        let gateway = GenerationGateway::new(Arc::new(CountingGenerator(
            std::sync::atomic::AtomicUsize::new(0),
        )));

        let text = "The first sentence describes strong quarterly revenue growth. \
                    The second sentence covers operating margin improvements. \
                    The third sentence notes headcount expansion across regions. \
                    The fourth sentence is never included.";
        let out = summarize_text(&summarizer, &gateway, text, 300).await;
        assert!(out.starts_with("The first sentence"));
        assert!(out.contains("The third sentence"));
        assert!(!out.contains("fourth"));
        assert!(out.ends_with('.'));
    }

    #[tokio::test]
    async fn test_routes_through_gateway_without_summarizer() {
        let counter = Arc::new(CountingGenerator(std::sync::atomic::AtomicUsize::new(0)));
        let gateway = GenerationGateway::new(counter.clone());
        let summarizer = noop_summarizer();

        let text = "A business document long enough to clear the minimum length \
                    threshold for summarization, with facts and numbers inside.";
        let out = summarize_text(&summarizer, &gateway, text, 150).await;
        assert_eq!(out, "A generated business summary with enough length.");
        assert_eq!(counter.0.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn test_extractive_summary_truncates() {
        let text = "This opening sentence is certainly long enough to keep. Short. \
                    Another sufficiently long sentence follows here.";
        let out = extractive_summary(text, 40);
        assert!(out.chars().count() <= 41);
        assert!(out.ends_with('.'));
    }
}
