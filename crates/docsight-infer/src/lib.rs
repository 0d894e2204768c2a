//! DocSight Infer — inference backends and the capability registry.
//!
//! Provides the `TextGenerator`, `SummarizerBackend` and `SentimentBackend`
//! traits. When the local inference sidecar is reachable, the `Sidecar*`
//! implementations talk to it over HTTP. Without it, the `Noop*`
//! implementations are used and every pipeline stage falls back to its
//! deterministic path.

pub mod backend;
pub mod registry;
pub mod sidecar;

pub use backend::{
    GenerationRequest, NoopGenerator, NoopSentiment, NoopSummarizer, SentimentBackend,
    SummarizerBackend, TextGenerator,
};
pub use registry::InferenceRegistry;
pub use sidecar::{SidecarClient, SidecarGenerator, SidecarSentiment, SidecarSummarizer};
