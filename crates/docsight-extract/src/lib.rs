//! DocSight Extract — the document analysis pipeline.
//!
//! Turns free-form model completions into structured business data. Every
//! stage consumes the original document plus prior stage output, absorbs its
//! own failures, and falls back through a chain of strategies of decreasing
//! AI-dependence, so a degraded or absent model never aborts a request.
//!
//! Stages: whitespace normalization → generation gateway → output cleaning →
//! summarization → keyword extraction → metric extraction with grounding →
//! insight synthesis → plot data synthesis.

pub mod clean;
pub mod gateway;
pub mod insights;
pub mod keywords;
pub mod metrics;
pub mod normalize;
pub mod plots;
pub mod summarize;
pub mod types;

pub use clean::clean_generated;
pub use gateway::{GenerationGateway, DEGRADED_NOTICE};
pub use insights::generate_insights;
pub use keywords::extract_keywords;
pub use metrics::extract_metrics;
pub use plots::generate_plot_data;
pub use summarize::{summarize_text, TOO_SHORT_NOTICE};
pub use types::{ChartType, Metric, PlotSpec};
