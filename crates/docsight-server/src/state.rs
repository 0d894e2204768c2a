//! Shared application state.

use std::sync::Arc;

use docsight_core::DocsightConfig;
use docsight_infer::InferenceRegistry;
use tokio::sync::OnceCell;

/// Shared application state accessible from all route handlers.
///
/// The inference registry is the only shared mutable resource; it is built at
/// most once process-wide, even under concurrent first requests, and is
/// read-only afterwards.
pub struct AppState {
    pub config: DocsightConfig,
    registry: OnceCell<Arc<InferenceRegistry>>,
}

impl AppState {
    pub fn new(config: DocsightConfig) -> Self {
        Self {
            config,
            registry: OnceCell::new(),
        }
    }

    /// Get the inference registry, initializing it on first use.
    pub async fn registry(&self) -> Arc<InferenceRegistry> {
        self.registry
            .get_or_init(|| async { Arc::new(InferenceRegistry::initialize(&self.config).await) })
            .await
            .clone()
    }
}
