//! HTTP route handlers.

pub mod analyze;
pub mod health;
pub mod keywords;
pub mod summarize;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(analyze::routes())
        .merge(keywords::routes())
        .merge(summarize::routes())
        .merge(health::routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
