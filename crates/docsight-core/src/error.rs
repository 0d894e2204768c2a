//! Error types for DocSight.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Summarization error: {0}")]
    Summarization(String),

    #[error("Sentiment error: {0}")]
    Sentiment(String),

    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
