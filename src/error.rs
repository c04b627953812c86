//! Error types for the factchain pipeline.
//!
//! Only configuration and credential errors are fatal. Upstream service
//! failures are recovered where they happen, so the remaining variants
//! mostly travel between internal layers and into logs.

use factchain_search::SearchError;

/// Top-level error type for claim verification.
#[derive(Debug, thiserror::Error)]
pub enum FactchainError {
    /// Invalid configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A required API key is not set.
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    /// Language-model request or response error.
    #[error("LLM error: {0}")]
    Llm(String),

    /// Evidence search error.
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Claim pipeline coordination error.
    #[error("pipeline error: {0}")]
    Pipeline(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, FactchainError>;
