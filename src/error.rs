//! Error types for Crust.

use std::time::Duration;
use thiserror::Error;

/// Library-level error type for Crust operations.
#[derive(Error, Debug)]
pub enum CrustError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Answer generation failed: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Ollama API error (status {status}): {message}")]
    Ollama { status: u16, message: String },

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("{operation} timed out after {limit:?}")]
    Timeout { operation: &'static str, limit: Duration },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Crust operations.
pub type Result<T> = std::result::Result<T, CrustError>;
