//! Error types for ingestion

use thiserror::Error;

/// Errors that can occur during ingestion
#[derive(Error, Debug)]
pub enum IngestError {
    /// A source could not be read
    #[error("Source '{name}' failed: {message}")]
    Source {
        /// Source name
        name: String,
        /// Error message
        message: String,
    },

    /// A scraped entry could not be turned into a record
    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    /// Embedding error
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error reading a source file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Source file is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
