//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Claim store error
    #[error("Store error: {0}")]
    Store(#[from] verity_store::StoreError),

    /// Query could not be resolved
    #[error(transparent)]
    Pipeline(#[from] verity_pipeline::PipelineError),

    /// Ingestion setup error
    #[error(transparent)]
    Ingest(#[from] verity_ingest::IngestError),

    /// Reasoner setup error
    #[error("Reasoner error: {0}")]
    Reasoner(#[from] verity_reasoner::LlmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
