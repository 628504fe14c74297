//! Error types for the decision pipeline
//!
//! These are the hard failures a caller must handle explicitly. Outcomes
//! such as "no match" or "malformed reasoner output" are not errors; they
//! come back as an abstained decision.

use thiserror::Error;

/// Errors that can occur while verifying a claim
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// The embedder failed; the query cannot proceed
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// The claim store failed on the query path
    #[error("Store error: {0}")]
    Store(String),

    /// Every reasoner model was rate limited
    #[error("All reasoner models rate limited: {}", models.join(", "))]
    ReasonerRateLimited {
        /// Models tried, in order
        models: Vec<String>,
    },

    /// A reasoner model failed with a non-retryable error
    #[error("Reasoner model '{model}' failed: {message}")]
    ReasonerFailed {
        /// Model that failed
        model: String,
        /// Error message
        message: String,
    },

    /// The reasoner did not answer within the configured time
    #[error("Reasoner timed out after {0}s")]
    ReasonerTimeout(u64),

    /// The blocking reasoner task panicked or was cancelled
    #[error("Task join error: {0}")]
    TaskJoin(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Whether the same query may succeed if retried later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PipelineError::ReasonerRateLimited { .. } | PipelineError::ReasonerTimeout(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_message_lists_models() {
        let err = PipelineError::ReasonerRateLimited {
            models: vec!["gemini-2.5-pro".to_string(), "gemini-2.0-flash".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "All reasoner models rate limited: gemini-2.5-pro, gemini-2.0-flash"
        );
        assert!(err.is_retryable());
        assert!(!PipelineError::Embedding("down".into()).is_retryable());
    }
}
