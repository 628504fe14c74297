//! Error types for model providers

use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit or quota exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// The model answered but returned no content (safety block or similar)
    #[error("Response blocked: {0}")]
    ContentBlocked(String),

    /// Provider configuration error (missing key, bad endpoint)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Whether this error means "try the next model"
    ///
    /// Only [`LlmError::RateLimitExceeded`] qualifies. Providers classify
    /// throttling by status code when they build the error; message text is
    /// never inspected.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, LlmError::RateLimitExceeded(_))
    }
}

/// Errors from turning model output into a verdict
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No JSON object could be located in the response
    #[error("No JSON object in response")]
    NoJsonObject,

    /// The JSON was syntactically invalid
    #[error("JSON parse error: {0}")]
    Json(String),

    /// A required field was missing or had the wrong type
    #[error("Missing or invalid '{0}'")]
    Field(&'static str),

    /// The verdict was not one of the known names
    #[error("Unknown verdict '{0}'")]
    UnknownVerdict(String),

    /// Confidence outside [0, 1] or not finite
    #[error("Confidence {0} out of range [0.0, 1.0]")]
    ConfidenceOutOfRange(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_classification() {
        assert!(LlmError::RateLimitExceeded("m".into()).is_rate_limit());
        assert!(!LlmError::Communication(
            "HTTP 500 Internal Server Error: Internal error encountered (request 7f4290ab)".into()
        )
        .is_rate_limit());
        assert!(!LlmError::Other("Quota exhausted for project".into()).is_rate_limit());
        assert!(!LlmError::Communication("connection refused".into()).is_rate_limit());
        assert!(!LlmError::ContentBlocked("SAFETY".into()).is_rate_limit());
        assert!(!LlmError::ModelNotAvailable("m".into()).is_rate_limit());
    }
}
