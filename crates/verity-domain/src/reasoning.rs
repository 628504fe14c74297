//! Requests to and outcomes from the external reasoner

use crate::claim::Verdict;

/// Optional material accompanying a claim
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReasoningContext {
    /// URL of an image the claim was shared with
    pub image_url: Option<String>,

    /// URL of the article or post the claim came from
    pub source_url: Option<String>,

    /// Warning signs found in the source URL
    pub source_flags: Vec<String>,
}

impl ReasoningContext {
    /// Whether any context is present
    pub fn is_empty(&self) -> bool {
        self.image_url.is_none() && self.source_url.is_none() && self.source_flags.is_empty()
    }
}

/// A claim to be analyzed by a reasoner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasoningRequest {
    /// Claim text
    pub claim: String,

    /// Detected language tag
    pub language: String,

    /// Optional context
    pub context: ReasoningContext,
}

impl ReasoningRequest {
    /// Request with no extra context
    pub fn new(claim: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
            language: language.into(),
            context: ReasoningContext::default(),
        }
    }

    /// Attach context
    pub fn with_context(mut self, context: ReasoningContext) -> Self {
        self.context = context;
        self
    }
}

/// A well-formed answer from a reasoner model
#[derive(Debug, Clone, PartialEq)]
pub struct ReasonedVerdict {
    /// Verdict reported by the model
    pub verdict: Verdict,

    /// Confidence in [0, 1]
    pub confidence: f64,

    /// Explanation reported by the model
    pub explanation: String,

    /// Warning signs the model spotted in the claim
    pub red_flags: Vec<String>,

    /// Identifier of the model that answered
    pub model_used: String,
}

/// Everything a reasoner call can end in
///
/// Rate limits and blocked responses are handled inside the reasoner by
/// moving to the next model; they only surface here once every model has
/// been tried.
#[derive(Debug, Clone, PartialEq)]
pub enum ReasonerOutcome {
    /// A parsed answer
    Verdict(ReasonedVerdict),

    /// Every model was rate limited or refused to answer
    RateLimited {
        /// Models tried, in order
        attempted: Vec<String>,
    },

    /// A model answered but the answer could not be parsed
    StructuralFailure {
        /// Model that answered
        model: String,
        /// Raw response text
        raw: String,
        /// Parser error
        reason: String,
    },

    /// A non-recoverable error (auth, network, server)
    HardFailure {
        /// Model that failed
        model: String,
        /// Error message
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_to_empty_context() {
        let request = ReasoningRequest::new("claim", "en");
        assert!(request.context.is_empty());

        let request = request.with_context(ReasoningContext {
            image_url: Some("https://img.example/a.jpg".to_string()),
            ..Default::default()
        });
        assert!(!request.context.is_empty());
    }
}
