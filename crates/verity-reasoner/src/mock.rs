//! Mock LLM provider for deterministic testing

use crate::error::LlmError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use verity_domain::traits::LlmProvider;

/// Mock LLM provider for deterministic testing
///
/// Returns scripted replies in order, one per call, then falls back to a
/// default response (or a fixed error) once the script runs out. No network
/// calls are made.
///
/// # Examples
///
/// ```
/// use verity_domain::traits::LlmProvider;
/// use verity_reasoner::{LlmError, MockProvider};
///
/// let provider = MockProvider::new("gemini-2.5-pro", "fallback")
///     .then_error(LlmError::RateLimitExceeded("quota".into()))
///     .then_reply("first answer");
///
/// assert!(provider.generate("p").is_err());
/// assert_eq!(provider.generate("p").unwrap(), "first answer");
/// assert_eq!(provider.generate("p").unwrap(), "fallback");
/// assert_eq!(provider.call_count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    model: String,
    default_response: String,
    script: Arc<Mutex<VecDeque<Result<String, LlmError>>>>,
    call_count: Arc<Mutex<usize>>,
    last_prompt: Arc<Mutex<Option<String>>>,
    fallback_error: Option<LlmError>,
}

impl MockProvider {
    /// Create a provider answering every prompt with `response`
    pub fn new(model: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            default_response: response.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
            fallback_error: None,
        }
    }

    /// Provider that is always rate limited
    pub fn rate_limited(model: impl Into<String>) -> Self {
        let model = model.into();
        let error = LlmError::RateLimitExceeded(format!("429 quota exceeded for {}", model));
        Self::new(model, "").always_error(error)
    }

    /// Return `error` on every call once the script runs out
    pub fn always_error(mut self, error: LlmError) -> Self {
        self.fallback_error = Some(error);
        self
    }

    /// Queue a successful reply
    pub fn then_reply(self, response: impl Into<String>) -> Self {
        self.push(Ok(response.into()));
        self
    }

    /// Queue an error
    pub fn then_error(self, error: LlmError) -> Self {
        self.push(Err(error));
        self
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.call_count.lock().map(|c| *c).unwrap_or(0)
    }

    /// The most recent prompt received
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }

    fn push(&self, reply: Result<String, LlmError>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(reply);
        }
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    fn model_name(&self) -> &str {
        &self.model
    }

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        if let Ok(mut count) = self.call_count.lock() {
            *count += 1;
        }
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }

        let next = self
            .script
            .lock()
            .map_err(|_| LlmError::Other("Mock script lock poisoned".to_string()))?
            .pop_front();

        match (next, &self.fallback_error) {
            (Some(reply), _) => reply,
            (None, Some(error)) => Err(error.clone()),
            (None, None) => Ok(self.default_response.clone()),
        }
    }
}
