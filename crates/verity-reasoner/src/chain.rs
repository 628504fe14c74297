//! Priority-ordered model chain
//!
//! Tries models in priority order. A rate-limited or blocked model hands
//! the request to the next one; any other provider error ends the attempt
//! at once. A response that arrives but cannot be parsed is returned as a
//! structural failure carrying the raw text.

use crate::config::ReasonerConfig;
use crate::error::LlmError;
use crate::gemini::GeminiProvider;
use crate::parser::parse_reasoner_response;
use crate::prompt::PromptBuilder;
use tracing::{debug, info, warn};
use verity_domain::traits::{LlmProvider, Reasoner};
use verity_domain::{ReasonerOutcome, ReasoningRequest};

/// A model provider usable in a chain
pub type DynProvider = Box<dyn LlmProvider<Error = LlmError> + Send + Sync>;

struct ModelSlot {
    priority: u32,
    provider: DynProvider,
}

/// Reasoner backed by an ordered list of model providers
pub struct ModelChain {
    slots: Vec<ModelSlot>,
}

impl Default for ModelChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Add a provider with a priority; lower priorities are tried first
    ///
    /// Providers with equal priority are tried in insertion order.
    pub fn with_provider(mut self, priority: u32, provider: DynProvider) -> Self {
        self.slots.push(ModelSlot { priority, provider });
        self.slots.sort_by_key(|slot| slot.priority);
        self
    }

    /// Build a Gemini-backed chain from configuration
    pub fn from_config(config: &ReasonerConfig, api_key: &str) -> Result<Self, LlmError> {
        config.validate().map_err(LlmError::Config)?;
        let mut chain = Self::new();
        for model in config.ordered_models() {
            let provider = GeminiProvider::new(config, model.name.clone(), api_key)?;
            chain = chain.with_provider(model.priority, Box::new(provider));
        }
        Ok(chain)
    }

    /// Model names in the order they will be tried
    pub fn models(&self) -> Vec<String> {
        self.slots
            .iter()
            .map(|slot| slot.provider.model_name().to_string())
            .collect()
    }

    /// Whether the chain has no models
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Reasoner for ModelChain {
    fn name(&self) -> &str {
        "model-chain"
    }

    fn reason(&self, request: &ReasoningRequest) -> ReasonerOutcome {
        let prompt = PromptBuilder::new(request).build();
        let mut attempted = Vec::with_capacity(self.slots.len());
        let mut rate_limited = false;

        for slot in &self.slots {
            let model = slot.provider.model_name().to_string();
            attempted.push(model.clone());
            debug!(model = %model, priority = slot.priority, "Trying model");

            match slot.provider.generate(&prompt) {
                Ok(text) => {
                    return match parse_reasoner_response(&text, &model) {
                        Ok(verdict) => {
                            info!(
                                model = %model,
                                verdict = %verdict.verdict,
                                confidence = verdict.confidence,
                                "Reasoner answered"
                            );
                            ReasonerOutcome::Verdict(verdict)
                        }
                        Err(e) => {
                            warn!(model = %model, error = %e, "Malformed reasoner response");
                            ReasonerOutcome::StructuralFailure {
                                model,
                                raw: text,
                                reason: e.to_string(),
                            }
                        }
                    };
                }
                Err(e) if e.is_rate_limit() => {
                    warn!(model = %model, error = %e, "Model rate limited, trying next in chain");
                    rate_limited = true;
                }
                Err(LlmError::ContentBlocked(reason)) => {
                    warn!(
                        model = %model,
                        reason = %reason,
                        "Model blocked response, trying next in chain"
                    );
                }
                Err(e) => {
                    warn!(model = %model, error = %e, "Model failed, aborting chain");
                    return ReasonerOutcome::HardFailure {
                        model,
                        message: e.to_string(),
                    };
                }
            }
        }

        match attempted.last() {
            None => ReasonerOutcome::HardFailure {
                model: String::new(),
                message: "No models configured".to_string(),
            },
            Some(_) if rate_limited => ReasonerOutcome::RateLimited { attempted },
            Some(last) => ReasonerOutcome::HardFailure {
                model: last.clone(),
                message: "All models blocked the response".to_string(),
            },
        }
    }
}
