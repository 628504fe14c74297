//! Configuration for the decision pipeline

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Thresholds and limits for the decision pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Minimum similarity for an indexed match (inclusive)
    pub match_threshold: f64,

    /// Minimum reasoner confidence for a reasoner answer (inclusive)
    pub gate_threshold: f64,

    /// Minimum reasoner confidence for learning writeback (inclusive)
    pub learning_threshold: f64,

    /// Language always searched in addition to the detected one
    pub default_language: String,

    /// Whether to fall back to the reasoner at all
    pub reasoner_enabled: bool,

    /// Overall budget for one reasoner call, across all models (seconds)
    pub reasoner_timeout_secs: u64,

    /// Longest claim text stored by writeback and the query log (characters)
    pub max_stored_claim_chars: usize,

    /// Confidence reported when a claim is rejected for its unreliable source
    pub unreliable_source_confidence: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            match_threshold: 0.75,
            gate_threshold: 0.6,
            learning_threshold: 0.9,
            default_language: "en".to_string(),
            reasoner_enabled: true,
            reasoner_timeout_secs: 60,
            max_stored_claim_chars: 500,
            unreliable_source_confidence: 0.9,
        }
    }
}

impl PipelineConfig {
    /// Offline preset: corpus only, no reasoner calls
    pub fn offline() -> Self {
        Self {
            reasoner_enabled: false,
            ..Self::default()
        }
    }

    /// Reasoner timeout as a Duration
    pub fn reasoner_timeout(&self) -> Duration {
        Duration::from_secs(self.reasoner_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("match_threshold", self.match_threshold),
            ("gate_threshold", self.gate_threshold),
            ("learning_threshold", self.learning_threshold),
            ("unreliable_source_confidence", self.unreliable_source_confidence),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(format!("{} {} out of range [0.0, 1.0]", name, value));
            }
        }
        if self.learning_threshold < self.gate_threshold {
            return Err("learning_threshold cannot be below gate_threshold".to_string());
        }
        if self.default_language.trim().is_empty() {
            return Err("default_language must not be empty".to_string());
        }
        if self.reasoner_timeout_secs == 0 {
            return Err("reasoner_timeout_secs must be greater than 0".to_string());
        }
        if self.max_stored_claim_chars == 0 {
            return Err("max_stored_claim_chars must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
