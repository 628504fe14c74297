//! Configuration for the reasoner

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Gemini REST endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// One model in the fallback chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Model identifier sent to the provider
    pub name: String,

    /// Lower values are tried first
    pub priority: u32,
}

impl ModelSpec {
    /// Create a model entry
    pub fn new(name: impl Into<String>, priority: u32) -> Self {
        Self {
            name: name.into(),
            priority,
        }
    }
}

/// Configuration for the reasoner model chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasonerConfig {
    /// API endpoint
    pub endpoint: String,

    /// Models to try, ordered by `priority`
    pub models: Vec<ModelSpec>,

    /// Per-call HTTP timeout (seconds)
    pub request_timeout_secs: u64,

    /// Sampling temperature
    pub temperature: f32,

    /// Nucleus sampling cutoff
    pub top_p: f32,

    /// Top-k sampling cutoff
    pub top_k: u32,

    /// Maximum tokens in a response
    pub max_output_tokens: u32,
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            models: vec![
                ModelSpec::new("gemini-2.5-pro", 0),
                ModelSpec::new("gemini-2.0-flash", 1),
            ],
            request_timeout_secs: 30,
            temperature: 0.2,
            top_p: 0.8,
            top_k: 40,
            max_output_tokens: 1024,
        }
    }
}

impl ReasonerConfig {
    /// Per-call timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Models in the order they should be tried
    ///
    /// Sorted by priority; equal priorities keep their configured order.
    pub fn ordered_models(&self) -> Vec<ModelSpec> {
        let mut models = self.models.clone();
        models.sort_by_key(|m| m.priority);
        models
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.trim().is_empty() {
            return Err("endpoint must not be empty".to_string());
        }
        if self.models.is_empty() {
            return Err("at least one model must be configured".to_string());
        }
        if self.models.iter().any(|m| m.name.trim().is_empty()) {
            return Err("model names must not be empty".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} out of range [0.0, 2.0]", self.temperature));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(format!("top_p {} out of range [0.0, 1.0]", self.top_p));
        }
        if self.max_output_tokens == 0 {
            return Err("max_output_tokens must be greater than 0".to_string());
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = ReasonerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_models_ordered_by_priority() {
        let config = ReasonerConfig {
            models: vec![
                ModelSpec::new("slow", 5),
                ModelSpec::new("fast", 1),
                ModelSpec::new("backup", 5),
            ],
            ..Default::default()
        };
        let names: Vec<_> = config.ordered_models().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["fast", "slow", "backup"]);
    }

    #[test]
    fn test_invalid_configs() {
        let config = ReasonerConfig {
            models: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ReasonerConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ReasonerConfig {
            top_p: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ReasonerConfig::default();
        let toml = config.to_toml().unwrap();
        assert_eq!(ReasonerConfig::from_toml(&toml).unwrap(), config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ReasonerConfig::from_toml(
            r#"
            [[models]]
            name = "gemini-2.0-flash"
            priority = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.models.len(), 1);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.max_output_tokens, 1024);
    }
}
