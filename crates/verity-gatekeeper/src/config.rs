//! Deduplication configuration

use serde::{Deserialize, Serialize};

/// Which existing record to report when several exceed the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// The most similar record; ties go to the earliest created
    #[default]
    Best,
    /// The earliest created record at or above the threshold
    First,
}

/// Configuration for duplicate suppression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Similarity at or above which a candidate is a duplicate (0.0-1.0)
    pub threshold: f64,

    /// Which match to report
    pub policy: MatchPolicy,

    /// Also compare batch candidates against earlier candidates of the same batch
    pub dedupe_within_batch: bool,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            threshold: 0.85,
            policy: MatchPolicy::Best,
            dedupe_within_batch: false,
        }
    }
}

impl DedupConfig {
    /// Strict preset: intra-batch dedup on, lower threshold
    pub fn strict() -> Self {
        Self {
            threshold: 0.80,
            policy: MatchPolicy::Best,
            dedupe_within_batch: true,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(format!(
                "dedup threshold {} out of range [0.0, 1.0]",
                self.threshold
            ));
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
    fn test_defaults() {
        let config = DedupConfig::default();
        assert_eq!(config.threshold, 0.85);
        assert_eq!(config.policy, MatchPolicy::Best);
        assert!(!config.dedupe_within_batch);
        assert!(config.validate().is_ok());
        assert!(DedupConfig::strict().validate().is_ok());
    }

    #[test]
    fn test_threshold_range() {
        let config = DedupConfig {
            threshold: 1.2,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = DedupConfig {
            threshold: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml() {
        let config =
            DedupConfig::from_toml("policy = \"first\"\ndedupe_within_batch = true").unwrap();
        assert_eq!(config.policy, MatchPolicy::First);
        assert!(config.dedupe_within_batch);
        assert_eq!(config.threshold, 0.85);

        assert!(DedupConfig::from_toml("threshold = -0.1").is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = DedupConfig::strict();
        assert_eq!(DedupConfig::from_toml(&config.to_toml().unwrap()).unwrap(), config);
    }
}
