//! Configuration for ingestion runs and the periodic worker

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for ingestion
///
/// # Examples
///
/// ```
/// use verity_ingest::IngestConfig;
///
/// let config = IngestConfig::from_toml("interval_minutes = 60").unwrap();
/// assert_eq!(config.interval_minutes, 60);
/// assert!(config.skip_known_urls);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// How often the worker ingests every source (minutes)
    pub interval_minutes: u64,

    /// Pause between consecutive sources within one cycle (seconds)
    pub pause_between_sources_secs: u64,

    /// Skip entries whose source URL is already in the corpus
    pub skip_known_urls: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 360,
            pause_between_sources_secs: 2,
            skip_known_urls: true,
        }
    }
}

impl IngestConfig {
    /// Interval between worker cycles
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes * 60)
    }

    /// Pause between sources
    pub fn pause_between_sources(&self) -> Duration {
        Duration::from_secs(self.pause_between_sources_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.interval_minutes == 0 {
            return Err("interval_minutes must be greater than 0".to_string());
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
