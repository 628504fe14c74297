//! Configuration management for the CLI.
//!
//! One TOML file, every section optional, followed by environment
//! overrides. The reasoner API key is only ever read from the environment.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use verity_gatekeeper::DedupConfig;
use verity_ingest::IngestConfig;
use verity_pipeline::PipelineConfig;
use verity_reasoner::ReasonerConfig;

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "verity.toml";

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VerityConfig {
    /// SQLite database path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,

    /// Decision pipeline thresholds
    pub pipeline: PipelineConfig,

    /// Deduplication settings
    pub dedup: DedupConfig,

    /// Reasoner model chain
    pub reasoner: ReasonerConfig,

    /// Ingestion settings
    pub ingest: IngestConfig,

    /// Output settings
    pub output: Settings,

    /// Reasoner API key, from the environment only
    #[serde(skip)]
    pub api_key: Option<String>,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Enable colored output
    pub color: bool,

    /// Default output format
    pub format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl VerityConfig {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, `verity.toml` in the
    /// working directory is read if present, otherwise defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(path) = lookup("VERITY_DATABASE") {
            self.database = Some(PathBuf::from(path));
        }
        if let Some(value) = lookup("VERITY_MATCH_THRESHOLD") {
            self.pipeline.match_threshold = parse_env("VERITY_MATCH_THRESHOLD", &value)?;
        }
        if let Some(value) = lookup("VERITY_GATE_THRESHOLD") {
            self.pipeline.gate_threshold = parse_env("VERITY_GATE_THRESHOLD", &value)?;
        }
        if let Some(value) = lookup("VERITY_LEARNING_THRESHOLD") {
            self.pipeline.learning_threshold = parse_env("VERITY_LEARNING_THRESHOLD", &value)?;
        }
        if let Some(value) = lookup("VERITY_REASONER_ENABLED") {
            self.pipeline.reasoner_enabled = parse_env("VERITY_REASONER_ENABLED", &value)?;
        }
        self.api_key = lookup(API_KEY_ENV).filter(|key| !key.trim().is_empty());

        self.validate()?;
        Ok(self)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate().map_err(CliError::Config)?;
        self.dedup.validate().map_err(CliError::Config)?;
        self.reasoner.validate().map_err(CliError::Config)?;
        self.ingest.validate().map_err(CliError::Config)?;
        Ok(())
    }

    /// Database path: configured, or `verity/verity.db` under the user data directory
    pub fn database_path(&self) -> PathBuf {
        match &self.database {
            Some(path) => path.clone(),
            None => dirs::data_dir()
                .map(|dir| dir.join("verity").join("verity.db"))
                .unwrap_or_else(|| PathBuf::from("verity.db")),
        }
    }

    /// Render the effective configuration (without the API key)
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("{} has invalid value '{}'", key, value)))
}
