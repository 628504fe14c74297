//! Claim sources
//!
//! A source yields raw scraped fact-checks. Scraping itself happens
//! elsewhere; sources here read whatever the scrapers produced.

use crate::error::IngestError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// A fact-check as delivered by a scraper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedClaim {
    /// Claim text
    pub claim: String,

    /// Verdict name: true, false, misleading or unverified
    pub verdict: String,

    /// Explanation from the fact-checker
    #[serde(default)]
    pub explanation: String,

    /// Article the fact-check was taken from
    #[serde(default)]
    pub source_url: Option<String>,

    /// Language tag; detected from the claim text when absent
    #[serde(default)]
    pub language: Option<String>,
}

impl ScrapedClaim {
    /// Create a scraped claim with no explanation, URL or language
    pub fn new(claim: impl Into<String>, verdict: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
            verdict: verdict.into(),
            explanation: String::new(),
            source_url: None,
            language: None,
        }
    }

    /// Set the article URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    /// Set the explanation
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }
}

/// A named provider of scraped claims
pub trait ClaimSource: Send + Sync {
    /// Name recorded as provenance and in the run log
    fn name(&self) -> &str;

    /// Fetch the current batch
    fn fetch(&self) -> Result<Vec<ScrapedClaim>, IngestError>;
}

/// Reads a JSON array of [`ScrapedClaim`] from a file on every fetch
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    name: String,
    path: PathBuf,
}

impl JsonFileSource {
    /// Create a source reading `path`
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

impl ClaimSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<Vec<ScrapedClaim>, IngestError> {
        let content = std::fs::read_to_string(&self.path)?;
        let claims: Vec<ScrapedClaim> = serde_json::from_str(&content)?;
        debug!(
            source = %self.name,
            path = %self.path.display(),
            count = claims.len(),
            "Read source file"
        );
        Ok(claims)
    }
}
