//! Provenance tracking

/// The originating source of a claim record
///
/// Scraped records name the publisher and article URL; AI-generated records
/// name the reasoning model as `reasoner:<model>` and carry no URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// Source name (e.g., "AltNews", "reasoner:gemini-2.0-flash")
    pub source: String,

    /// Article URL, when the source has one
    pub source_url: Option<String>,
}

impl Provenance {
    /// Create a provenance entry
    pub fn new(source: impl Into<String>, source_url: Option<String>) -> Self {
        Self {
            source: source.into(),
            source_url,
        }
    }

    /// Provenance for a result produced by a reasoning model
    pub fn reasoner(model: &str) -> Self {
        Self::new(format!("reasoner:{}", model), None)
    }

    /// Whether this provenance names a reasoning model
    pub fn is_reasoner(&self) -> bool {
        self.source.starts_with("reasoner:")
    }
}
