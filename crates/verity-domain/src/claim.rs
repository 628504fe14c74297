//! Claim records - the unit stored in the fact-check corpus

use crate::provenance::Provenance;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Current timestamp in seconds since Unix epoch
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Unique identifier for a claim record based on UUIDv7
///
/// UUIDv7 provides:
/// - Chronological sortability, used as the secondary tiebreak after `created_at`
/// - 128-bit uniqueness without coordination between writers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClaimId(u128);

impl ClaimId {
    /// Generate a new UUIDv7-based ClaimId
    ///
    /// # Examples
    ///
    /// ```
    /// use verity_domain::ClaimId;
    ///
    /// let id = ClaimId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a ClaimId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a ClaimId from its UUID string form
    ///
    /// # Examples
    ///
    /// ```
    /// use verity_domain::ClaimId;
    ///
    /// let id = ClaimId::new();
    /// let parsed = ClaimId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid claim id '{}': {}", s, e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for ClaimId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Classification of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// The claim is accurate
    True,
    /// The claim is inaccurate
    False,
    /// The claim is partially true or framed to mislead
    Misleading,
    /// The claim could not be determined
    Unverified,
}

impl Verdict {
    /// All verdicts, in reporting order
    pub const ALL: [Verdict; 4] = [
        Verdict::False,
        Verdict::Misleading,
        Verdict::True,
        Verdict::Unverified,
    ];

    /// Canonical lowercase name, as stored and as requested from reasoners
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::True => "true",
            Verdict::False => "false",
            Verdict::Misleading => "misleading",
            Verdict::Unverified => "unverified",
        }
    }

    /// Parse a verdict name (case-insensitive, surrounding whitespace ignored)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(Verdict::True),
            "false" => Some(Verdict::False),
            "misleading" => Some(Verdict::Misleading),
            "unverified" => Some(Verdict::Unverified),
            _ => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a claim record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Ingested from a fact-check publisher
    Scraped,
    /// Promoted from a high-confidence reasoner result
    AiGenerated,
}

impl Origin {
    /// Canonical storage name
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Scraped => "scraped",
            Origin::AiGenerated => "ai-generated",
        }
    }

    /// Parse a storage name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scraped" => Some(Origin::Scraped),
            "ai-generated" => Some(Origin::AiGenerated),
            _ => None,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fact-check in the corpus
///
/// Records are immutable once created: nothing in the system updates or
/// deletes them, new knowledge is always appended as a new record.
///
/// An `AiGenerated` record always carries a confidence score; a `Scraped`
/// record never does. Use [`ClaimRecord::scraped`] and
/// [`ClaimRecord::ai_generated`] to build records that satisfy this.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimRecord {
    /// Unique identifier
    pub id: ClaimId,

    /// The claim text as published or as asked
    pub claim: String,

    /// Verdict attached to the claim
    pub verdict: Verdict,

    /// Human-readable explanation of the verdict
    pub explanation: String,

    /// Who produced the fact-check
    pub provenance: Provenance,

    /// Embedding of the claim text
    pub embedding: Vec<f32>,

    /// Reasoner confidence, present only for AI-generated records
    pub confidence: Option<f64>,

    /// Scraped or AI-generated
    pub origin: Origin,

    /// Language tag (e.g. "en", "ta")
    pub language: String,

    /// Red flags reported alongside the verdict
    pub red_flags: Vec<String>,

    /// When this record was created (seconds since Unix epoch)
    pub created_at: u64,

    /// Text the natural key is derived from, when it differs from `claim`
    ///
    /// Set for learned records whose stored claim is a truncated query, so
    /// that two long queries sharing a prefix still get distinct keys. Not
    /// persisted: records read back from a store leave it empty.
    pub key_text: Option<String>,
}

impl ClaimRecord {
    /// Build a scraped record (no confidence score)
    pub fn scraped(
        claim: impl Into<String>,
        verdict: Verdict,
        provenance: Provenance,
        language: impl Into<String>,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            id: ClaimId::new(),
            claim: claim.into(),
            verdict,
            explanation: String::new(),
            provenance,
            embedding,
            confidence: None,
            origin: Origin::Scraped,
            language: language.into(),
            red_flags: Vec::new(),
            created_at: current_timestamp(),
            key_text: None,
        }
    }

    /// Build an AI-generated record carrying the confidence it was learned with
    pub fn ai_generated(
        claim: impl Into<String>,
        verdict: Verdict,
        confidence: f64,
        provenance: Provenance,
        language: impl Into<String>,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            id: ClaimId::new(),
            claim: claim.into(),
            verdict,
            explanation: String::new(),
            provenance,
            embedding,
            confidence: Some(confidence),
            origin: Origin::AiGenerated,
            language: language.into(),
            red_flags: Vec::new(),
            created_at: current_timestamp(),
            key_text: None,
        }
    }

    /// Attach an explanation
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    /// Attach red flags
    pub fn with_red_flags(mut self, red_flags: Vec<String>) -> Self {
        self.red_flags = red_flags;
        self
    }

    /// Derive the natural key from `text` instead of the stored claim
    pub fn with_key_text(mut self, text: impl Into<String>) -> Self {
        self.key_text = Some(text.into());
        self
    }

    /// Text the natural key is derived from
    pub fn key_text(&self) -> &str {
        self.key_text.as_deref().unwrap_or(&self.claim)
    }

    /// Override the creation timestamp (ingestion replays, tests)
    pub fn with_created_at(mut self, created_at: u64) -> Self {
        self.created_at = created_at;
        self
    }

    /// Check the origin/confidence invariant and basic field sanity
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.claim.trim().is_empty() {
            return Err("claim text is empty".to_string());
        }
        if self.embedding.is_empty() {
            return Err("embedding is empty".to_string());
        }
        match (self.origin, self.confidence) {
            (Origin::AiGenerated, None) => {
                Err("ai-generated record must carry a confidence score".to_string())
            }
            (Origin::Scraped, Some(_)) => {
                Err("scraped record must not carry a confidence score".to_string())
            }
            (Origin::AiGenerated, Some(c)) if !(0.0..=1.0).contains(&c) => {
                Err(format!("confidence {} out of range [0.0, 1.0]", c))
            }
            _ => Ok(()),
        }
    }

    /// Ordering key used everywhere creation order matters
    pub fn creation_order(&self) -> (u64, ClaimId) {
        (self.created_at, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provenance() -> Provenance {
        Provenance::new("AltNews", Some("https://altnews.in/x".to_string()))
    }

    #[test]
    fn test_claim_id_ordering() {
        let id1 = ClaimId::from_value(1000);
        let id2 = ClaimId::from_value(2000);
        assert!(id1 < id2);
    }

    #[test]
    fn test_claim_id_display_and_parse() {
        let id = ClaimId::new();
        let id_str = id.to_string();
        assert_eq!(id_str.len(), 36);
        assert_eq!(ClaimId::from_string(&id_str).unwrap(), id);
        assert!(ClaimId::from_string("not-a-uuid").is_err());
    }

    #[test]
    fn test_verdict_parse() {
        assert_eq!(Verdict::parse("FALSE"), Some(Verdict::False));
        assert_eq!(Verdict::parse(" misleading "), Some(Verdict::Misleading));
        assert_eq!(Verdict::parse("authentic"), None);
        for v in Verdict::ALL {
            assert_eq!(Verdict::parse(v.as_str()), Some(v));
        }
    }

    #[test]
    fn test_scraped_record_has_no_confidence() {
        let record = ClaimRecord::scraped("claim", Verdict::False, provenance(), "en", vec![1.0]);
        assert_eq!(record.origin, Origin::Scraped);
        assert!(record.confidence.is_none());
        assert!(record.check_invariants().is_ok());
    }

    #[test]
    fn test_ai_generated_record_carries_confidence() {
        let record = ClaimRecord::ai_generated(
            "claim",
            Verdict::True,
            0.95,
            Provenance::reasoner("gemini-2.0-flash"),
            "en",
            vec![1.0],
        );
        assert_eq!(record.confidence, Some(0.95));
        assert!(record.check_invariants().is_ok());
    }

    #[test]
    fn test_invariant_violations() {
        let mut record =
            ClaimRecord::scraped("claim", Verdict::False, provenance(), "en", vec![1.0]);
        record.origin = Origin::AiGenerated;
        assert!(record.check_invariants().unwrap_err().contains("confidence"));

        let mut record =
            ClaimRecord::scraped("claim", Verdict::False, provenance(), "en", vec![1.0]);
        record.confidence = Some(0.5);
        assert!(record.check_invariants().is_err());

        let record = ClaimRecord::scraped("   ", Verdict::False, provenance(), "en", vec![1.0]);
        assert!(record.check_invariants().is_err());

        let record = ClaimRecord::scraped("claim", Verdict::False, provenance(), "en", vec![]);
        assert!(record.check_invariants().is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: UUIDv7 ordering matches u128 ordering
        #[test]
        fn test_id_ordering_property(a: u128, b: u128) {
            let id_a = ClaimId::from_value(a);
            let id_b = ClaimId::from_value(b);
            prop_assert_eq!(id_a < id_b, a < b);
            prop_assert_eq!(id_a == id_b, a == b);
        }

        /// Property: string round-trip preserves the id
        #[test]
        fn test_id_string_roundtrip(value: u128) {
            let id = ClaimId::from_value(value);
            match ClaimId::from_string(&id.to_string()) {
                Ok(parsed) => prop_assert_eq!(id, parsed),
                Err(e) => return Err(TestCaseError::fail(e)),
            }
        }

        /// Property: any in-range confidence satisfies the AI-generated invariant
        #[test]
        fn test_ai_confidence_in_range(c in 0.0f64..=1.0) {
            let record = ClaimRecord::ai_generated(
                "claim", Verdict::True, c, Provenance::reasoner("m"), "en", vec![1.0],
            );
            prop_assert!(record.check_invariants().is_ok());
        }
    }
}
