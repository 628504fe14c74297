//! Transient results: similarity matches, pipeline decisions, dedup outcomes

use crate::claim::{ClaimId, ClaimRecord, Verdict};
use crate::provenance::Provenance;
use crate::reasoning::ReasonedVerdict;
use crate::reputation::UnreliableDomain;
use std::fmt;

/// A corpus record paired with its similarity to a query embedding
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// The matched record
    pub record: ClaimRecord,

    /// Cosine similarity clamped to [0, 1]
    pub similarity: f64,
}

/// Which tier of the decision pipeline produced a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionTier {
    /// Answered from a sufficiently similar corpus record
    IndexedMatch,
    /// Answered from the publisher's listing as an unreliable source
    SourceReputation,
    /// Answered by the external reasoner above the confidence gate
    ReasonerFallback,
    /// No answer could be given
    Abstained,
}

impl ResolutionTier {
    /// Canonical name used in logs and the query audit table
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionTier::IndexedMatch => "indexed-match",
            ResolutionTier::SourceReputation => "source-reputation",
            ResolutionTier::ReasonerFallback => "reasoner-fallback",
            ResolutionTier::Abstained => "abstained",
        }
    }
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the pipeline abstained
#[derive(Debug, Clone, PartialEq)]
pub enum AbstainReason {
    /// Query text was empty or whitespace only
    EmptyQuery,

    /// No corpus match and no reasoner available
    NoMatch,

    /// Text had no letters or digits to search on, and no reasoner was available
    NoSearchableTerms,

    /// The reasoner answered below the confidence gate
    LowConfidence {
        /// Model that answered
        model_used: String,
        /// Confidence it reported
        confidence: f64,
    },

    /// The reasoner answered with something that could not be parsed
    MalformedReasonerOutput {
        /// Model that answered
        model_used: String,
        /// Raw response text, kept for diagnostics
        raw_payload: String,
        /// Parser error
        error: String,
    },
}

/// How a decision was reached; each variant carries only the fields valid for it
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Matched a corpus record
    IndexedMatch {
        /// Matched record
        record_id: ClaimId,
        /// Similarity of the match
        similarity: f64,
    },

    /// The claim came from a listed unreliable domain
    SourceReputation {
        /// Listed domain that covered the source URL
        domain: String,
        /// Category of the listing
        category: String,
    },

    /// Answered by the reasoner
    ReasonerFallback {
        /// Model that produced the answer
        model_used: String,
        /// Red flags reported by the model
        red_flags: Vec<String>,
    },

    /// No answer
    Abstained(AbstainReason),
}

/// The pipeline's answer to a single query
///
/// Once returned to a caller a decision is final; learning writeback and
/// query logging never alter it.
#[derive(Debug, Clone, PartialEq)]
pub struct VerdictDecision {
    /// Verdict presented to the user
    pub verdict: Verdict,

    /// Similarity score for indexed matches, reasoner confidence for
    /// reasoner answers, 0 when abstaining
    pub confidence: f64,

    /// Explanation text
    pub explanation: String,

    /// Source of the answer, if any
    pub provenance: Option<Provenance>,

    /// Tier-specific details
    pub resolution: Resolution,
}

impl VerdictDecision {
    /// Decision taken from a corpus match
    pub fn indexed_match(matched: &MatchResult) -> Self {
        Self {
            verdict: matched.record.verdict,
            confidence: matched.similarity,
            explanation: matched.record.explanation.clone(),
            provenance: Some(matched.record.provenance.clone()),
            resolution: Resolution::IndexedMatch {
                record_id: matched.record.id,
                similarity: matched.similarity,
            },
        }
    }

    /// Decision taken from a reasoner answer that passed the confidence gate
    pub fn reasoned(result: &ReasonedVerdict) -> Self {
        Self {
            verdict: result.verdict,
            confidence: result.confidence,
            explanation: result.explanation.clone(),
            provenance: Some(Provenance::reasoner(&result.model_used)),
            resolution: Resolution::ReasonerFallback {
                model_used: result.model_used.clone(),
                red_flags: result.red_flags.clone(),
            },
        }
    }

    /// Decision for a claim published on a listed unreliable domain
    ///
    /// The verdict is `false`, as the listing itself is the evidence.
    pub fn unreliable_source(
        source_url: &str,
        listed: &UnreliableDomain,
        confidence: f64,
    ) -> Self {
        let explanation = if listed.reason.trim().is_empty() {
            format!(
                "Published by {}, a source listed as unreliable ({}).",
                listed.domain, listed.category
            )
        } else {
            listed.reason.clone()
        };
        Self {
            verdict: Verdict::False,
            confidence,
            explanation,
            provenance: Some(Provenance::new(
                "source-reputation",
                Some(source_url.to_string()),
            )),
            resolution: Resolution::SourceReputation {
                domain: listed.domain.clone(),
                category: listed.category.clone(),
            },
        }
    }

    /// Abstention: verdict `unverified`, confidence 0
    pub fn abstained(reason: AbstainReason) -> Self {
        let explanation = match &reason {
            AbstainReason::EmptyQuery => "No claim text was provided.".to_string(),
            AbstainReason::NoMatch => "No matching fact-check was found.".to_string(),
            AbstainReason::NoSearchableTerms => {
                "The claim has no words to search for.".to_string()
            }
            AbstainReason::LowConfidence { confidence, .. } => format!(
                "Automated analysis was inconclusive (confidence {:.2}).",
                confidence
            ),
            AbstainReason::MalformedReasonerOutput { .. } => {
                "Could not analyze claim due to a malformed AI response.".to_string()
            }
        };
        Self {
            verdict: Verdict::Unverified,
            confidence: 0.0,
            explanation,
            provenance: None,
            resolution: Resolution::Abstained(reason),
        }
    }

    /// Tier that produced this decision
    pub fn tier(&self) -> ResolutionTier {
        match self.resolution {
            Resolution::IndexedMatch { .. } => ResolutionTier::IndexedMatch,
            Resolution::SourceReputation { .. } => ResolutionTier::SourceReputation,
            Resolution::ReasonerFallback { .. } => ResolutionTier::ReasonerFallback,
            Resolution::Abstained(_) => ResolutionTier::Abstained,
        }
    }

    /// Id of the matched corpus record, for indexed matches
    pub fn matched_record_id(&self) -> Option<ClaimId> {
        match self.resolution {
            Resolution::IndexedMatch { record_id, .. } => Some(record_id),
            _ => None,
        }
    }
}

/// Result of a duplicate check against the corpus
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DedupOutcome {
    /// No existing record is similar enough; the candidate is admissible
    Unique,

    /// The candidate duplicates an existing record
    DuplicateOf {
        /// Existing record
        id: ClaimId,
        /// Similarity between candidate and existing record
        similarity: f64,
    },
}

impl DedupOutcome {
    /// Whether the candidate was judged a duplicate
    pub fn is_duplicate(&self) -> bool {
        matches!(self, DedupOutcome::DuplicateOf { .. })
    }
}
