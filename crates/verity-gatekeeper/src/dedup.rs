//! Deduplication engine
//!
//! Uses its own threshold, stricter than the answer-matching threshold of
//! the decision pipeline: a false duplicate silently drops a distinct claim.

use crate::config::{DedupConfig, MatchPolicy};
use crate::error::GatekeeperError;
use tracing::debug;
use verity_domain::traits::{ClaimStore, Embedder};
use verity_domain::{ClaimId, ClaimRecord, DedupOutcome};
use verity_store::{cosine_similarity, nearest_matches};

/// A batch candidate rejected as a duplicate
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateReport {
    /// The rejected candidate
    pub candidate: ClaimRecord,
    /// The record it duplicates (corpus record, or an earlier batch candidate)
    pub existing_id: ClaimId,
    /// Similarity between the two
    pub similarity: f64,
}

/// Result of filtering a batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterReport {
    /// Candidates admissible to the corpus, in input order
    pub unique: Vec<ClaimRecord>,
    /// Candidates rejected as duplicates
    pub duplicates: Vec<DuplicateReport>,
    /// Candidates rejected for violating record invariants
    pub invalid: Vec<(ClaimRecord, String)>,
}

/// Duplicate detection over corpus snapshots
#[derive(Debug, Clone, Default)]
pub struct Deduplicator {
    config: DedupConfig,
}

impl Deduplicator {
    /// Create a deduplicator with the given configuration
    pub fn new(config: DedupConfig) -> Result<Self, GatekeeperError> {
        config.validate().map_err(GatekeeperError::Config)?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    /// Check an embedded candidate against `corpus`
    ///
    /// Pure over its inputs: the same candidate against an unchanged corpus
    /// always yields the same outcome.
    pub fn check_duplicate(&self, embedding: &[f32], corpus: &[ClaimRecord]) -> DedupOutcome {
        let hit = match self.config.policy {
            MatchPolicy::Best => nearest_matches(embedding, corpus, 1)
                .into_iter()
                .next()
                .filter(|m| m.similarity >= self.config.threshold)
                .map(|m| (m.record.id, m.similarity)),
            MatchPolicy::First => self.first_match(embedding, corpus.iter()),
        };

        match hit {
            Some((id, similarity)) => {
                debug!(existing_id = %id, similarity, "Duplicate found");
                DedupOutcome::DuplicateOf { id, similarity }
            }
            None => DedupOutcome::Unique,
        }
    }

    /// Embed `text` and check it against `corpus`
    pub fn check_text<E>(
        &self,
        text: &str,
        language: Option<&str>,
        embedder: &E,
        corpus: &[ClaimRecord],
    ) -> Result<DedupOutcome, GatekeeperError>
    where
        E: Embedder,
        E::Error: std::fmt::Display,
    {
        let embedding = embedder
            .embed(text, language)
            .map_err(|e| GatekeeperError::Embedding(e.to_string()))?;
        Ok(self.check_duplicate(&embedding, corpus))
    }

    /// Check a candidate against the full contents of a store
    pub fn check_against_store<S>(
        &self,
        embedding: &[f32],
        store: &S,
    ) -> Result<DedupOutcome, GatekeeperError>
    where
        S: ClaimStore,
        S::Error: std::fmt::Display,
    {
        let corpus = store
            .all()
            .map_err(|e| GatekeeperError::Store(e.to_string()))?;
        Ok(self.check_duplicate(embedding, &corpus))
    }

    /// Split a batch into admissible candidates and duplicates
    ///
    /// Candidates are compared against the pre-existing corpus. When
    /// `dedupe_within_batch` is set, each candidate is also compared against
    /// the candidates admitted before it in the same batch.
    pub fn filter_unique(
        &self,
        candidates: Vec<ClaimRecord>,
        corpus: &[ClaimRecord],
    ) -> FilterReport {
        let mut report = FilterReport::default();

        for candidate in candidates {
            if let Err(reason) = candidate.check_invariants() {
                debug!(claim = %candidate.claim, reason = %reason, "Rejecting invalid candidate");
                report.invalid.push((candidate, reason));
                continue;
            }

            let mut outcome = self.check_duplicate(&candidate.embedding, corpus);
            if !outcome.is_duplicate() && self.config.dedupe_within_batch {
                outcome = self.check_duplicate(&candidate.embedding, &report.unique);
            }

            match outcome {
                DedupOutcome::Unique => report.unique.push(candidate),
                DedupOutcome::DuplicateOf { id, similarity } => {
                    report.duplicates.push(DuplicateReport {
                        candidate,
                        existing_id: id,
                        similarity,
                    })
                }
            }
        }

        report
    }

    fn first_match<'a>(
        &self,
        embedding: &[f32],
        corpus: impl Iterator<Item = &'a ClaimRecord>,
    ) -> Option<(ClaimId, f64)> {
        let mut ordered: Vec<&ClaimRecord> = corpus.collect();
        ordered.sort_by_key(|r| r.creation_order());

        ordered.into_iter().find_map(|record| {
            let similarity = cosine_similarity(embedding, &record.embedding)?;
            if !similarity.is_finite() {
                return None;
            }
            let similarity = similarity.clamp(0.0, 1.0);
            (similarity >= self.config.threshold).then_some((record.id, similarity))
        })
    }
}
