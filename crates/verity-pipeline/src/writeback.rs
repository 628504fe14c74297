//! Learning writeback
//!
//! Persists high-confidence reasoner answers so the next similar query is
//! answered from the corpus. Writeback is best-effort: every failure is
//! logged and reported as [`WritebackStatus::Failed`], never propagated.

use std::sync::Mutex;
use tracing::{debug, info, warn};
use verity_domain::traits::{ClaimStore, InsertOutcome};
use verity_domain::{ClaimId, ClaimRecord, DedupOutcome, Provenance, ReasonedVerdict, Verdict};
use verity_gatekeeper::Deduplicator;

/// What happened to a reasoner answer after the decision was made
#[derive(Debug, Clone, PartialEq)]
pub enum WritebackStatus {
    /// The answer was not eligible for learning
    NotAttempted,

    /// A new AI-generated record was appended
    Persisted(ClaimId),

    /// An equivalent record already exists
    SkippedDuplicate {
        /// Existing record
        of: ClaimId,
        /// Similarity to it
        similarity: f64,
    },

    /// Writeback failed; the decision is unaffected
    Failed(String),
}

/// Gate and writer for learned records
#[derive(Debug, Clone)]
pub struct LearningWriteback {
    dedup: Deduplicator,
    learning_threshold: f64,
    max_chars: usize,
}

impl LearningWriteback {
    /// Create a writeback stage
    pub fn new(dedup: Deduplicator, learning_threshold: f64, max_chars: usize) -> Self {
        Self {
            dedup,
            learning_threshold,
            max_chars,
        }
    }

    /// Whether an answer qualifies for persistence
    ///
    /// The threshold is inclusive. `unverified` answers are never learned.
    pub fn is_eligible(&self, verdict: &ReasonedVerdict) -> bool {
        verdict.confidence >= self.learning_threshold && verdict.verdict != Verdict::Unverified
    }

    /// Persist an eligible answer
    ///
    /// The duplicate check and the insert run under one lock acquisition, so
    /// two concurrent writebacks for the same claim in this process cannot
    /// both append. Across processes the store's unique claim key decides.
    pub fn persist<S>(
        &self,
        store: &Mutex<S>,
        claim: &str,
        language: &str,
        embedding: Vec<f32>,
        verdict: &ReasonedVerdict,
    ) -> WritebackStatus
    where
        S: ClaimStore,
        S::Error: std::fmt::Display,
    {
        if !self.is_eligible(verdict) {
            debug!(confidence = verdict.confidence, "Answer not eligible for learning");
            return WritebackStatus::NotAttempted;
        }

        match self.try_persist(store, claim, language, embedding, verdict) {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "Learning writeback failed");
                WritebackStatus::Failed(e)
            }
        }
    }

    fn try_persist<S>(
        &self,
        store: &Mutex<S>,
        claim: &str,
        language: &str,
        embedding: Vec<f32>,
        verdict: &ReasonedVerdict,
    ) -> Result<WritebackStatus, String>
    where
        S: ClaimStore,
        S::Error: std::fmt::Display,
    {
        let mut store = store
            .lock()
            .map_err(|_| "store lock poisoned".to_string())?;

        let corpus = store.all().map_err(|e| e.to_string())?;
        if let DedupOutcome::DuplicateOf { id, similarity } =
            self.dedup.check_duplicate(&embedding, &corpus)
        {
            info!(existing_id = %id, similarity, "Skipping writeback, near-duplicate exists");
            return Ok(WritebackStatus::SkippedDuplicate { of: id, similarity });
        }

        let stored: String = claim.chars().take(self.max_chars).collect();
        let mut record = ClaimRecord::ai_generated(
            stored,
            verdict.verdict,
            verdict.confidence,
            Provenance::reasoner(&verdict.model_used),
            language,
            embedding,
        )
        .with_explanation(verdict.explanation.clone())
        .with_red_flags(verdict.red_flags.clone());
        if record.claim.len() < claim.len() {
            record = record.with_key_text(claim);
        }

        match store.insert(record).map_err(|e| e.to_string())? {
            InsertOutcome::Inserted(id) => {
                info!(id = %id, model = %verdict.model_used, "Learned new claim");
                Ok(WritebackStatus::Persisted(id))
            }
            InsertOutcome::DuplicateKey(id) => {
                info!(existing_id = %id, "Skipping writeback, claim text already stored");
                Ok(WritebackStatus::SkippedDuplicate { of: id, similarity: 1.0 })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_domain::traits::ClaimStore;
    use verity_gatekeeper::DedupConfig;
    use verity_store::SqliteStore;

    fn answer(verdict: Verdict, confidence: f64) -> ReasonedVerdict {
        ReasonedVerdict {
            verdict,
            confidence,
            explanation: "No such scheme exists".to_string(),
            red_flags: vec!["urgency".to_string()],
            model_used: "gemini-2.0-flash".to_string(),
        }
    }

    fn writeback() -> LearningWriteback {
        LearningWriteback::new(Deduplicator::new(DedupConfig::default()).unwrap(), 0.9, 10)
    }

    #[test]
    fn test_eligibility() {
        let wb = writeback();
        assert!(wb.is_eligible(&answer(Verdict::False, 0.9)));
        assert!(!wb.is_eligible(&answer(Verdict::False, 0.89)));
        assert!(!wb.is_eligible(&answer(Verdict::Unverified, 0.99)));
    }

    #[test]
    fn test_persist_truncates_and_tags() {
        let store = Mutex::new(SqliteStore::in_memory().unwrap());
        let status = writeback().persist(
            &store,
            "Government gives free laptops",
            "en",
            vec![1.0, 0.0],
            &answer(Verdict::False, 0.95),
        );

        let id = match status {
            WritebackStatus::Persisted(id) => id,
            other => panic!("expected persisted, got {:?}", other),
        };
        let record = store.lock().unwrap().get(id).unwrap().unwrap();
        assert_eq!(record.claim, "Government");
        assert_eq!(record.confidence, Some(0.95));
        assert_eq!(record.provenance.source, "reasoner:gemini-2.0-flash");
        assert_eq!(record.red_flags, vec!["urgency".to_string()]);
    }

    #[test]
    fn test_truncated_claims_keyed_on_full_text() {
        let store = Mutex::new(SqliteStore::in_memory().unwrap());
        let wb = writeback();
        let first = wb.persist(
            &store,
            "Government gives free laptops to students",
            "en",
            vec![1.0, 0.0],
            &answer(Verdict::False, 0.95),
        );
        let second = wb.persist(
            &store,
            "Government gives free bicycles to farmers",
            "en",
            vec![0.0, 1.0],
            &answer(Verdict::False, 0.95),
        );

        assert!(matches!(first, WritebackStatus::Persisted(_)));
        assert!(matches!(second, WritebackStatus::Persisted(_)));
        let store = store.lock().unwrap();
        assert_eq!(store.count().unwrap(), 2);
        assert!(store.all().unwrap().iter().all(|r| r.claim == "Government"));
    }

    #[test]
    fn test_persist_skips_near_duplicate() {
        let store = Mutex::new(SqliteStore::in_memory().unwrap());
        let wb = writeback();
        wb.persist(
            &store,
            "first claim",
            "en",
            vec![1.0, 0.0],
            &answer(Verdict::False, 0.95),
        );
        let second = wb.persist(
            &store,
            "other wording",
            "en",
            vec![0.99, 0.1],
            &answer(Verdict::False, 0.95),
        );

        assert!(matches!(second, WritebackStatus::SkippedDuplicate { .. }));
        assert_eq!(store.lock().unwrap().count().unwrap(), 1);
    }

    #[test]
    fn test_ineligible_is_not_attempted() {
        let store = Mutex::new(SqliteStore::in_memory().unwrap());
        let status =
            writeback().persist(&store, "claim", "en", vec![1.0], &answer(Verdict::True, 0.7));
        assert_eq!(status, WritebackStatus::NotAttempted);
        assert_eq!(store.lock().unwrap().count().unwrap(), 0);
    }
}
