//! Decision pipeline
//!
//! Orchestrates one query through the resolution tiers:
//!
//! 1. Indexed match against the corpus (detected language plus default)
//! 2. Source reputation, when the claim's source URL is on the
//!    unreliable-domain list
//! 3. Reasoner fallback, gated on confidence
//! 4. Abstention
//!
//! Text with no letters or digits skips the corpus and goes straight to
//! the reasoner.
//!
//! The decision is fixed before writeback or query logging run, and neither
//! can change it.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::language::ScriptLanguageDetector;
use crate::source::{check_source, SourceCheck};
use crate::writeback::{LearningWriteback, WritebackStatus};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};
use verity_domain::traits::{
    ClaimStore, Embedder, LanguageDetector, QueryLog, Reasoner, SourceReputation,
};
use verity_domain::{
    AbstainReason, QueryLogEntry, ReasonedVerdict, ReasonerOutcome, ReasoningContext,
    ReasoningRequest, VerdictDecision,
};
use verity_gatekeeper::{DedupConfig, Deduplicator};
use verity_store::best_match;

/// Result of verifying one claim
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    /// The decision presented to the user
    pub decision: VerdictDecision,
    /// Detected language of the query
    pub language: String,
    /// What happened to the reasoner answer after the decision
    pub writeback: WritebackStatus,
    /// Result of checking the source URL, when one was given
    pub source: Option<SourceCheck>,
    /// Wall-clock time spent on the query
    pub latency: Duration,
}

/// Resolves claims against the corpus, falling back to a reasoner
pub struct DecisionPipeline<S, E> {
    store: Arc<Mutex<S>>,
    embedder: Arc<E>,
    reasoner: Option<Arc<dyn Reasoner>>,
    detector: Arc<dyn LanguageDetector>,
    writeback: LearningWriteback,
    config: PipelineConfig,
}

impl<S, E> DecisionPipeline<S, E>
where
    S: ClaimStore + QueryLog + SourceReputation,
    <S as ClaimStore>::Error: std::fmt::Display,
    <S as QueryLog>::Error: std::fmt::Display,
    <S as SourceReputation>::Error: std::fmt::Display,
    E: Embedder,
    E::Error: std::fmt::Display,
{
    /// Create a pipeline without a reasoner
    pub fn new(
        store: Arc<Mutex<S>>,
        embedder: E,
        config: PipelineConfig,
        dedup: DedupConfig,
    ) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;
        let dedup = Deduplicator::new(dedup).map_err(|e| PipelineError::Config(e.to_string()))?;
        let writeback = LearningWriteback::new(
            dedup,
            config.learning_threshold,
            config.max_stored_claim_chars,
        );
        Ok(Self {
            store,
            embedder: Arc::new(embedder),
            reasoner: None,
            detector: Arc::new(ScriptLanguageDetector::new(config.default_language.clone())),
            writeback,
            config,
        })
    }

    /// Attach a reasoner for the fallback tier
    pub fn with_reasoner(mut self, reasoner: Arc<dyn Reasoner>) -> Self {
        self.reasoner = Some(reasoner);
        self
    }

    /// Replace the language detector
    pub fn with_language_detector(mut self, detector: Arc<dyn LanguageDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Shared handle to the underlying store
    pub fn store(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.store)
    }

    /// Active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Verify a claim
    pub async fn verify(&self, text: &str) -> Result<Verification, PipelineError> {
        self.verify_with_context(text, ReasoningContext::default()).await
    }

    /// Verify a claim, passing extra context to the reasoner
    ///
    /// Hard reasoner failures (every model rate limited, a non-retryable
    /// model error, timeout) are returned as errors. Everything else ends
    /// in a decision.
    pub async fn verify_with_context(
        &self,
        text: &str,
        mut context: ReasoningContext,
    ) -> Result<Verification, PipelineError> {
        let started = Instant::now();
        let claim = text.trim();

        if claim.is_empty() {
            debug!("Empty query, abstaining");
            return Ok(Verification {
                decision: VerdictDecision::abstained(AbstainReason::EmptyQuery),
                language: self.config.default_language.clone(),
                writeback: WritebackStatus::NotAttempted,
                source: None,
                latency: started.elapsed(),
            });
        }

        let language = self.detector.detect(claim);
        let searchable = claim.chars().any(char::is_alphanumeric);
        let embedding = if searchable {
            let embedding = self
                .embedder
                .embed(claim, Some(&language))
                .map_err(|e| PipelineError::Embedding(e.to_string()))?;
            Some(embedding)
        } else {
            debug!("No searchable terms, skipping corpus lookup");
            None
        };

        let source = match context.source_url.as_deref() {
            Some(url) => self.inspect_source(url)?,
            None => None,
        };

        let indexed = match &embedding {
            Some(embedding) => self.lookup(embedding, &language)?,
            None => None,
        };

        let (decision, learnable) = match (indexed, &source) {
            (Some(decision), _) => (decision, None),
            (None, Some(SourceCheck { url, listed: Some(listed), .. })) => {
                info!(domain = %listed.domain, category = %listed.category, "Unreliable source");
                let confidence = self.config.unreliable_source_confidence;
                (VerdictDecision::unreliable_source(url, listed, confidence), None)
            }
            (None, _) => {
                if let Some(check) = &source {
                    context.source_flags.extend(check.signals.flags());
                }
                let no_match = if searchable {
                    AbstainReason::NoMatch
                } else {
                    AbstainReason::NoSearchableTerms
                };
                self.fallback(claim, &language, context, no_match).await?
            }
        };

        let writeback = match (learnable, embedding) {
            (Some(verdict), Some(embedding)) => {
                self.writeback
                    .persist(self.store.as_ref(), claim, &language, embedding, &verdict)
            }
            _ => WritebackStatus::NotAttempted,
        };

        let latency = started.elapsed();
        self.log_query(claim, &decision, &language, latency);

        info!(
            tier = %decision.tier(),
            verdict = %decision.verdict,
            confidence = decision.confidence,
            language = %language,
            latency_ms = latency.as_millis() as u64,
            "Claim verified"
        );

        Ok(Verification {
            decision,
            language,
            writeback,
            source,
            latency,
        })
    }

    /// Check a source URL against the unreliable-domain list
    fn inspect_source(&self, url: &str) -> Result<Option<SourceCheck>, PipelineError> {
        let listed = {
            let store = self
                .store
                .lock()
                .map_err(|_| PipelineError::Store("store lock poisoned".to_string()))?;
            store
                .unreliable_domains()
                .map_err(|e| PipelineError::Store(e.to_string()))?
        };

        let check = check_source(url, &listed);
        match &check {
            Some(check) if check.signals.is_suspicious() => {
                debug!(domain = %check.domain, flags = ?check.signals.flags(), "Suspicious URL");
            }
            Some(_) => {}
            None => debug!(url = %url, "Source URL has no host"),
        }
        Ok(check)
    }

    /// Tier 1: best corpus match at or above the match threshold
    fn lookup(
        &self,
        embedding: &[f32],
        language: &str,
    ) -> Result<Option<VerdictDecision>, PipelineError> {
        let mut languages = vec![language.to_string()];
        if language != self.config.default_language {
            languages.push(self.config.default_language.clone());
        }

        let corpus = {
            let store = self
                .store
                .lock()
                .map_err(|_| PipelineError::Store("store lock poisoned".to_string()))?;
            store
                .by_languages(&languages)
                .map_err(|e| PipelineError::Store(e.to_string()))?
        };

        match best_match(embedding, &corpus) {
            Some(m) if m.similarity >= self.config.match_threshold => {
                debug!(record_id = %m.record.id, similarity = m.similarity, "Indexed match");
                Ok(Some(VerdictDecision::indexed_match(&m)))
            }
            Some(m) => {
                debug!(similarity = m.similarity, "Best match below threshold");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Tiers 3 and 4: reasoner answer, or abstention
    ///
    /// `unanswered` is the abstention used when no reasoner is available.
    /// Also returns the answer when it qualifies for writeback review.
    async fn fallback(
        &self,
        claim: &str,
        language: &str,
        context: ReasoningContext,
        unanswered: AbstainReason,
    ) -> Result<(VerdictDecision, Option<ReasonedVerdict>), PipelineError> {
        let reasoner = match &self.reasoner {
            Some(reasoner) if self.config.reasoner_enabled => Arc::clone(reasoner),
            _ => {
                debug!("No reasoner available, abstaining");
                return Ok((VerdictDecision::abstained(unanswered), None));
            }
        };

        let request = ReasoningRequest::new(claim, language).with_context(context);
        match self.call_reasoner(reasoner, request).await? {
            ReasonerOutcome::Verdict(answer) if answer.confidence >= self.config.gate_threshold => {
                let decision = VerdictDecision::reasoned(&answer);
                Ok((decision, Some(answer)))
            }
            ReasonerOutcome::Verdict(answer) => {
                debug!(confidence = answer.confidence, "Reasoner answer below gate");
                let reason = AbstainReason::LowConfidence {
                    model_used: answer.model_used,
                    confidence: answer.confidence,
                };
                Ok((VerdictDecision::abstained(reason), None))
            }
            ReasonerOutcome::StructuralFailure { model, raw, reason } => {
                warn!(model = %model, error = %reason, "Malformed reasoner output");
                let reason = AbstainReason::MalformedReasonerOutput {
                    model_used: model,
                    raw_payload: raw,
                    error: reason,
                };
                Ok((VerdictDecision::abstained(reason), None))
            }
            ReasonerOutcome::RateLimited { attempted } => {
                Err(PipelineError::ReasonerRateLimited { models: attempted })
            }
            ReasonerOutcome::HardFailure { model, message } => {
                Err(PipelineError::ReasonerFailed { model, message })
            }
        }
    }

    async fn call_reasoner(
        &self,
        reasoner: Arc<dyn Reasoner>,
        request: ReasoningRequest,
    ) -> Result<ReasonerOutcome, PipelineError> {
        debug!(reasoner = %reasoner.name(), "Calling reasoner");
        let task = tokio::task::spawn_blocking(move || reasoner.reason(&request));

        timeout(self.config.reasoner_timeout(), task)
            .await
            .map_err(|_| PipelineError::ReasonerTimeout(self.config.reasoner_timeout_secs))?
            .map_err(|e| PipelineError::TaskJoin(e.to_string()))
    }

    fn log_query(
        &self,
        claim: &str,
        decision: &VerdictDecision,
        language: &str,
        elapsed: Duration,
    ) {
        let entry = QueryLogEntry::from_decision(
            claim,
            self.config.max_stored_claim_chars,
            decision,
            language,
            elapsed,
        );
        match self.store.lock() {
            Ok(mut store) => {
                if let Err(e) = store.record_query(&entry) {
                    warn!(error = %e, "Failed to record query");
                }
            }
            Err(_) => warn!("Failed to record query: store lock poisoned"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use verity_domain::{ClaimRecord, Provenance, Resolution, UnreliableDomain, Verdict};
    use verity_store::SqliteStore;

    #[derive(Debug)]
    struct FixedEmbedder(HashMap<String, Vec<f32>>);

    impl Embedder for FixedEmbedder {
        type Error = String;

        fn embed(&self, text: &str, _language_hint: Option<&str>) -> Result<Vec<f32>, String> {
            self.0
                .get(text)
                .cloned()
                .ok_or_else(|| format!("no vector for '{}'", text))
        }

        fn dimension(&self) -> usize {
            2
        }

        fn model_version(&self) -> &str {
            "fixed"
        }
    }

    fn pipeline(vectors: &[(&str, Vec<f32>)]) -> DecisionPipeline<SqliteStore, FixedEmbedder> {
        let embedder = FixedEmbedder(
            vectors
                .iter()
                .map(|(t, v)| (t.to_string(), v.clone()))
                .collect(),
        );
        DecisionPipeline::new(
            Arc::new(Mutex::new(SqliteStore::in_memory().unwrap())),
            embedder,
            PipelineConfig::default(),
            DedupConfig::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_empty_query_abstains() {
        let p = pipeline(&[]);
        let v = p.verify("   ").await.unwrap();
        assert_eq!(v.decision.resolution, Resolution::Abstained(AbstainReason::EmptyQuery));
        assert_eq!(v.decision.confidence, 0.0);
    }

    #[tokio::test]
    async fn test_embedding_failure_is_error() {
        let p = pipeline(&[]);
        assert!(matches!(
            p.verify("unknown text").await,
            Err(PipelineError::Embedding(_))
        ));
    }

    #[tokio::test]
    async fn test_match_in_default_language_for_other_language_query() {
        let p = pipeline(&[("இலவச மின்சாரம்", vec![1.0, 0.0])]);
        let record = ClaimRecord::scraped(
            "Free electricity",
            Verdict::False,
            Provenance::new("factcheck", None),
            "en",
            vec![1.0, 0.0],
        );
        p.store().lock().unwrap().insert(record.clone()).unwrap();

        let v = p.verify("இலவச மின்சாரம்").await.unwrap();
        assert_eq!(v.language, "ta");
        assert_eq!(v.decision.matched_record_id(), Some(record.id));
    }

    #[tokio::test]
    async fn test_other_language_records_not_searched() {
        let p = pipeline(&[("free power", vec![1.0, 0.0])]);
        let record = ClaimRecord::scraped(
            "இலவச மின்சாரம்",
            Verdict::False,
            Provenance::new("factcheck", None),
            "ta",
            vec![1.0, 0.0],
        );
        p.store().lock().unwrap().insert(record).unwrap();

        let v = p.verify("free power").await.unwrap();
        assert_eq!(v.decision.resolution, Resolution::Abstained(AbstainReason::NoMatch));
    }

    #[tokio::test]
    async fn test_query_without_terms_abstains_without_embedding() {
        // The embedder knows no vectors, so any embed call would be an error
        let p = pipeline(&[]);
        for text in ["???", "🔥🔥🔥 !!!"] {
            let v = p.verify(text).await.unwrap();
            assert_eq!(
                v.decision.resolution,
                Resolution::Abstained(AbstainReason::NoSearchableTerms)
            );
            assert_eq!(v.decision.verdict, Verdict::Unverified);
            assert_eq!(v.writeback, WritebackStatus::NotAttempted);
        }
    }

    #[tokio::test]
    async fn test_unreliable_source_without_match() {
        let p = pipeline(&[("Free laptops for students", vec![0.0, 1.0])]);
        p.store()
            .lock()
            .unwrap()
            .add_unreliable_domain(&UnreliableDomain::new("hoax.example", "fabricated", ""))
            .unwrap();

        let context = ReasoningContext {
            source_url: Some("https://www.hoax.example/laptops".to_string()),
            ..Default::default()
        };
        let v = p
            .verify_with_context("Free laptops for students", context)
            .await
            .unwrap();

        assert_eq!(v.decision.verdict, Verdict::False);
        assert_eq!(v.decision.confidence, 0.9);
        assert_eq!(v.decision.tier().as_str(), "source-reputation");
        assert_eq!(v.source.unwrap().domain, "hoax.example");
        assert_eq!(v.writeback, WritebackStatus::NotAttempted);
    }

    #[tokio::test]
    async fn test_indexed_match_wins_over_source_list() {
        let p = pipeline(&[("Free laptops for students", vec![1.0, 0.0])]);
        let record = ClaimRecord::scraped(
            "Free laptops for students",
            Verdict::Misleading,
            Provenance::new("factcheck", None),
            "en",
            vec![1.0, 0.0],
        );
        {
            let store = p.store();
            let mut store = store.lock().unwrap();
            store.insert(record.clone()).unwrap();
            store
                .add_unreliable_domain(&UnreliableDomain::new("hoax.example", "fabricated", ""))
                .unwrap();
        }

        let context = ReasoningContext {
            source_url: Some("https://hoax.example/laptops".to_string()),
            ..Default::default()
        };
        let v = p
            .verify_with_context("Free laptops for students", context)
            .await
            .unwrap();

        assert_eq!(v.decision.matched_record_id(), Some(record.id));
        assert!(v.source.unwrap().is_unreliable());
    }

    #[tokio::test]
    async fn test_listed_source_without_terms() {
        let p = pipeline(&[]);
        p.store()
            .lock()
            .unwrap()
            .add_unreliable_domain(&UnreliableDomain::new("hoax.example", "fabricated", ""))
            .unwrap();

        let context = ReasoningContext {
            source_url: Some("https://hoax.example/x".to_string()),
            ..Default::default()
        };
        let v = p.verify_with_context("!!!", context).await.unwrap();
        assert_eq!(v.decision.tier().as_str(), "source-reputation");
    }
}
