//! Batch ingestion of scraped claims
//!
//! Per source: fetch, skip known URLs, embed, filter near-duplicates
//! against the corpus, persist the survivors and log the run. A source
//! that fails is logged as a failed run; the others still run.

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::metrics::IngestMetrics;
use crate::source::{ClaimSource, ScrapedClaim};
use tracing::{debug, error, info, warn};
use verity_domain::traits::{ClaimStore, Embedder, IngestLog, InsertOutcome, LanguageDetector};
use verity_domain::{ClaimRecord, IngestRun, Provenance, Verdict};
use verity_gatekeeper::{DedupConfig, Deduplicator};
use verity_pipeline::ScriptLanguageDetector;

/// Ingests scraped claims into a claim store
pub struct Ingestor<E> {
    embedder: E,
    dedup: Deduplicator,
    detector: Box<dyn LanguageDetector>,
    config: IngestConfig,
    metrics: IngestMetrics,
}

impl<E> Ingestor<E>
where
    E: Embedder,
    E::Error: std::fmt::Display,
{
    /// Create an ingestor
    pub fn new(embedder: E, config: IngestConfig, dedup: DedupConfig) -> Result<Self, IngestError> {
        config.validate().map_err(IngestError::Config)?;
        let dedup = Deduplicator::new(dedup).map_err(|e| IngestError::Config(e.to_string()))?;
        Ok(Self {
            embedder,
            dedup,
            detector: Box::new(ScriptLanguageDetector::default()),
            config,
            metrics: IngestMetrics::new(),
        })
    }

    /// Replace the language detector used for entries without a language
    pub fn with_language_detector(mut self, detector: Box<dyn LanguageDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Totals across every run so far
    pub fn metrics(&self) -> &IngestMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    pub(crate) fn record_cycle(&mut self) {
        self.metrics.record_cycle();
    }

    /// Ingest every source in order, pausing between sources
    pub async fn ingest_all<S>(
        &mut self,
        store: &mut S,
        sources: &[Box<dyn ClaimSource>],
    ) -> Vec<IngestRun>
    where
        S: ClaimStore + IngestLog,
        <S as ClaimStore>::Error: std::fmt::Display,
        <S as IngestLog>::Error: std::fmt::Display,
    {
        let mut runs = Vec::with_capacity(sources.len());
        for (i, source) in sources.iter().enumerate() {
            if i > 0 && self.config.pause_between_sources_secs > 0 {
                tokio::time::sleep(self.config.pause_between_sources()).await;
            }
            runs.push(self.ingest_source(store, source.as_ref()));
        }
        runs
    }

    /// Ingest one source and record the run
    pub fn ingest_source<S>(&mut self, store: &mut S, source: &dyn ClaimSource) -> IngestRun
    where
        S: ClaimStore + IngestLog,
        <S as ClaimStore>::Error: std::fmt::Display,
        <S as IngestLog>::Error: std::fmt::Display,
    {
        let mut run = IngestRun::start(source.name());
        info!(source = %source.name(), "Ingesting source");

        match source.fetch() {
            Ok(batch) => match self.ingest_batch(store, source.name(), batch, &mut run) {
                Ok(()) => run.finish(),
                Err(e) => {
                    error!(source = %source.name(), error = %e, "Ingestion failed");
                    run.fail(e.to_string());
                }
            },
            Err(e) => {
                error!(source = %source.name(), error = %e, "Fetch failed");
                run.fail(e.to_string());
            }
        }

        info!(
            source = %run.source,
            status = %run.status,
            fetched = run.fetched,
            stored = run.stored,
            duplicates = run.duplicates,
            skipped_known = run.skipped_known,
            errors = run.errors.len(),
            "Source run finished"
        );

        if let Err(e) = store.record_ingest_run(&run) {
            warn!(source = %run.source, error = %e, "Failed to record ingest run");
        }
        self.metrics.record_run(&run);
        run
    }

    fn ingest_batch<S>(
        &self,
        store: &mut S,
        source: &str,
        batch: Vec<ScrapedClaim>,
        run: &mut IngestRun,
    ) -> Result<(), IngestError>
    where
        S: ClaimStore,
        <S as ClaimStore>::Error: std::fmt::Display,
    {
        run.fetched = batch.len();

        let mut candidates = Vec::with_capacity(batch.len());
        for scraped in batch {
            if self.config.skip_known_urls {
                if let Some(url) = &scraped.source_url {
                    let known = store
                        .contains_source_url(url)
                        .map_err(|e| IngestError::Store(e.to_string()))?;
                    if known {
                        debug!(url = %url, "Skipping known URL");
                        run.skipped_known += 1;
                        continue;
                    }
                }
            }

            match self.to_record(source, scraped) {
                Ok(record) => candidates.push(record),
                Err(e) => {
                    warn!(source = %source, error = %e, "Dropping entry");
                    run.errors.push(e.to_string());
                }
            }
        }

        let corpus = store.all().map_err(|e| IngestError::Store(e.to_string()))?;
        let report = self.dedup.filter_unique(candidates, &corpus);

        run.duplicates += report.duplicates.len();
        for (record, reason) in report.invalid {
            run.errors.push(format!("{}: {}", record.claim, reason));
        }

        for record in report.unique {
            match store.insert(record) {
                Ok(InsertOutcome::Inserted(_)) => run.stored += 1,
                Ok(InsertOutcome::DuplicateKey(id)) => {
                    debug!(existing_id = %id, "Claim text already stored");
                    run.duplicates += 1;
                }
                Err(e) => run.errors.push(format!("insert failed: {}", e)),
            }
        }

        Ok(())
    }

    fn to_record(&self, source: &str, scraped: ScrapedClaim) -> Result<ClaimRecord, IngestError> {
        let claim = scraped.claim.trim();
        if claim.is_empty() {
            return Err(IngestError::InvalidEntry("empty claim text".to_string()));
        }
        let verdict = Verdict::parse(&scraped.verdict).ok_or_else(|| {
            IngestError::InvalidEntry(format!("unknown verdict '{}'", scraped.verdict))
        })?;
        let language = scraped
            .language
            .unwrap_or_else(|| self.detector.detect(claim));
        let embedding = self
            .embedder
            .embed(claim, Some(&language))
            .map_err(|e| IngestError::Embedding(e.to_string()))?;

        Ok(ClaimRecord::scraped(
            claim,
            verdict,
            Provenance::new(source, scraped.source_url),
            language,
            embedding,
        )
        .with_explanation(scraped.explanation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_domain::IngestStatus;
    use verity_store::{SqliteStore, TermHashEmbedder};

    struct StaticSource(Vec<ScrapedClaim>);

    impl ClaimSource for StaticSource {
        fn name(&self) -> &str {
            "static"
        }

        fn fetch(&self) -> Result<Vec<ScrapedClaim>, IngestError> {
            Ok(self.0.clone())
        }
    }

    fn ingestor() -> Ingestor<TermHashEmbedder> {
        Ingestor::new(
            TermHashEmbedder::default(),
            IngestConfig::default(),
            DedupConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_bad_entries_are_reported_not_fatal() {
        let mut store = SqliteStore::in_memory().unwrap();
        let source = StaticSource(vec![
            ScrapedClaim::new("Free laptops for every student", "false"),
            ScrapedClaim::new("   ", "false"),
            ScrapedClaim::new("Petrol price halved overnight", "bogus"),
        ]);

        let run = ingestor().ingest_source(&mut store, &source);
        assert_eq!(run.status, IngestStatus::Success);
        assert_eq!(run.fetched, 3);
        assert_eq!(run.stored, 1);
        assert_eq!(run.errors.len(), 2);
    }

    #[test]
    fn test_language_detected_when_missing() {
        let mut store = SqliteStore::in_memory().unwrap();
        let source = StaticSource(vec![ScrapedClaim::new("இலவச மின்சாரம் அறிவிப்பு", "false")]);
        ingestor().ingest_source(&mut store, &source);

        let records = store.all().unwrap();
        assert_eq!(records[0].language, "ta");
        assert_eq!(records[0].provenance.source, "static");
    }

    #[test]
    fn test_empty_batch_is_no_data() {
        let mut store = SqliteStore::in_memory().unwrap();
        let run = ingestor().ingest_source(&mut store, &StaticSource(Vec::new()));
        assert_eq!(run.status, IngestStatus::NoData);
        assert!(run.finished_at.is_some());
    }
}
