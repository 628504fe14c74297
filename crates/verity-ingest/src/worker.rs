//! Background worker for periodic ingestion

use crate::{ClaimSource, IngestMetrics, Ingestor};
use tokio::time::{interval, Duration};
use verity_domain::traits::{ClaimStore, Embedder, IngestLog};

/// Background worker that ingests every source on a schedule
///
/// # Examples
///
/// ```no_run
/// use verity_gatekeeper::DedupConfig;
/// use verity_ingest::{ClaimSource, IngestConfig, IngestWorker, Ingestor, JsonFileSource};
/// use verity_store::{SqliteStore, TermHashEmbedder};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = SqliteStore::new("verity.db")?;
///     let ingestor = Ingestor::new(TermHashEmbedder::default(), IngestConfig::default(), DedupConfig::default())?;
///     let sources: Vec<Box<dyn ClaimSource>> =
///         vec![Box::new(JsonFileSource::new("factcheck", "scraped/factcheck.json"))];
///
///     // Run until Ctrl+C
///     IngestWorker::new(ingestor, sources).run(store).await;
///     Ok(())
/// }
/// ```
pub struct IngestWorker<E> {
    ingestor: Ingestor<E>,
    sources: Vec<Box<dyn ClaimSource>>,
    interval: Duration,
}

impl<E> IngestWorker<E>
where
    E: Embedder,
    E::Error: std::fmt::Display,
{
    /// Create a worker over `sources`
    pub fn new(ingestor: Ingestor<E>, sources: Vec<Box<dyn ClaimSource>>) -> Self {
        let interval = ingestor.config().interval();
        Self {
            ingestor,
            sources,
            interval,
        }
    }

    /// Run the worker until a shutdown signal (Ctrl+C) is received
    ///
    /// The first cycle starts immediately.
    pub async fn run<S>(&mut self, mut store: S)
    where
        S: ClaimStore + IngestLog,
        <S as ClaimStore>::Error: std::fmt::Display,
        <S as IngestLog>::Error: std::fmt::Display,
    {
        let mut ticker = interval(self.interval);

        tracing::info!(
            sources = self.sources.len(),
            "Ingest worker started (interval: {:?})",
            self.interval
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.cycle(&mut store).await;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received, stopping ingest worker");
                    break;
                }
            }
        }

        tracing::info!("Ingest worker stopped. Final metrics:\n{}", self.metrics().summary());
    }

    /// Run for a specific number of cycles
    pub async fn run_cycles<S>(&mut self, mut store: S, cycles: usize) -> S
    where
        S: ClaimStore + IngestLog,
        <S as ClaimStore>::Error: std::fmt::Display,
        <S as IngestLog>::Error: std::fmt::Display,
    {
        let mut ticker = interval(self.interval);

        for cycle in 0..cycles {
            ticker.tick().await;
            tracing::debug!("Starting ingest cycle {}/{}", cycle + 1, cycles);
            self.cycle(&mut store).await;
        }

        tracing::info!(
            "Ingest worker finished {} cycles. Final metrics:\n{}",
            cycles,
            self.metrics().summary()
        );
        store
    }

    async fn cycle<S>(&mut self, store: &mut S)
    where
        S: ClaimStore + IngestLog,
        <S as ClaimStore>::Error: std::fmt::Display,
        <S as IngestLog>::Error: std::fmt::Display,
    {
        let runs = self.ingestor.ingest_all(store, &self.sources).await;
        self.ingestor.record_cycle();

        let stored: usize = runs.iter().map(|r| r.stored).sum();
        let failed = runs
            .iter()
            .filter(|r| r.status == verity_domain::IngestStatus::Failure)
            .count();
        tracing::info!(stored, failed, sources = runs.len(), "Ingest cycle completed");
    }

    /// Metrics across all cycles so far
    pub fn metrics(&self) -> &IngestMetrics {
        self.ingestor.metrics()
    }

    /// Reset the metrics counters
    pub fn reset_metrics(&mut self) {
        self.ingestor.reset_metrics();
    }
}
