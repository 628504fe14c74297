//! Metrics collected across ingestion runs

use verity_domain::{IngestRun, IngestStatus};

/// Totals across every run seen by an [`Ingestor`](crate::Ingestor)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestMetrics {
    /// Completed worker cycles
    pub cycles: usize,

    /// Source runs recorded
    pub runs: usize,

    /// Source runs that failed outright
    pub failed_runs: usize,

    /// Records persisted
    pub stored: usize,

    /// Candidates dropped as near-duplicates
    pub duplicates: usize,

    /// Candidates skipped for a known source URL
    pub skipped_known: usize,
}

impl IngestMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a finished run into the totals
    pub fn record_run(&mut self, run: &IngestRun) {
        self.runs += 1;
        if run.status == IngestStatus::Failure {
            self.failed_runs += 1;
        }
        self.stored += run.stored;
        self.duplicates += run.duplicates;
        self.skipped_known += run.skipped_known;
    }

    /// Record a worker cycle completion
    pub fn record_cycle(&mut self) {
        self.cycles += 1;
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        [
            "Ingest Metrics Summary".to_string(),
            "======================".to_string(),
            format!("Cycles: {}", self.cycles),
            format!("Source runs: {} ({} failed)", self.runs, self.failed_runs),
            format!("Stored: {}", self.stored),
            format!("Duplicates: {}", self.duplicates),
            format!("Known URLs skipped: {}", self.skipped_known),
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_run() {
        let mut metrics = IngestMetrics::new();

        let mut ok = IngestRun::start("a");
        ok.stored = 3;
        ok.duplicates = 1;
        ok.finish();
        metrics.record_run(&ok);

        let mut failed = IngestRun::start("b");
        failed.fail("timeout");
        metrics.record_run(&failed);

        assert_eq!(metrics.runs, 2);
        assert_eq!(metrics.failed_runs, 1);
        assert_eq!(metrics.stored, 3);
        assert_eq!(metrics.duplicates, 1);
    }

    #[test]
    fn test_summary_and_reset() {
        let mut metrics = IngestMetrics::new();
        metrics.record_cycle();
        metrics.stored = 7;

        let summary = metrics.summary();
        assert!(summary.contains("Cycles: 1"));
        assert!(summary.contains("Stored: 7"));

        metrics.reset();
        assert_eq!(metrics, IngestMetrics::default());
    }
}
