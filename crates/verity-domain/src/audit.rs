//! Audit records: per-query log entries and ingestion run summaries

use crate::claim::{current_timestamp, ClaimId, Verdict};
use crate::decision::{ResolutionTier, VerdictDecision};
use std::fmt;
use std::time::Duration;

/// One answered query, as written to the query audit log
#[derive(Debug, Clone, PartialEq)]
pub struct QueryLogEntry {
    /// Query text, truncated to the configured limit
    pub query: String,

    /// Verdict returned
    pub verdict: Verdict,

    /// Confidence returned
    pub confidence: f64,

    /// Tier that answered
    pub tier: ResolutionTier,

    /// Detected language
    pub language: String,

    /// Matched corpus record, for indexed matches
    pub matched_id: Option<ClaimId>,

    /// Wall-clock processing time in milliseconds
    pub processing_ms: u64,

    /// When the query was answered
    pub created_at: u64,
}

impl QueryLogEntry {
    /// Build an entry from a decision
    pub fn from_decision(
        query: &str,
        max_chars: usize,
        decision: &VerdictDecision,
        language: &str,
        elapsed: Duration,
    ) -> Self {
        Self {
            query: query.chars().take(max_chars).collect(),
            verdict: decision.verdict,
            confidence: decision.confidence,
            tier: decision.tier(),
            language: language.to_string(),
            matched_id: decision.matched_record_id(),
            processing_ms: elapsed.as_millis() as u64,
            created_at: current_timestamp(),
        }
    }
}

/// Final state of an ingestion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStatus {
    /// Run has started and not finished
    Running,
    /// At least one new record was stored
    Success,
    /// The source returned nothing new
    NoData,
    /// The source could not be fetched
    Failure,
}

impl IngestStatus {
    /// Canonical storage name
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestStatus::Running => "running",
            IngestStatus::Success => "success",
            IngestStatus::NoData => "no_data",
            IngestStatus::Failure => "failure",
        }
    }

    /// Parse a storage name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "running" => Some(IngestStatus::Running),
            "success" => Some(IngestStatus::Success),
            "no_data" => Some(IngestStatus::NoData),
            "failure" => Some(IngestStatus::Failure),
            _ => None,
        }
    }
}

impl fmt::Display for IngestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of one ingestion run over a single source
#[derive(Debug, Clone, PartialEq)]
pub struct IngestRun {
    /// Source name
    pub source: String,

    /// Status at the time of recording
    pub status: IngestStatus,

    /// Candidates fetched
    pub fetched: usize,

    /// Records persisted
    pub stored: usize,

    /// Candidates skipped because their source URL was already known
    pub skipped_known: usize,

    /// Candidates dropped as near-duplicates
    pub duplicates: usize,

    /// Fetch or per-record error messages
    pub errors: Vec<String>,

    /// Run start (seconds since Unix epoch)
    pub started_at: u64,

    /// Run end, once finished
    pub finished_at: Option<u64>,
}

impl IngestRun {
    /// A run that has just started
    pub fn start(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            status: IngestStatus::Running,
            fetched: 0,
            stored: 0,
            skipped_known: 0,
            duplicates: 0,
            errors: Vec::new(),
            started_at: current_timestamp(),
            finished_at: None,
        }
    }

    /// Mark the run finished after a successful fetch
    pub fn finish(&mut self) {
        self.status = if self.stored > 0 {
            IngestStatus::Success
        } else {
            IngestStatus::NoData
        };
        self.finished_at = Some(current_timestamp());
    }

    /// Mark the run failed
    pub fn fail(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.status = IngestStatus::Failure;
        self.finished_at = Some(current_timestamp());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::AbstainReason;

    #[test]
    fn test_query_entry_truncates() {
        let decision = VerdictDecision::abstained(AbstainReason::NoMatch);
        let long = "x".repeat(800);
        let entry =
            QueryLogEntry::from_decision(&long, 500, &decision, "en", Duration::from_millis(12));
        assert_eq!(entry.query.chars().count(), 500);
        assert_eq!(entry.tier, ResolutionTier::Abstained);
        assert_eq!(entry.processing_ms, 12);
        assert!(entry.matched_id.is_none());
    }

    #[test]
    fn test_run_status() {
        let mut run = IngestRun::start("altnews");
        assert_eq!(run.status, IngestStatus::Running);
        run.stored = 3;
        run.finish();
        assert_eq!(run.status, IngestStatus::Success);
        assert!(run.finished_at.is_some());

        let mut run = IngestRun::start("altnews");
        run.fail("connection refused");
        assert_eq!(run.status, IngestStatus::Failure);
        assert_eq!(run.errors, vec!["connection refused".to_string()]);

        let mut run = IngestRun::start("altnews");
        run.finish();
        assert_eq!(run.status, IngestStatus::NoData);
    }

    #[test]
    fn test_status_names_parse() {
        for status in [
            IngestStatus::Running,
            IngestStatus::Success,
            IngestStatus::NoData,
            IngestStatus::Failure,
        ] {
            assert_eq!(IngestStatus::parse(status.as_str()), Some(status));
        }
    }
}
