//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use verity_domain::{IngestRun, IngestStatus, Resolution, UnreliableDomain, Verdict};
use verity_pipeline::{Verification, WritebackStatus};
use verity_store::CorpusStats;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the result of a check.
    pub fn format_verification(&self, v: &Verification) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.verification_json(v),
            OutputFormat::Table => Ok(self.verification_table(v)),
            OutputFormat::Quiet => Ok(v.decision.verdict.to_string()),
        }
    }

    fn verification_json(&self, v: &Verification) -> Result<String> {
        let d = &v.decision;
        let (model_used, red_flags) = match &d.resolution {
            Resolution::ReasonerFallback { model_used, red_flags } => {
                (Some(model_used.clone()), red_flags.clone())
            }
            _ => (None, Vec::new()),
        };
        let source_check = v.source.as_ref().map(|check| {
            serde_json::json!({
                "domain": check.domain,
                "unreliable": check.is_unreliable(),
                "url_flags": check.signals.flags(),
            })
        });
        let value = serde_json::json!({
            "verdict": d.verdict.as_str(),
            "confidence": d.confidence,
            "explanation": d.explanation,
            "tier": d.tier().as_str(),
            "language": v.language,
            "source": d.provenance.as_ref().map(|p| p.source.clone()),
            "source_url": d.provenance.as_ref().and_then(|p| p.source_url.clone()),
            "matched_id": d.matched_record_id().map(|id| id.to_string()),
            "model_used": model_used,
            "red_flags": red_flags,
            "writeback": writeback_label(&v.writeback),
            "source_check": source_check,
            "latency_ms": v.latency.as_millis() as u64,
        });
        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn verification_table(&self, v: &Verification) -> String {
        let d = &v.decision;
        let headline = format!("{} ({:.2})", d.verdict.as_str().to_uppercase(), d.confidence);

        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        builder.push_record(["Tier".to_string(), d.tier().to_string()]);
        builder.push_record(["Language".to_string(), v.language.clone()]);
        if let Some(p) = &d.provenance {
            builder.push_record(["Source".to_string(), p.source.clone()]);
            if let Some(url) = &p.source_url {
                builder.push_record(["URL".to_string(), url.clone()]);
            }
        }
        match &d.resolution {
            Resolution::ReasonerFallback { red_flags, .. } if !red_flags.is_empty() => {
                builder.push_record(["Red flags".to_string(), red_flags.join(", ")]);
            }
            Resolution::SourceReputation { category, .. } => {
                builder.push_record(["Listed as".to_string(), category.clone()]);
            }
            _ => {}
        }
        if let Some(check) = &v.source {
            let flags = check.signals.flags();
            if !flags.is_empty() {
                builder.push_record(["URL warnings".to_string(), flags.join(", ")]);
            }
        }
        builder.push_record(["Explanation".to_string(), d.explanation.clone()]);
        if v.writeback != WritebackStatus::NotAttempted {
            builder.push_record(["Writeback".to_string(), writeback_label(&v.writeback)]);
        }
        builder.push_record(["Latency".to_string(), format!("{} ms", v.latency.as_millis())]);

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        format!("{}\n{}", self.colorize(&headline, verdict_color(d.verdict)), table)
    }

    /// Format ingestion runs.
    pub fn format_runs(&self, runs: &[IngestRun]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value: Vec<serde_json::Value> = runs
                    .iter()
                    .map(|r| {
                        serde_json::json!({
                            "source": r.source,
                            "status": r.status.as_str(),
                            "fetched": r.fetched,
                            "stored": r.stored,
                            "duplicates": r.duplicates,
                            "skipped_known": r.skipped_known,
                            "errors": r.errors,
                            "started_at": r.started_at,
                            "finished_at": r.finished_at,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => Ok(runs
                .iter()
                .map(|r| format!("{} {} {}", r.source, r.status, r.stored))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if runs.is_empty() {
                    return Ok(self.colorize("No ingestion runs recorded.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record([
                    "Source",
                    "Status",
                    "Fetched",
                    "Stored",
                    "Duplicates",
                    "Known",
                    "Errors",
                ]);
                for r in runs {
                    builder.push_record([
                        r.source.clone(),
                        r.status.to_string(),
                        r.fetched.to_string(),
                        r.stored.to_string(),
                        r.duplicates.to_string(),
                        r.skipped_known.to_string(),
                        r.errors.len().to_string(),
                    ]);
                }
                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format the unreliable-source list.
    pub fn format_domains(&self, domains: &[UnreliableDomain]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value: Vec<serde_json::Value> = domains
                    .iter()
                    .map(|d| {
                        serde_json::json!({
                            "domain": d.domain,
                            "category": d.category,
                            "reason": d.reason,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => Ok(domains
                .iter()
                .map(|d| d.domain.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if domains.is_empty() {
                    return Ok(self.colorize("No unreliable domains listed.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Domain", "Category", "Reason"]);
                for d in domains {
                    builder.push_record([d.domain.clone(), d.category.clone(), d.reason.clone()]);
                }
                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format corpus statistics.
    pub fn format_stats(&self, stats: &CorpusStats) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let by_source: Vec<serde_json::Value> = stats
                    .by_source
                    .iter()
                    .map(|(source, count)| serde_json::json!({"source": source, "count": count}))
                    .collect();
                let by_verdict: serde_json::Map<String, serde_json::Value> = stats
                    .by_verdict
                    .iter()
                    .map(|(verdict, count)| {
                        (verdict.as_str().to_string(), serde_json::json!(count))
                    })
                    .collect();
                let value = serde_json::json!({
                    "total": stats.total,
                    "scraped": stats.scraped,
                    "ai_generated": stats.ai_generated,
                    "queries_logged": stats.queries_logged,
                    "by_source": by_source,
                    "by_verdict": by_verdict,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => Ok(stats.total.to_string()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Metric", "Count"]);
                builder.push_record(["Total claims".to_string(), stats.total.to_string()]);
                builder.push_record(["Scraped".to_string(), stats.scraped.to_string()]);
                builder.push_record(["AI-generated".to_string(), stats.ai_generated.to_string()]);
                for (verdict, count) in &stats.by_verdict {
                    builder.push_record([format!("Verdict: {}", verdict), count.to_string()]);
                }
                for (source, count) in &stats.by_source {
                    builder.push_record([format!("Source: {}", source), count.to_string()]);
                }
                builder.push_record([
                    "Queries logged".to_string(),
                    stats.queries_logged.to_string(),
                ]);

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Summarize ingestion runs in one line.
    pub fn ingest_summary(&self, runs: &[IngestRun]) -> String {
        let stored: usize = runs.iter().map(|r| r.stored).sum();
        let failed = runs.iter().filter(|r| r.status == IngestStatus::Failure).count();
        let message = format!("Stored {} claim(s) from {} source(s)", stored, runs.len());
        if failed > 0 {
            self.warning(&format!("{}, {} source(s) failed", message, failed))
        } else {
            self.success(&message)
        }
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn verdict_color(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::True => "green",
        Verdict::False => "red",
        Verdict::Misleading => "yellow",
        Verdict::Unverified => "blue",
    }
}

fn writeback_label(status: &WritebackStatus) -> String {
    match status {
        WritebackStatus::NotAttempted => "not attempted".to_string(),
        WritebackStatus::Persisted(id) => format!("learned as {}", id),
        WritebackStatus::SkippedDuplicate { of, similarity } => {
            format!("duplicate of {} ({:.2})", of, similarity)
        }
        WritebackStatus::Failed(e) => format!("failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use verity_domain::{AbstainReason, ClaimRecord, MatchResult, Provenance, VerdictDecision};
    use verity_pipeline::check_source;

    fn matched() -> Verification {
        let record = ClaimRecord::scraped(
            "Free laptops for all students",
            Verdict::False,
            Provenance::new("factcheck.example", Some("https://factcheck.example/1".into())),
            "en",
            vec![1.0],
        )
        .with_explanation("No such scheme");
        Verification {
            decision: VerdictDecision::indexed_match(&MatchResult {
                record,
                similarity: 0.81,
            }),
            language: "en".to_string(),
            writeback: WritebackStatus::NotAttempted,
            source: None,
            latency: Duration::from_millis(4),
        }
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_verification(&matched()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["verdict"], "false");
        assert_eq!(value["tier"], "indexed-match");
        assert_eq!(value["source"], "factcheck.example");
        assert!(value["model_used"].is_null());
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        assert_eq!(formatter.format_verification(&matched()).unwrap(), "false");
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_verification(&matched()).unwrap();
        assert!(output.starts_with("FALSE (0.81)"));
        assert!(output.contains("factcheck.example"));
        assert!(output.contains("No such scheme"));
        assert!(!output.contains("Writeback"));
    }

    #[test]
    fn test_abstained_has_no_source() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let v = Verification {
            decision: VerdictDecision::abstained(AbstainReason::NoMatch),
            language: "ta".to_string(),
            writeback: WritebackStatus::NotAttempted,
            source: None,
            latency: Duration::from_millis(1),
        };
        let output = formatter.format_verification(&v).unwrap();
        assert!(output.starts_with("UNVERIFIED (0.00)"));
        assert!(!output.contains("Source"));
    }

    #[test]
    fn test_unreliable_source_output() {
        let listed = UnreliableDomain::new("hoax.example", "satire", "");
        let url = "http://bit.ly/free-prize";
        let v = Verification {
            decision: VerdictDecision::unreliable_source(url, &listed, 0.9),
            language: "en".to_string(),
            writeback: WritebackStatus::NotAttempted,
            source: check_source(url, &[]),
            latency: Duration::from_millis(2),
        };

        let table = Formatter::new(OutputFormat::Table, false)
            .format_verification(&v)
            .unwrap();
        assert!(table.starts_with("FALSE (0.90)"));
        assert!(table.contains("source-reputation"));
        assert!(table.contains("Listed as"));
        assert!(table.contains("url shortener, bait words"));

        let json = Formatter::new(OutputFormat::Json, false)
            .format_verification(&v)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["tier"], "source-reputation");
        assert_eq!(value["source_check"]["domain"], "bit.ly");
        assert_eq!(value["source_check"]["url_flags"][0], "url shortener");
    }

    #[test]
    fn test_domains_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let domains = vec![
            UnreliableDomain::new("a.example", "satire", ""),
            UnreliableDomain::new("b.example", "fabricated", ""),
        ];
        assert_eq!(formatter.format_domains(&domains).unwrap(), "a.example\nb.example");
    }

    #[test]
    fn test_empty_runs() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert!(formatter.format_runs(&[]).unwrap().contains("No ingestion runs"));
    }

    #[test]
    fn test_stats_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let stats = CorpusStats {
            total: 3,
            scraped: 2,
            ai_generated: 1,
            by_source: vec![("fc".to_string(), 2)],
            by_verdict: vec![(Verdict::False, 3)],
            queries_logged: 5,
        };
        let value: serde_json::Value =
            serde_json::from_str(&formatter.format_stats(&stats).unwrap()).unwrap();
        assert_eq!(value["total"], 3);
        assert_eq!(value["by_verdict"]["false"], 3);
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }
}
