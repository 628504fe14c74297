//! Verity Ingest
//!
//! Batch ingestion of scraped fact-checks into the claim corpus.
//!
//! # Overview
//!
//! For each [`ClaimSource`] an ingestion run:
//! - fetches the current batch
//! - skips entries whose source URL is already stored
//! - embeds the rest and drops near-duplicates of the corpus
//! - persists the survivors and records an [`IngestRun`](verity_domain::IngestRun)
//!
//! A failing source is recorded as a failed run and never aborts the others.
//!
//! # Usage
//!
//! ```
//! use verity_domain::IngestStatus;
//! use verity_gatekeeper::DedupConfig;
//! use verity_ingest::{ClaimSource, IngestConfig, IngestError, Ingestor, ScrapedClaim};
//! use verity_store::{SqliteStore, TermHashEmbedder};
//!
//! struct Inline;
//!
//! impl ClaimSource for Inline {
//!     fn name(&self) -> &str { "inline" }
//!     fn fetch(&self) -> Result<Vec<ScrapedClaim>, IngestError> {
//!         Ok(vec![ScrapedClaim::new("Free laptops for every student", "false")])
//!     }
//! }
//!
//! let mut store = SqliteStore::in_memory().unwrap();
//! let mut ingestor = Ingestor::new(
//!     TermHashEmbedder::default(),
//!     IngestConfig::default(),
//!     DedupConfig::default(),
//! ).unwrap();
//!
//! let run = ingestor.ingest_source(&mut store, &Inline);
//! assert_eq!(run.status, IngestStatus::Success);
//! assert_eq!(run.stored, 1);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod ingestor;
mod metrics;
mod source;
mod worker;

pub use config::IngestConfig;
pub use error::IngestError;
pub use ingestor::Ingestor;
pub use metrics::IngestMetrics;
pub use source::{ClaimSource, JsonFileSource, ScrapedClaim};
pub use worker::IngestWorker;
