//! Verity Gatekeeper
//!
//! Decides which candidate records may enter the corpus.
//!
//! The Gatekeeper provides:
//! - Record invariant checks (origin and confidence, non-empty text and embedding)
//! - Semantic duplicate detection against a corpus snapshot, with a
//!   configurable threshold and match policy
//! - Batch filtering, optionally deduplicating candidates against each other
//!
//! # Examples
//!
//! ```
//! use verity_domain::{ClaimRecord, DedupOutcome, Provenance, Verdict};
//! use verity_gatekeeper::{DedupConfig, Deduplicator};
//!
//! let dedup = Deduplicator::new(DedupConfig::default()).unwrap();
//! let existing = ClaimRecord::scraped(
//!     "PM announced free electricity",
//!     Verdict::False,
//!     Provenance::new("AltNews", None),
//!     "en",
//!     vec![1.0, 0.0],
//! );
//!
//! let outcome = dedup.check_duplicate(&[1.0, 0.0], &[existing.clone()]);
//! assert_eq!(outcome, DedupOutcome::DuplicateOf { id: existing.id, similarity: 1.0 });
//! ```

#![warn(missing_docs)]

mod config;
mod dedup;
mod error;

pub use config::{DedupConfig, MatchPolicy};
pub use dedup::{Deduplicator, DuplicateReport, FilterReport};
pub use error::GatekeeperError;
