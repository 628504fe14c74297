//! Verity Decision Pipeline
//!
//! Answers a claim from the fact-check corpus when a close enough match
//! exists, otherwise asks a [`Reasoner`](verity_domain::traits::Reasoner)
//! and gates its answer on confidence. High-confidence answers are written
//! back to the corpus so the next similar query is answered by lookup.
//!
//! # Thresholds
//!
//! All comparisons are inclusive:
//!
//! - `match_threshold` (0.75): similarity needed for an indexed match
//! - `gate_threshold` (0.6): reasoner confidence needed to answer at all
//! - `learning_threshold` (0.9): reasoner confidence needed for writeback
//!
//! # Source URLs
//!
//! When the claim comes with a source URL whose host is on the
//! unreliable-domain list and the corpus has no match, the claim is marked
//! false without asking the reasoner. Structural warning signs in the URL
//! are passed to the reasoner as context.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod language;
pub mod pipeline;
pub mod source;
pub mod writeback;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use language::ScriptLanguageDetector;
pub use pipeline::{DecisionPipeline, Verification};
pub use source::{check_source, SourceCheck, UrlSignals};
pub use writeback::{LearningWriteback, WritebackStatus};
