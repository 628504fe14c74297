//! Verity Domain Layer
//!
//! Core value types and capability traits for the claim-verification system.
//! This crate performs no I/O; storage, embedding and reasoning backends live
//! in other crates and plug in through the traits in [`traits`].
//!
//! ## Key Concepts
//!
//! - **ClaimRecord**: an immutable fact-check in the corpus, scraped or AI-generated
//! - **Verdict**: true, false, misleading or unverified
//! - **VerdictDecision**: the pipeline's answer for a single query, tagged with the tier
//!   that resolved it
//! - **DedupOutcome**: whether a candidate claim duplicates an existing record
//!
//! ## Architecture
//!
//! - Only dependency is `uuid` for time-ordered identifiers
//! - Trait definitions for every external collaborator (store, embedder, reasoner, logs)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod audit;
pub mod claim;
pub mod decision;
pub mod provenance;
pub mod reasoning;
pub mod reputation;
pub mod traits;

// Re-exports for convenience
pub use audit::{IngestRun, IngestStatus, QueryLogEntry};
pub use claim::{current_timestamp, ClaimId, ClaimRecord, Origin, Verdict};
pub use decision::{
    AbstainReason, DedupOutcome, MatchResult, Resolution, ResolutionTier, VerdictDecision,
};
pub use provenance::Provenance;
pub use reasoning::{ReasonedVerdict, ReasonerOutcome, ReasoningContext, ReasoningRequest};
pub use reputation::UnreliableDomain;
pub use traits::InsertOutcome;
