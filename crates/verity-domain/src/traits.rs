//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{
    ClaimId, ClaimRecord, IngestRun, QueryLogEntry, ReasonerOutcome, ReasoningRequest,
    UnreliableDomain,
};

/// Result of inserting a record into a [`ClaimStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record was appended
    Inserted(ClaimId),

    /// A record with the same normalized claim text already exists
    DuplicateKey(ClaimId),
}

impl InsertOutcome {
    /// Id of the stored record, whichever branch was taken
    pub fn id(&self) -> ClaimId {
        match self {
            InsertOutcome::Inserted(id) | InsertOutcome::DuplicateKey(id) => *id,
        }
    }
}

/// Append-only storage for the fact-check corpus
///
/// Implemented by the infrastructure layer (verity-store). Every listing
/// returns records in creation order: `created_at` ascending, then id.
pub trait ClaimStore {
    /// Error type for store operations
    type Error;

    /// Append a record
    fn insert(&mut self, record: ClaimRecord) -> Result<InsertOutcome, Self::Error>;

    /// Get a record by id
    fn get(&self, id: ClaimId) -> Result<Option<ClaimRecord>, Self::Error>;

    /// Every record in the corpus
    fn all(&self) -> Result<Vec<ClaimRecord>, Self::Error>;

    /// Records whose language is one of `languages`
    fn by_languages(&self, languages: &[String]) -> Result<Vec<ClaimRecord>, Self::Error>;

    /// Whether a record with this source URL has already been stored
    fn contains_source_url(&self, url: &str) -> Result<bool, Self::Error>;

    /// Number of records in the corpus
    fn count(&self) -> Result<usize, Self::Error>;
}

/// Maps text to a fixed-length vector
///
/// Implementations must be deterministic for a given `model_version`:
/// the same text always yields the same vector.
pub trait Embedder {
    /// Error type for embedding operations
    type Error;

    /// Embed text, optionally hinted with its language
    fn embed(&self, text: &str, language_hint: Option<&str>) -> Result<Vec<f32>, Self::Error>;

    /// Length of every vector this embedder produces
    fn dimension(&self) -> usize;

    /// Identifier of the model, stored alongside embeddings
    fn model_version(&self) -> &str;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (verity-reasoner)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Model identifier sent with each request
    fn model_name(&self) -> &str;

    /// Generate a text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;
}

/// Analyzes a claim the corpus could not answer
///
/// A reasoner never returns `Err`: rate limits, malformed answers and hard
/// failures are all distinct [`ReasonerOutcome`] variants so callers must
/// handle each one.
pub trait Reasoner: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Analyze a claim
    fn reason(&self, request: &ReasoningRequest) -> ReasonerOutcome;
}

/// Sink for per-query audit entries
pub trait QueryLog {
    /// Error type for log writes
    type Error;

    /// Record one answered query
    fn record_query(&mut self, entry: &QueryLogEntry) -> Result<(), Self::Error>;
}

/// Sink for ingestion run summaries
pub trait IngestLog {
    /// Error type for log writes
    type Error;

    /// Record a finished ingestion run
    fn record_ingest_run(&mut self, run: &IngestRun) -> Result<(), Self::Error>;
}

/// List of publishers known to be unreliable
pub trait SourceReputation {
    /// Error type for list operations
    type Error;

    /// Add a domain, or replace the entry for it
    fn add_unreliable_domain(&mut self, domain: &UnreliableDomain) -> Result<(), Self::Error>;

    /// Every active entry, ordered by domain
    fn unreliable_domains(&self) -> Result<Vec<UnreliableDomain>, Self::Error>;
}

/// Guesses the language of a piece of text
pub trait LanguageDetector: Send + Sync {
    /// Language tag such as "en" or "ta"
    fn detect(&self, text: &str) -> String;
}
