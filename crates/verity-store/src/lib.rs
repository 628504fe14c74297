//! Verity Storage Layer
//!
//! Implements the [`ClaimStore`](verity_domain::traits::ClaimStore) trait on
//! SQLite, plus the pieces of the query path that operate on stored data.
//!
//! # Architecture
//!
//! - SQLite for claim records and the audit tables (WAL mode)
//! - A UNIQUE natural key (BLAKE3 of normalized claim text) so two writers
//!   can never append the same claim
//! - Local term-hash embeddings, no network dependency
//! - Exact cosine scan as the similarity index
//!
//! # Examples
//!
//! ```
//! use verity_domain::traits::{ClaimStore, Embedder};
//! use verity_domain::{ClaimRecord, Provenance, Verdict};
//! use verity_store::{similarity, SqliteStore, TermHashEmbedder};
//!
//! let embedder = TermHashEmbedder::default();
//! let mut store = SqliteStore::in_memory().unwrap();
//!
//! let text = "PM announced free electricity";
//! let record = ClaimRecord::scraped(
//!     text,
//!     Verdict::False,
//!     Provenance::new("AltNews", None),
//!     "en",
//!     embedder.embed(text, Some("en")).unwrap(),
//! );
//! store.insert(record).unwrap();
//!
//! let query = embedder.embed("PM announced free electricity!", None).unwrap();
//! let best = similarity::best_match(&query, &store.all().unwrap()).unwrap();
//! assert!(best.similarity > 0.99);
//! ```

#![warn(missing_docs)]

pub mod embedding;
pub mod error;
pub mod normalize;
pub mod similarity;
pub mod sqlite;

pub use embedding::{cosine_similarity, EmbeddingError, TermHashEmbedder};
pub use error::StoreError;
pub use normalize::{claim_key, normalize_claim_text};
pub use similarity::{best_match, nearest_matches};
pub use sqlite::{CorpusStats, SqliteStore};
