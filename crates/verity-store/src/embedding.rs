//! Embedding models for text vectorization
//!
//! Embeddings are computed locally so the query path never depends on a
//! network service. [`TermHashEmbedder`] hashes word unigrams and bigrams
//! into a fixed number of buckets: texts sharing vocabulary land close
//! together, identical texts produce identical vectors, and the result is a
//! pure function of the text and the dimension.
//!
//! # Examples
//!
//! ```rust
//! use verity_domain::traits::Embedder;
//! use verity_store::embedding::TermHashEmbedder;
//!
//! let model = TermHashEmbedder::new(256);
//! let a = model.embed("The sky is blue", None).unwrap();
//! let b = model.embed("The sky is blue", None).unwrap();
//! assert_eq!(a.len(), 256);
//! assert_eq!(a, b);
//! ```

use std::collections::HashMap;
use thiserror::Error;
use verity_domain::traits::Embedder;

/// Default embedding dimension
pub const DEFAULT_DIMENSION: usize = 384;

/// Errors that can occur during embedding generation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmbeddingError {
    /// Invalid input text
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model inference error
    #[error("Model inference failed: {0}")]
    InferenceFailed(String),
}

/// Deterministic term-hashing embedder
///
/// Each unigram contributes weight 1.0 to its FNV-1a bucket, each bigram
/// 0.5; the vector is L2-normalized. Text with no alphanumeric terms is
/// rejected rather than mapped to a zero vector.
#[derive(Debug, Clone)]
pub struct TermHashEmbedder {
    dimension: usize,
    version: String,
}

impl TermHashEmbedder {
    /// Create an embedder producing vectors of `dimension` components
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
            version: format!("term-hash-v1-{}", dimension.max(1)),
        }
    }

    fn bucket(term: &str, dimension: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h % dimension as u64) as usize
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase())
            .collect()
    }
}

impl Default for TermHashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl Embedder for TermHashEmbedder {
    type Error = EmbeddingError;

    fn embed(&self, text: &str, _language_hint: Option<&str>) -> Result<Vec<f32>, Self::Error> {
        let tokens = Self::tokenize(text);
        if tokens.is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "Text has no terms to embed".to_string(),
            ));
        }

        let mut weights: HashMap<usize, f32> = HashMap::new();
        for token in &tokens {
            *weights.entry(Self::bucket(token, self.dimension)).or_default() += 1.0;
        }
        for pair in tokens.windows(2) {
            let bigram = format!("{} {}", pair[0], pair[1]);
            *weights.entry(Self::bucket(&bigram, self.dimension)).or_default() += 0.5;
        }

        let mut vector = vec![0.0f32; self.dimension];
        for (bucket, weight) in weights {
            vector[bucket] = weight;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm <= f32::EPSILON {
            return Err(EmbeddingError::InferenceFailed(
                "Embedding collapsed to zero".to_string(),
            ));
        }
        for value in &mut vector {
            *value /= norm;
        }

        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_version(&self) -> &str {
        &self.version
    }
}

/// Cosine similarity between two embedding vectors
///
/// Returns `None` when the vectors have different lengths or are empty,
/// and `Some(0.0)` when either has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Some(0.0);
    }

    Some(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_deterministic() {
        let model = TermHashEmbedder::new(384);
        let text = "The quick brown fox jumps over the lazy dog";
        assert_eq!(model.embed(text, None).unwrap(), model.embed(text, None).unwrap());
    }

    #[test]
    fn test_embedding_dimension() {
        let model = TermHashEmbedder::new(128);
        assert_eq!(model.embed("test", None).unwrap().len(), 128);
        assert_eq!(model.dimension(), 128);
        assert_eq!(model.model_version(), "term-hash-v1-128");
    }

    #[test]
    fn test_embedding_normalized() {
        let model = TermHashEmbedder::default();
        let embedding = model.embed("test text", Some("en")).unwrap();
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_embedding_rejects_termless_text() {
        let model = TermHashEmbedder::default();
        assert!(model.embed("", None).is_err());
        assert!(model.embed("  ?! ", None).is_err());
    }

    #[test]
    fn test_shared_vocabulary_scores_higher() {
        let model = TermHashEmbedder::default();
        let a = model.embed("PM announced free electricity", None).unwrap();
        let b = model.embed("PM announced free electricity for everyone", None).unwrap();
        let c = model.embed("Vaccine causes infertility in women", None).unwrap();

        let close = cosine_similarity(&a, &b).unwrap();
        let far = cosine_similarity(&a, &c).unwrap();
        assert!(close > far);
        assert!(close > 0.7);
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let model = TermHashEmbedder::default();
        let a = model.embed("Free electricity!", None).unwrap();
        let b = model.embed("free ELECTRICITY", None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_cosine_similarity_basics() {
        let x = vec![1.0, 0.0, 0.0];
        let y = vec![0.0, 1.0, 0.0];
        let neg = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&x, &x).unwrap() - 1.0).abs() < 1e-9);
        assert!(cosine_similarity(&x, &y).unwrap().abs() < 1e-9);
        assert!((cosine_similarity(&x, &neg).unwrap() + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_similarity_mismatch_and_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), None);
        assert_eq!(cosine_similarity(&[], &[]), None);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), Some(0.0));
    }
}
