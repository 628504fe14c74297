//! Similarity index over a corpus snapshot
//!
//! An exact scan: every record is scored against the query, so results are
//! deterministic and independent of insertion history. The index applies no
//! threshold; callers decide what similarity counts as a match.

use crate::embedding::cosine_similarity;
use std::cmp::Ordering;
use tracing::debug;
use verity_domain::{ClaimRecord, MatchResult};

/// Up to `top_k` records most similar to `query`
///
/// Ordered by similarity descending; equal similarities keep creation order
/// (earlier `created_at`, then lower id, first). Similarity is cosine
/// similarity clamped to [0, 1]. Records whose embedding length differs
/// from the query's are skipped.
pub fn nearest_matches(query: &[f32], corpus: &[ClaimRecord], top_k: usize) -> Vec<MatchResult> {
    if top_k == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(f64, &ClaimRecord)> = corpus
        .iter()
        .filter_map(|record| match cosine_similarity(query, &record.embedding) {
            Some(similarity) if similarity.is_finite() => {
                Some((similarity.clamp(0.0, 1.0), record))
            }
            Some(_) => {
                debug!(record_id = %record.id, "Skipping record with non-finite similarity");
                None
            }
            None => {
                debug!(
                    record_id = %record.id,
                    expected = query.len(),
                    found = record.embedding.len(),
                    "Skipping record with mismatched embedding dimension"
                );
                None
            }
        })
        .collect();

    scored.sort_by(|(sim_a, rec_a), (sim_b, rec_b)| {
        sim_b
            .partial_cmp(sim_a)
            .unwrap_or(Ordering::Equal)
            .then_with(|| rec_a.creation_order().cmp(&rec_b.creation_order()))
    });

    scored
        .into_iter()
        .take(top_k)
        .map(|(similarity, record)| MatchResult {
            record: record.clone(),
            similarity,
        })
        .collect()
}

/// The single most similar record, if any
pub fn best_match(query: &[f32], corpus: &[ClaimRecord]) -> Option<MatchResult> {
    nearest_matches(query, corpus, 1).into_iter().next()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use verity_domain::{Provenance, Verdict};

    fn arb_vector() -> impl Strategy<Value = Vec<f32>> {
        prop::collection::vec(-1.0f32..1.0, 4)
    }

    proptest! {
        /// Property: results are sorted and every similarity lies in [0, 1]
        #[test]
        fn test_results_sorted_and_bounded(
            query in arb_vector(),
            vectors in prop::collection::vec(arb_vector(), 0..20),
        ) {
            let corpus: Vec<ClaimRecord> = vectors
                .into_iter()
                .enumerate()
                .map(|(i, v)| {
                    ClaimRecord::scraped("c", Verdict::True, Provenance::new("p", None), "en", v)
                        .with_created_at(i as u64)
                })
                .collect();

            let matches = nearest_matches(&query, &corpus, corpus.len());
            prop_assert_eq!(matches.len(), corpus.len());
            for pair in matches.windows(2) {
                prop_assert!(pair[0].similarity >= pair[1].similarity);
            }
            for m in &matches {
                prop_assert!((0.0..=1.0).contains(&m.similarity));
            }
        }

        /// Property: the query is deterministic over an unchanged corpus
        #[test]
        fn test_repeatable(
            query in arb_vector(),
            vectors in prop::collection::vec(arb_vector(), 1..10),
        ) {
            let corpus: Vec<ClaimRecord> = vectors
                .into_iter()
                .map(|v| {
                    ClaimRecord::scraped("c", Verdict::True, Provenance::new("p", None), "en", v)
                })
                .collect();
            let ids = || -> Vec<_> {
                nearest_matches(&query, &corpus, 3)
                    .into_iter()
                    .map(|m| m.record.id)
                    .collect()
            };
            let (first, second) = (ids(), ids());
            prop_assert_eq!(first, second);
        }
    }
}
