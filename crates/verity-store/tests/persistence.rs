//! On-disk store behaviour: reopening, concurrent writers, embeddings end to end

use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;
use verity_domain::traits::{ClaimStore, Embedder, InsertOutcome};
use verity_domain::{ClaimRecord, Provenance, Verdict};
use verity_store::{best_match, SqliteStore, TermHashEmbedder};

fn record(embedder: &TermHashEmbedder, text: &str) -> ClaimRecord {
    ClaimRecord::scraped(
        text,
        Verdict::Misleading,
        Provenance::new("Boom Live", Some(format!("https://boom.example/{}", text.len()))),
        "en",
        embedder.embed(text, Some("en")).unwrap(),
    )
}

#[test]
fn test_records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("verity.db");
    let embedder = TermHashEmbedder::default();
    let stored = record(&embedder, "Old video shows recent flood");

    {
        let mut store = SqliteStore::new(&path).unwrap();
        store.insert(stored.clone()).unwrap();
    }

    let store = SqliteStore::new(&path).unwrap();
    assert_eq!(store.count().unwrap(), 1);
    assert_eq!(store.get(stored.id).unwrap(), Some(stored));
}

#[test]
fn test_concurrent_writers_cannot_duplicate_a_claim() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("verity.db");
    SqliteStore::new(&path).unwrap();

    let writers = 4;
    let barrier = Arc::new(Barrier::new(writers));
    let handles: Vec<_> = (0..writers)
        .map(|i| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let embedder = TermHashEmbedder::default();
                let mut store = SqliteStore::new(&path).unwrap();
                // Same claim, different surface forms
                let text = if i % 2 == 0 {
                    "Government bans cash withdrawals"
                } else {
                    "government bans CASH withdrawals."
                };
                barrier.wait();
                store.insert(record(&embedder, text)).unwrap()
            })
        })
        .collect();

    let outcomes: Vec<InsertOutcome> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let inserted = outcomes
        .iter()
        .filter(|o| matches!(o, InsertOutcome::Inserted(_)))
        .count();
    assert_eq!(inserted, 1);

    let store = SqliteStore::new(&path).unwrap();
    assert_eq!(store.count().unwrap(), 1);
    let winner = store.all().unwrap()[0].id;
    assert!(outcomes.iter().all(|o| o.id() == winner));
}

#[test]
fn test_lookup_through_embeddings() {
    let embedder = TermHashEmbedder::default();
    let mut store = SqliteStore::in_memory().unwrap();
    for text in [
        "Old video shows recent flood in Chennai",
        "Vaccine contains microchips",
        "New currency notes have GPS chips",
    ] {
        store.insert(record(&embedder, text)).unwrap();
    }

    let query = embedder
        .embed("new currency notes have gps chips", None)
        .unwrap();
    let best = best_match(&query, &store.all().unwrap()).unwrap();
    assert_eq!(best.record.claim, "New currency notes have GPS chips");
    assert!(best.similarity > 0.99);
}
