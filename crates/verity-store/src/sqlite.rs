//! SQLite-backed claim store
//!
//! One connection per `SqliteStore`. The database runs in WAL mode so other
//! processes can keep reading while this one appends; within a process the
//! store is shared behind a mutex by its callers.

use crate::error::{Result, StoreError};
use crate::normalize::claim_key;
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::path::Path;
use tracing::{debug, info};
use verity_domain::traits::{ClaimStore, IngestLog, InsertOutcome, QueryLog, SourceReputation};
use verity_domain::{
    current_timestamp, ClaimId, ClaimRecord, IngestRun, IngestStatus, Origin, Provenance,
    QueryLogEntry, UnreliableDomain, Verdict,
};

const PRAGMAS: &str = "
    PRAGMA journal_mode = WAL;
    PRAGMA synchronous = NORMAL;
    PRAGMA busy_timeout = 5000;
";

const CLAIM_COLUMNS: &str = "id, claim, verdict, explanation, source, source_url, embedding, \
                             confidence, origin, language, red_flags, created_at";

/// Aggregate counts over the corpus and the audit tables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusStats {
    /// Records in the corpus
    pub total: usize,
    /// Records ingested from publishers
    pub scraped: usize,
    /// Records learned from reasoner answers
    pub ai_generated: usize,
    /// Record count per source, largest first
    pub by_source: Vec<(String, usize)>,
    /// Record count per verdict, in [`Verdict::ALL`] order
    pub by_verdict: Vec<(Verdict, usize)>,
    /// Queries in the audit log
    pub queries_logged: usize,
}

/// SQLite-based implementation of [`ClaimStore`], [`QueryLog`] and [`IngestLog`]
///
/// # Examples
///
/// ```
/// use verity_domain::traits::ClaimStore;
/// use verity_store::SqliteStore;
///
/// let store = SqliteStore::in_memory().unwrap();
/// assert_eq!(store.count().unwrap(), 0);
/// ```
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a database file
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "Opened claim store");
        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(PRAGMAS)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    /// Corpus and audit statistics
    pub fn stats(&self) -> Result<CorpusStats> {
        let total = self.count_where("SELECT COUNT(*) FROM claims", [])?;
        let scraped = self.count_where(
            "SELECT COUNT(*) FROM claims WHERE origin = ?1",
            [Origin::Scraped.as_str()],
        )?;
        let ai_generated = self.count_where(
            "SELECT COUNT(*) FROM claims WHERE origin = ?1",
            [Origin::AiGenerated.as_str()],
        )?;
        let queries_logged = self.count_where("SELECT COUNT(*) FROM user_queries", [])?;

        let mut stmt = self.conn.prepare(
            "SELECT source, COUNT(*) FROM claims GROUP BY source ORDER BY COUNT(*) DESC, source",
        )?;
        let by_source = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as usize))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut by_verdict = Vec::with_capacity(Verdict::ALL.len());
        for verdict in Verdict::ALL {
            let n = self.count_where(
                "SELECT COUNT(*) FROM claims WHERE verdict = ?1",
                [verdict.as_str()],
            )?;
            by_verdict.push((verdict, n));
        }

        Ok(CorpusStats {
            total,
            scraped,
            ai_generated,
            by_source,
            by_verdict,
            queries_logged,
        })
    }

    /// Most recent ingestion runs, newest first
    pub fn recent_ingest_runs(&self, limit: usize) -> Result<Vec<IngestRun>> {
        let mut stmt = self.conn.prepare(
            "SELECT source, status, fetched, stored, skipped_known, duplicates, errors,
                    started_at, finished_at
             FROM ingest_runs ORDER BY id DESC LIMIT ?1",
        )?;
        let runs = stmt
            .query_map(params![limit as i64], |row| {
                let status: String = row.get(1)?;
                let status = IngestStatus::parse(&status).ok_or_else(|| {
                    conversion_error(1, Type::Text, format!("Unknown ingest status: {}", status))
                })?;
                let errors: String = row.get(6)?;
                let errors: Vec<String> = serde_json::from_str(&errors)
                    .map_err(|e| conversion_error(6, Type::Text, e.to_string()))?;
                Ok(IngestRun {
                    source: row.get(0)?,
                    status,
                    fetched: row.get::<_, i64>(2)? as usize,
                    stored: row.get::<_, i64>(3)? as usize,
                    skipped_known: row.get::<_, i64>(4)? as usize,
                    duplicates: row.get::<_, i64>(5)? as usize,
                    errors,
                    started_at: row.get::<_, i64>(7)? as u64,
                    finished_at: row.get::<_, Option<i64>>(8)?.map(|t| t as u64),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(runs)
    }

    fn count_where<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<usize> {
        let n: i64 = self.conn.query_row(sql, params, |row| row.get(0))?;
        Ok(n as usize)
    }

    fn query_records<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<ClaimRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let records = stmt
            .query_map(params, row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

impl ClaimStore for SqliteStore {
    type Error = StoreError;

    fn insert(&mut self, record: ClaimRecord) -> Result<InsertOutcome> {
        record
            .check_invariants()
            .map_err(StoreError::InvalidRecord)?;

        let key = claim_key(record.key_text());
        let red_flags = serde_json::to_string(&record.red_flags)
            .map_err(|e| StoreError::InvalidData(e.to_string()))?;

        let tx = self.conn.transaction()?;
        let inserted = tx.execute(
            "INSERT INTO claims (id, claim, claim_key, verdict, explanation, source, source_url,
                                 embedding, confidence, origin, language, red_flags, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
             ON CONFLICT(claim_key) DO NOTHING",
            params![
                id_to_bytes(record.id),
                &record.claim,
                &key,
                record.verdict.as_str(),
                &record.explanation,
                &record.provenance.source,
                &record.provenance.source_url,
                encode_embedding(&record.embedding),
                record.confidence,
                record.origin.as_str(),
                &record.language,
                red_flags,
                record.created_at as i64,
            ],
        )?;

        let outcome = if inserted == 1 {
            InsertOutcome::Inserted(record.id)
        } else {
            let existing: Vec<u8> = tx.query_row(
                "SELECT id FROM claims WHERE claim_key = ?1",
                params![&key],
                |row| row.get(0),
            )?;
            InsertOutcome::DuplicateKey(bytes_to_id(&existing)?)
        };
        tx.commit()?;

        debug!(
            id = %outcome.id(),
            origin = %record.origin,
            duplicate_key = matches!(outcome, InsertOutcome::DuplicateKey(_)),
            "Insert claim"
        );
        Ok(outcome)
    }

    fn get(&self, id: ClaimId) -> Result<Option<ClaimRecord>> {
        let sql = format!("SELECT {} FROM claims WHERE id = ?1", CLAIM_COLUMNS);
        let record = self
            .conn
            .query_row(&sql, params![id_to_bytes(id)], row_to_record)
            .optional()?;
        Ok(record)
    }

    fn all(&self) -> Result<Vec<ClaimRecord>> {
        let sql = format!("SELECT {} FROM claims ORDER BY created_at, id", CLAIM_COLUMNS);
        self.query_records(&sql, [])
    }

    fn by_languages(&self, languages: &[String]) -> Result<Vec<ClaimRecord>> {
        if languages.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; languages.len()].join(", ");
        let sql = format!(
            "SELECT {} FROM claims WHERE language IN ({}) ORDER BY created_at, id",
            CLAIM_COLUMNS, placeholders
        );
        self.query_records(&sql, params_from_iter(languages.iter()))
    }

    fn contains_source_url(&self, url: &str) -> Result<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM claims WHERE source_url = ?1)",
            params![url],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn count(&self) -> Result<usize> {
        self.count_where("SELECT COUNT(*) FROM claims", [])
    }
}

impl QueryLog for SqliteStore {
    type Error = StoreError;

    fn record_query(&mut self, entry: &QueryLogEntry) -> Result<()> {
        self.conn.execute(
            "INSERT INTO user_queries (query_text, query_hash, verdict, confidence, tier,
                                       language, matched_id, processing_ms, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                &entry.query,
                claim_key(&entry.query),
                entry.verdict.as_str(),
                entry.confidence,
                entry.tier.as_str(),
                &entry.language,
                entry.matched_id.map(id_to_bytes),
                entry.processing_ms as i64,
                entry.created_at as i64,
            ],
        )?;
        Ok(())
    }
}

impl IngestLog for SqliteStore {
    type Error = StoreError;

    fn record_ingest_run(&mut self, run: &IngestRun) -> Result<()> {
        let errors = serde_json::to_string(&run.errors)
            .map_err(|e| StoreError::InvalidData(e.to_string()))?;
        self.conn.execute(
            "INSERT INTO ingest_runs (source, status, fetched, stored, skipped_known, duplicates,
                                      errors, started_at, finished_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                &run.source,
                run.status.as_str(),
                run.fetched as i64,
                run.stored as i64,
                run.skipped_known as i64,
                run.duplicates as i64,
                errors,
                run.started_at as i64,
                run.finished_at.map(|t| t as i64),
            ],
        )?;
        Ok(())
    }
}

impl SourceReputation for SqliteStore {
    type Error = StoreError;

    fn add_unreliable_domain(&mut self, domain: &UnreliableDomain) -> Result<()> {
        if domain.domain.is_empty() {
            return Err(StoreError::InvalidRecord("domain is empty".to_string()));
        }
        self.conn.execute(
            "INSERT INTO unreliable_domains (domain, category, reason, is_active, created_at)
             VALUES (?1, ?2, ?3, 1, ?4)
             ON CONFLICT(domain) DO UPDATE SET
                 category = excluded.category,
                 reason = excluded.reason,
                 is_active = 1",
            params![
                &domain.domain,
                &domain.category,
                &domain.reason,
                current_timestamp() as i64,
            ],
        )?;
        debug!(domain = %domain.domain, category = %domain.category, "Listed unreliable domain");
        Ok(())
    }

    fn unreliable_domains(&self) -> Result<Vec<UnreliableDomain>> {
        let mut stmt = self.conn.prepare(
            "SELECT domain, category, reason FROM unreliable_domains
             WHERE is_active = 1 ORDER BY domain",
        )?;
        let domains = stmt
            .query_map([], |row| {
                Ok(UnreliableDomain {
                    domain: row.get(0)?,
                    category: row.get(1)?,
                    reason: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(domains)
    }
}

fn id_to_bytes(id: ClaimId) -> Vec<u8> {
    id.value().to_be_bytes().to_vec()
}

fn bytes_to_id(bytes: &[u8]) -> Result<ClaimId> {
    let arr: [u8; 16] = bytes.try_into().map_err(|_| {
        StoreError::InvalidData(format!("Expected 16 bytes for ClaimId, got {}", bytes.len()))
    })?;
    Ok(ClaimId::from_value(u128::from_be_bytes(arr)))
}

fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn decode_embedding(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(StoreError::InvalidData(format!(
            "Embedding blob length {} is not a multiple of 4",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

fn conversion_error(column: usize, ty: Type, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        ty,
        Box::new(StoreError::InvalidData(message)),
    )
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<ClaimRecord> {
    let id_bytes: Vec<u8> = row.get(0)?;
    let id = bytes_to_id(&id_bytes)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Blob, Box::new(e)))?;

    let verdict: String = row.get(2)?;
    let verdict = Verdict::parse(&verdict)
        .ok_or_else(|| conversion_error(2, Type::Text, format!("Unknown verdict: {}", verdict)))?;

    let embedding: Vec<u8> = row.get(6)?;
    let embedding = decode_embedding(&embedding)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Blob, Box::new(e)))?;

    let origin: String = row.get(8)?;
    let origin = Origin::parse(&origin)
        .ok_or_else(|| conversion_error(8, Type::Text, format!("Unknown origin: {}", origin)))?;

    let red_flags: String = row.get(10)?;
    let red_flags: Vec<String> = serde_json::from_str(&red_flags)
        .map_err(|e| conversion_error(10, Type::Text, e.to_string()))?;

    Ok(ClaimRecord {
        id,
        claim: row.get(1)?,
        verdict,
        explanation: row.get(3)?,
        provenance: Provenance::new(row.get::<_, String>(4)?, row.get(5)?),
        embedding,
        confidence: row.get(7)?,
        origin,
        language: row.get(9)?,
        red_flags,
        created_at: row.get::<_, i64>(11)? as u64,
        key_text: None,
    })
}
