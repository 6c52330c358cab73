//! SQLite-backed chunk store
//!
//! Chunks are rows keyed by `(collection, id)`; embeddings are little-endian
//! f32 blobs. Similarity search is a linear cosine scan over one company's
//! chunks.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use tokio::sync::Mutex;

use super::error::{StoreError, StoreResult};
use super::types::{bytes_to_embedding, cosine_similarity, embedding_to_bytes, Chunk, ScoredChunk};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS chunks (
    collection  TEXT NOT NULL,
    id          TEXT NOT NULL,
    company     TEXT NOT NULL,
    source      TEXT NOT NULL,
    chunk_index INTEGER NOT NULL,
    text        TEXT NOT NULL,
    embedding   BLOB NOT NULL,
    ingested_at TEXT NOT NULL,
    PRIMARY KEY (collection, id)
);
CREATE INDEX IF NOT EXISTS idx_chunks_company ON chunks(collection, company);
";

/// Store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the database file
    pub data_dir: PathBuf,
    /// Logical collection name; several collections can share a file
    pub collection: String,
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>, collection: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            collection: collection.into(),
        }
    }

    /// Path of the SQLite database file
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("peerlens.db")
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new("db", "steel_reports_v2")
    }
}

/// Persistent store of embedded report chunks
pub struct ChunkStore {
    conn: Mutex<Connection>,
    collection: String,
}

impl ChunkStore {
    /// Open (or create) the store described by `config`
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        std::fs::create_dir_all(&config.data_dir)?;
        let conn = Connection::open(config.db_path())?;
        Self::with_connection(conn, &config.collection)
    }

    /// Open an existing store without creating the data directory.
    ///
    /// Used by the server, which must not invent an empty database when
    /// ingest has never run.
    pub fn open_existing(config: &StoreConfig) -> StoreResult<Self> {
        let path = config.db_path();
        if !path.exists() {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )));
        }
        let conn = Connection::open(path)?;
        Self::with_connection(conn, &config.collection)
    }

    /// Open a throwaway in-memory store
    pub fn open_in_memory(collection: &str) -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?, collection)
    }

    fn with_connection(conn: Connection, collection: &str) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            collection: collection.to_string(),
        })
    }

    /// Collection this store reads and writes
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Insert chunks, replacing any with the same id
    pub async fn upsert(&self, chunks: &[Chunk]) -> StoreResult<usize> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO chunks
                     (collection, id, company, source, chunk_index, text, embedding, ingested_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for chunk in chunks {
                stmt.execute(params![
                    self.collection,
                    chunk.id,
                    chunk.company,
                    chunk.source,
                    chunk.chunk_index as i64,
                    chunk.text,
                    embedding_to_bytes(&chunk.embedding),
                    chunk.ingested_at.to_rfc3339(),
                ])?;
            }
        }
        tx.commit()?;

        tracing::debug!(collection = %self.collection, count = chunks.len(), "Upserted chunks");
        Ok(chunks.len())
    }

    /// Sorted, distinct company names in the collection
    pub async fn companies(&self) -> StoreResult<Vec<String>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT company FROM chunks WHERE collection = ?1 ORDER BY company",
        )?;
        let companies = stmt
            .query_map(params![self.collection], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(companies)
    }

    /// The `n` chunks of `company` most similar to `embedding`, best first
    pub async fn query(
        &self,
        embedding: &[f32],
        company: &str,
        n: usize,
    ) -> StoreResult<Vec<ScoredChunk>> {
        let rows: Vec<(String, String, String, String, Vec<u8>)> = {
            let conn = self.conn.lock().await;
            let mut stmt = conn.prepare(
                "SELECT id, company, source, text, embedding
                 FROM chunks WHERE collection = ?1 AND company = ?2",
            )?;
            let rows = stmt
                .query_map(params![self.collection, company], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        let mut scored = Vec::with_capacity(rows.len());
        for (id, company, source, text, blob) in rows {
            let stored = bytes_to_embedding(&blob).ok_or_else(|| StoreError::CorruptEmbedding(id.clone()))?;
            if stored.len() != embedding.len() {
                return Err(StoreError::DimensionMismatch {
                    expected: stored.len(),
                    actual: embedding.len(),
                });
            }
            let score = cosine_similarity(embedding, &stored);
            scored.push(ScoredChunk {
                id,
                company,
                source,
                text,
                score,
            });
        }

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(n);
        Ok(scored)
    }

    /// Look up a single chunk by id
    pub async fn get(&self, id: &str) -> StoreResult<Option<Chunk>> {
        let conn = self.conn.lock().await;
        let row = conn
            .query_row(
                "SELECT id, company, source, chunk_index, text, embedding, ingested_at
                 FROM chunks WHERE collection = ?1 AND id = ?2",
                params![self.collection, id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, Vec<u8>>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, company, source, chunk_index, text, blob, ingested_at)) = row else {
            return Ok(None);
        };

        let embedding = bytes_to_embedding(&blob).ok_or_else(|| StoreError::CorruptEmbedding(id.clone()))?;
        let ingested_at = match chrono::DateTime::parse_from_rfc3339(&ingested_at) {
            Ok(dt) => dt.with_timezone(&chrono::Utc),
            Err(_) => {
                return Err(StoreError::CorruptTimestamp {
                    id,
                    value: ingested_at,
                })
            }
        };

        Ok(Some(Chunk {
            id,
            company,
            source,
            chunk_index: chunk_index as usize,
            text,
            embedding,
            ingested_at,
        }))
    }

    /// Total number of chunks in the collection
    pub async fn count(&self) -> StoreResult<usize> {
        let conn = self.conn.lock().await;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM chunks WHERE collection = ?1",
            params![self.collection],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Number of distinct companies in the collection
    pub async fn company_count(&self) -> StoreResult<usize> {
        let conn = self.conn.lock().await;
        let count: i64 = conn.query_row(
            "SELECT COUNT(DISTINCT company) FROM chunks WHERE collection = ?1",
            params![self.collection],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

/// Check whether a database file exists for `config`
pub fn store_exists(config: &StoreConfig) -> bool {
    config.db_path().exists()
}
