//! SQLite-based vector store implementation.
//!
//! Uses SQLite with cosine similarity computed in Rust for simplicity.
//! For production use cases with large datasets, consider using sqlite-vec extension
//! or a dedicated vector database.

use super::{cosine_similarity, source_matches, Passage, SearchResult, SourceSummary, VectorStore};
use crate::error::{Result, VerktoyError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS passages (
    id TEXT PRIMARY KEY,
    source TEXT NOT NULL,
    title TEXT,
    content TEXT NOT NULL,
    embedding BLOB NOT NULL,
    indexed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_passages_source ON passages(source);
CREATE INDEX IF NOT EXISTS idx_passages_indexed_at ON passages(indexed_at);
"#;

/// SQLite-based vector store.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
}

impl SqliteVectorStore {
    /// Create a new SQLite vector store.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrent performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite vector store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite vector store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    fn row_to_passage(row: &rusqlite::Row<'_>) -> rusqlite::Result<Passage> {
        let id_str: String = row.get(0)?;
        let embedding_bytes: Vec<u8> = row.get(4)?;
        let indexed_at_str: String = row.get(5)?;

        Ok(Passage {
            id: uuid::Uuid::parse_str(&id_str).unwrap_or_default(),
            source: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            embedding: Self::bytes_to_embedding(&embedding_bytes),
            indexed_at: DateTime::parse_from_rfc3339(&indexed_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self, passage))]
    async fn upsert(&self, passage: &Passage) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| VerktoyError::VectorStore(format!("Failed to acquire lock: {}", e)))?;

        let embedding_bytes = Self::embedding_to_bytes(&passage.embedding);

        conn.execute(
            r#"
            INSERT OR REPLACE INTO passages
            (id, source, title, content, embedding, indexed_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                passage.id.to_string(),
                passage.source,
                passage.title,
                passage.content,
                embedding_bytes,
                passage.indexed_at.to_rfc3339(),
            ],
        )?;

        debug!("Upserted passage {}", passage.id);
        Ok(())
    }

    #[instrument(skip(self, passages))]
    async fn upsert_batch(&self, passages: &[Passage]) -> Result<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| VerktoyError::VectorStore(format!("Failed to acquire lock: {}", e)))?;

        let tx = conn.unchecked_transaction()?;

        for passage in passages {
            let embedding_bytes = Self::embedding_to_bytes(&passage.embedding);

            tx.execute(
                r#"
                INSERT OR REPLACE INTO passages
                (id, source, title, content, embedding, indexed_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    passage.id.to_string(),
                    passage.source,
                    passage.title,
                    passage.content,
                    embedding_bytes,
                    passage.indexed_at.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;
        info!("Batch upserted {} passages", passages.len());
        Ok(passages.len())
    }

    #[instrument(skip(self, query_embedding))]
    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
        sources: Option<&[String]>,
    ) -> Result<Vec<SearchResult>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| VerktoyError::VectorStore(format!("Failed to acquire lock: {}", e)))?;

        let mut stmt = conn.prepare(
            "SELECT id, source, title, content, embedding, indexed_at FROM passages",
        )?;

        let passages = stmt.query_map([], Self::row_to_passage)?;

        let mut results: Vec<SearchResult> = passages
            .filter_map(|p| p.ok())
            .filter(|p| source_matches(&p.source, sources))
            .map(|passage| {
                let score = cosine_similarity(query_embedding, &passage.embedding);
                SearchResult { passage, score }
            })
            .collect();

        // Sort by score descending
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);

        debug!("Found {} matching passages", results.len());
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn delete_by_source(&self, source: &str) -> Result<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| VerktoyError::VectorStore(format!("Failed to acquire lock: {}", e)))?;

        let deleted = conn.execute("DELETE FROM passages WHERE source = ?1", params![source])?;

        info!("Deleted {} passages for source {}", deleted, source);
        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn list_sources(&self) -> Result<Vec<SourceSummary>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| VerktoyError::VectorStore(format!("Failed to acquire lock: {}", e)))?;

        let mut stmt = conn.prepare(
            r#"
            SELECT source, COUNT(*) as passage_count, MAX(indexed_at) as indexed_at
            FROM passages
            GROUP BY source
            ORDER BY indexed_at DESC
            "#,
        )?;

        let sources = stmt.query_map([], |row| {
            let indexed_at_str: String = row.get(2)?;
            Ok(SourceSummary {
                source: row.get(0)?,
                passage_count: row.get(1)?,
                indexed_at: DateTime::parse_from_rfc3339(&indexed_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            })
        })?;

        let result: Vec<SourceSummary> = sources.filter_map(|s| s.ok()).collect();
        Ok(result)
    }

    async fn passage_count(&self) -> Result<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| VerktoyError::VectorStore(format!("Failed to acquire lock: {}", e)))?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM passages", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sqlite_vector_store() {
        let store = SqliteVectorStore::in_memory().unwrap();

        let passage = Passage::new(
            "guide".to_string(),
            Some("Section 1".to_string()),
            "This is test content".to_string(),
            vec![1.0, 0.0, 0.0],
        );

        store.upsert(&passage).await.unwrap();

        let sources = store.list_sources().await.unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].source, "guide");

        let results = store.search(&[1.0, 0.0, 0.0], 10, None).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!((results[0].score - 1.0).abs() < 0.001);

        let deleted = store.delete_by_source("guide").await.unwrap();
        assert_eq!(deleted, 1);

        let sources = store.list_sources().await.unwrap();
        assert!(sources.is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_store_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("passages.db");

        {
            let store = SqliteVectorStore::new(&path).unwrap();
            let passage = Passage::new(
                "notes".to_string(),
                None,
                "Persisted content".to_string(),
                vec![0.0, 1.0],
            );
            store.upsert(&passage).await.unwrap();
        }

        let store = SqliteVectorStore::new(&path).unwrap();
        assert_eq!(store.passage_count().await.unwrap(), 1);

        let results = store.search(&[0.0, 1.0], 5, None).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].passage.content, "Persisted content");
    }

    #[tokio::test]
    async fn test_sqlite_source_filter() {
        let store = SqliteVectorStore::in_memory().unwrap();

        let p1 = Passage::new("a".to_string(), None, "one".to_string(), vec![1.0, 0.0]);
        let p2 = Passage::new("b".to_string(), None, "two".to_string(), vec![1.0, 0.0]);
        store.upsert_batch(&[p1, p2]).await.unwrap();

        let filter = vec!["b".to_string()];
        let results = store.search(&[1.0, 0.0], 10, Some(&filter)).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].passage.source, "b");
    }
}
