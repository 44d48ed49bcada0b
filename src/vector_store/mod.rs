//! Vector store abstraction for Verktoy.
//!
//! Provides a trait-based interface for different vector database backends.

mod memory;
mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A passage stored in the vector database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    /// Unique passage ID.
    pub id: Uuid,
    /// Source this passage belongs to (e.g., a document or dataset name).
    pub source: String,
    /// Optional title of the passage.
    pub title: Option<String>,
    /// Text content of this passage.
    pub content: String,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// When this passage was indexed.
    pub indexed_at: DateTime<Utc>,
}

impl Passage {
    /// Create a new passage.
    pub fn new(source: String, title: Option<String>, content: String, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            title,
            content,
            embedding,
            indexed_at: Utc::now(),
        }
    }
}

/// A search result with score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched passage.
    pub passage: Passage,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Summary information about an indexed source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSummary {
    /// Source name.
    pub source: String,
    /// Number of indexed passages.
    pub passage_count: u32,
    /// When the source was last indexed.
    pub indexed_at: DateTime<Utc>,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Store a passage with its embedding.
    async fn upsert(&self, passage: &Passage) -> Result<()>;

    /// Bulk upsert passages.
    async fn upsert_batch(&self, passages: &[Passage]) -> Result<usize>;

    /// Search for similar passages, optionally restricted to a set of sources.
    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
        sources: Option<&[String]>,
    ) -> Result<Vec<SearchResult>>;

    /// Delete passages by source.
    async fn delete_by_source(&self, source: &str) -> Result<usize>;

    /// List all indexed sources.
    async fn list_sources(&self) -> Result<Vec<SourceSummary>>;

    /// Get total passage count.
    async fn passage_count(&self) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Check whether a passage's source matches an optional filter.
pub(crate) fn source_matches(source: &str, filter: Option<&[String]>) -> bool {
    match filter {
        Some(sources) => sources.iter().any(|s| s == source),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_source_matches() {
        assert!(source_matches("guide", None));
        assert!(source_matches("guide", Some(&["guide".to_string()])));
        assert!(!source_matches("guide", Some(&["other".to_string()])));
        assert!(!source_matches("guide", Some(&[])));
    }
}
