//! In-memory vector store implementation.
//!
//! Useful for testing and small datasets.

use super::{cosine_similarity, source_matches, Passage, SearchResult, SourceSummary, VectorStore};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory vector store.
pub struct MemoryVectorStore {
    passages: RwLock<HashMap<String, Passage>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            passages: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert(&self, passage: &Passage) -> Result<()> {
        let mut passages = self.passages.write().unwrap();
        passages.insert(passage.id.to_string(), passage.clone());
        Ok(())
    }

    async fn upsert_batch(&self, passages: &[Passage]) -> Result<usize> {
        let mut store = self.passages.write().unwrap();
        for passage in passages {
            store.insert(passage.id.to_string(), passage.clone());
        }
        Ok(passages.len())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
        sources: Option<&[String]>,
    ) -> Result<Vec<SearchResult>> {
        let passages = self.passages.read().unwrap();

        let mut results: Vec<SearchResult> = passages
            .values()
            .filter(|p| source_matches(&p.source, sources))
            .map(|passage| {
                let score = cosine_similarity(query_embedding, &passage.embedding);
                SearchResult {
                    passage: passage.clone(),
                    score,
                }
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);

        Ok(results)
    }

    async fn delete_by_source(&self, source: &str) -> Result<usize> {
        let mut passages = self.passages.write().unwrap();
        let initial_len = passages.len();
        passages.retain(|_, p| p.source != source);
        Ok(initial_len - passages.len())
    }

    async fn list_sources(&self) -> Result<Vec<SourceSummary>> {
        let passages = self.passages.read().unwrap();

        let mut source_map: HashMap<String, SourceSummary> = HashMap::new();

        for passage in passages.values() {
            let entry = source_map
                .entry(passage.source.clone())
                .or_insert_with(|| SourceSummary {
                    source: passage.source.clone(),
                    passage_count: 0,
                    indexed_at: passage.indexed_at,
                });

            entry.passage_count += 1;
            if passage.indexed_at > entry.indexed_at {
                entry.indexed_at = passage.indexed_at;
            }
        }

        let mut sources: Vec<SourceSummary> = source_map.into_values().collect();
        sources.sort_by(|a, b| b.indexed_at.cmp(&a.indexed_at));

        Ok(sources)
    }

    async fn passage_count(&self) -> Result<usize> {
        let passages = self.passages.read().unwrap();
        Ok(passages.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_vector_store() {
        let store = MemoryVectorStore::new();

        let p1 = Passage::new(
            "guide".to_string(),
            Some("Intro".to_string()),
            "Hello world".to_string(),
            vec![1.0, 0.0, 0.0],
        );

        let p2 = Passage::new(
            "guide".to_string(),
            None,
            "Goodbye world".to_string(),
            vec![0.0, 1.0, 0.0],
        );

        store.upsert_batch(&[p1, p2]).await.unwrap();

        assert_eq!(store.passage_count().await.unwrap(), 2);

        let results = store.search(&[1.0, 0.0, 0.0], 10, None).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].score > results[1].score);

        let sources = store.list_sources().await.unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].passage_count, 2);
    }

    #[tokio::test]
    async fn test_memory_source_filter() {
        let store = MemoryVectorStore::new();

        let p1 = Passage::new(
            "guide".to_string(),
            None,
            "Ownership rules".to_string(),
            vec![1.0, 0.0, 0.0],
        );
        let p2 = Passage::new(
            "faq".to_string(),
            None,
            "Borrow checker".to_string(),
            vec![0.9, 0.1, 0.0],
        );

        store.upsert_batch(&[p1, p2]).await.unwrap();

        let filter = vec!["faq".to_string()];
        let results = store
            .search(&[1.0, 0.0, 0.0], 10, Some(&filter))
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].passage.source, "faq");

        let deleted = store.delete_by_source("guide").await.unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(store.passage_count().await.unwrap(), 1);
    }
}
