//! Semantic retrieval tool over a vector store.

use super::schema::{InputSchema, ParamType, ToolArgs};
use super::{Tool, ToolOutput};
use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::VectorStore;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Default number of passages returned per query.
pub const DEFAULT_TOP_K: usize = 5;

/// Fixed response when no passages match.
pub const NO_DOCUMENTS_MESSAGE: &str =
    "No documents found matching your query. Try a broader query or remove the source filter.";

/// Separator marker emitted before each retrieved passage.
pub const DOCUMENT_SEPARATOR: &str = "===== Document";

/// Tool that retrieves passages from the knowledge base by semantic similarity.
pub struct RetrieverTool {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    schema: InputSchema,
    description: String,
    top_k: usize,
}

impl RetrieverTool {
    /// Create a retriever over the given store and embedder.
    ///
    /// `known_sources` is advertised in the tool description so the
    /// orchestrating model knows which filter values are valid.
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        known_sources: Vec<String>,
    ) -> Self {
        let mut description = "Retrieves the passages from the knowledge base that are most \
             relevant to the query, using semantic similarity."
            .to_string();
        if !known_sources.is_empty() {
            description.push_str(&format!(
                " The 'sources' filter accepts values from: {}.",
                known_sources.join(", ")
            ));
        }

        let schema = InputSchema::new()
            .required(
                "query",
                ParamType::String,
                "The query to search for. Use an affirmative statement rather than a question.",
            )
            .optional(
                "sources",
                ParamType::StringList,
                "Restrict the search to these source names.",
            );

        Self {
            store,
            embedder,
            schema,
            description,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Set the number of passages returned per query.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }
}

#[async_trait]
impl Tool for RetrieverTool {
    fn name(&self) -> &str {
        "retriever"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn schema(&self) -> &InputSchema {
        &self.schema
    }

    async fn invoke(&self, args: ToolArgs) -> Result<ToolOutput> {
        let query = args.str("query")?;
        let sources = args.str_list("sources");

        let embedding = self.embedder.embed(query).await?;
        let results = self.store.search(&embedding, self.top_k, sources).await?;

        debug!("Retrieved {} passages for query", results.len());

        if results.is_empty() {
            return Ok(ToolOutput::Text(NO_DOCUMENTS_MESSAGE.to_string()));
        }

        let formatted = results
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{} {} =====\n{}", DOCUMENT_SEPARATOR, i, r.passage.content))
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(ToolOutput::Text(format!("Retrieved documents:\n{}", formatted)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolRegistry;
    use crate::vector_store::{MemoryVectorStore, Passage};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic embedder for tests; counts how often it is called.
    struct StubEmbedder {
        calls: AtomicUsize,
    }

    impl StubEmbedder {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![1.0, 0.0, 0.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut out = Vec::with_capacity(texts.len());
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }

        fn dimensions(&self) -> usize {
            3
        }
    }

    async fn seeded_store() -> Arc<MemoryVectorStore> {
        let store = Arc::new(MemoryVectorStore::new());
        let passages = vec![
            Passage::new(
                "guide".to_string(),
                None,
                "Ownership moves values between bindings".to_string(),
                vec![1.0, 0.0, 0.0],
            ),
            Passage::new(
                "guide".to_string(),
                None,
                "Borrows are checked at compile time".to_string(),
                vec![0.9, 0.1, 0.0],
            ),
            Passage::new(
                "faq".to_string(),
                None,
                "Lifetimes name borrow scopes".to_string(),
                vec![0.8, 0.2, 0.0],
            ),
        ];
        store.upsert_batch(&passages).await.unwrap();
        store
    }

    fn count_blocks(text: &str) -> usize {
        text.matches(DOCUMENT_SEPARATOR).count()
    }

    #[tokio::test]
    async fn test_empty_store_returns_fixed_message() {
        let store = Arc::new(MemoryVectorStore::new());
        let embedder = Arc::new(StubEmbedder::new());
        let tool = RetrieverTool::new(store, embedder, vec![]);

        let args = tool.schema().validate(&json!({"query": "anything"})).unwrap();
        let output = tool.invoke(args).await.unwrap();
        assert_eq!(output.render(), NO_DOCUMENTS_MESSAGE);
    }

    #[tokio::test]
    async fn test_top_k_bounds_block_count() {
        let store = seeded_store().await;
        let embedder = Arc::new(StubEmbedder::new());
        let tool = RetrieverTool::new(store, embedder, vec![]).with_top_k(2);

        let args = tool.schema().validate(&json!({"query": "ownership"})).unwrap();
        let output = tool.invoke(args).await.unwrap();
        assert_eq!(count_blocks(&output.render()), 2);
    }

    #[tokio::test]
    async fn test_top_k_bounded_by_available_matches() {
        let store = seeded_store().await;
        let embedder = Arc::new(StubEmbedder::new());
        let tool = RetrieverTool::new(store, embedder, vec![]).with_top_k(10);

        let args = tool.schema().validate(&json!({"query": "ownership"})).unwrap();
        let output = tool.invoke(args).await.unwrap();
        assert_eq!(count_blocks(&output.render()), 3);
    }

    #[tokio::test]
    async fn test_scalar_filter_equals_list_filter() {
        let store = seeded_store().await;
        let embedder = Arc::new(StubEmbedder::new());
        let tool = RetrieverTool::new(store, embedder, vec![]);

        let scalar_args = tool
            .schema()
            .validate(&json!({"query": "ownership", "sources": "faq"}))
            .unwrap();
        let scalar_output = tool.invoke(scalar_args).await.unwrap();

        let list_args = tool
            .schema()
            .validate(&json!({"query": "ownership", "sources": ["faq"]}))
            .unwrap();
        let list_output = tool.invoke(list_args).await.unwrap();

        assert_eq!(scalar_output, list_output);
        assert_eq!(count_blocks(&scalar_output.render()), 1);
        assert!(scalar_output.render().contains("Lifetimes name borrow scopes"));
    }

    #[tokio::test]
    async fn test_invocation_is_idempotent() {
        let store = seeded_store().await;
        let embedder = Arc::new(StubEmbedder::new());
        let tool = RetrieverTool::new(store, embedder, vec![]);

        let args = tool.schema().validate(&json!({"query": "borrowing"})).unwrap();
        let first = tool.invoke(args.clone()).await.unwrap();
        let second = tool.invoke(args).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_validation_failure_precedes_external_call() {
        let store = seeded_store().await;
        let embedder = Arc::new(StubEmbedder::new());
        let embedder_handle = embedder.clone();

        let mut registry = ToolRegistry::new();
        registry
            .register(RetrieverTool::new(store, embedder, vec![]))
            .unwrap();

        let err = registry
            .invoke("retriever", &json!({"query": 42}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("'query' must be a string"));
        assert_eq!(embedder_handle.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_known_sources_advertised_in_description() {
        let store = Arc::new(MemoryVectorStore::new());
        let embedder = Arc::new(StubEmbedder::new());
        let tool = RetrieverTool::new(store, embedder, vec!["guide".to_string(), "faq".to_string()]);
        assert!(tool.description().contains("guide, faq"));
    }
}
