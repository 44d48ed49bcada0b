//! Search command implementation.
//!
//! Invokes the retriever tool through the same validated calling
//! convention an agent would use.

use super::{open_embedder, open_vector_store};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::tool::{RetrieverTool, Tool};
use anyhow::Result;
use serde_json::json;

/// Run the search command.
pub async fn run_search(
    query: &str,
    limit: Option<usize>,
    sources: &[String],
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Search) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let store = open_vector_store(&settings)?;
    let embedder = open_embedder(&settings);

    let known_sources: Vec<String> = store
        .list_sources()
        .await?
        .into_iter()
        .map(|s| s.source)
        .collect();

    let tool = RetrieverTool::new(store, embedder, known_sources)
        .with_top_k(limit.unwrap_or(settings.retrieval.top_k));

    let mut raw_args = json!({ "query": query });
    if !sources.is_empty() {
        raw_args["sources"] = json!(sources);
    }

    let args = tool.schema().validate(&raw_args)?;

    let spinner = Output::spinner("Searching...");
    let result = tool.invoke(args).await;
    spinner.finish_and_clear();

    match result {
        Ok(output) => {
            println!("{}", output.render());
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(anyhow::anyhow!("{}", e));
        }
    }

    Ok(())
}
