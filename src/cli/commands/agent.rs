//! Agent command implementation.

use super::{open_embedder, open_vector_store};
use crate::agent::Agent;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::database::SqlDatabase;
use crate::tool::{ImageTool, RetrieverTool, SqlTool, ToolRegistry};
use anyhow::Result;
use std::sync::Arc;

/// Run the agent command.
pub async fn run_agent(
    task: &str,
    model: Option<String>,
    images: bool,
    settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Agent) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let model = model.unwrap_or_else(|| settings.agent.model.clone());

    let store = open_vector_store(&settings)?;
    let embedder = open_embedder(&settings);

    let known_sources: Vec<String> = store
        .list_sources()
        .await?
        .into_iter()
        .map(|s| s.source)
        .collect();

    let mut registry = ToolRegistry::new();
    registry.register(
        RetrieverTool::new(store, embedder, known_sources).with_top_k(settings.retrieval.top_k),
    )?;

    // Only offer the SQL tool when a database exists
    let db_path = settings.database_path();
    if db_path.exists() {
        let db = Arc::new(SqlDatabase::open(&db_path)?);
        registry.register(SqlTool::new(db)?)?;
    }

    if images {
        registry.register(ImageTool::new(&settings.images.model, &settings.images.size))?;
    }

    let agent = Agent::new(registry, &model).with_max_iterations(settings.agent.max_iterations);

    let spinner = Output::spinner("Agent working...");

    match agent.run(task, None).await {
        Ok(response) => {
            spinner.finish_and_clear();

            // Show the agent's response
            println!("\n{}\n", response.content);

            // Show tool calls summary
            if !response.tool_calls.is_empty() {
                Output::header(&format!("Tool calls ({})", response.tool_calls.len()));
                for call in &response.tool_calls {
                    Output::info(&format!("  {} {}", call.name, truncate(&call.arguments, 60)));
                }
                println!();
            }

            Output::info(&format!("Completed in {} iteration(s)", response.iterations));
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Agent failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}
