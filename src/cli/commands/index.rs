//! Index command implementation.

use super::{open_embedder, open_vector_store};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::vector_store::Passage;
use anyhow::Result;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

/// One record in the input JSONL file.
#[derive(Debug, Deserialize)]
struct IndexRecord {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    title: Option<String>,
    content: String,
}

/// Run the index command.
pub async fn run_index(
    file: &Path,
    source: Option<String>,
    replace: bool,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Index) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let content = std::fs::read_to_string(file)?;
    let mut records = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: IndexRecord = serde_json::from_str(line)
            .map_err(|e| anyhow::anyhow!("{}:{}: {}", file.display(), line_no + 1, e))?;
        records.push(record);
    }

    if records.is_empty() {
        Output::warning("No records found in input file.");
        return Ok(());
    }

    // Resolve each record's source, falling back to the --source flag
    let mut resolved = Vec::with_capacity(records.len());
    for (i, record) in records.into_iter().enumerate() {
        let record_source = match record.source.or_else(|| source.clone()) {
            Some(s) => s,
            None => {
                anyhow::bail!(
                    "record {} has no 'source' field and no --source fallback was given",
                    i + 1
                );
            }
        };
        resolved.push((record_source, record.title, record.content));
    }

    let store = open_vector_store(&settings)?;
    let embedder = open_embedder(&settings);

    let spinner = Output::spinner(&format!("Embedding {} passages...", resolved.len()));

    let texts: Vec<String> = resolved.iter().map(|(_, _, content)| content.clone()).collect();
    let embeddings = embedder.embed_batch(&texts).await;
    spinner.finish_and_clear();
    let embeddings = embeddings?;

    let passages: Vec<Passage> = resolved
        .into_iter()
        .zip(embeddings)
        .map(|((source, title, content), embedding)| Passage::new(source, title, content, embedding))
        .collect();

    if replace {
        let sources: BTreeSet<String> = passages.iter().map(|p| p.source.clone()).collect();
        for s in &sources {
            let deleted = store.delete_by_source(s).await?;
            if deleted > 0 {
                Output::info(&format!("Replaced {} existing passages for '{}'", deleted, s));
            }
        }
    }

    let count = store.upsert_batch(&passages).await?;
    Output::success(&format!("Indexed {} passages", count));

    Ok(())
}
