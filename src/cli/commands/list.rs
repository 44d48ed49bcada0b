//! List command implementation.

use super::open_vector_store;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the list command.
pub async fn run_list(settings: Settings) -> Result<()> {
    let store = open_vector_store(&settings)?;

    match store.list_sources().await {
        Ok(sources) => {
            if sources.is_empty() {
                Output::info("No sources indexed yet. Use 'verktoy index <file>' to add content.");
            } else {
                Output::header(&format!("Indexed Sources ({})", sources.len()));
                println!();

                for item in &sources {
                    Output::source_info(&item.source, item.passage_count);
                }

                let total_passages: u32 = sources.iter().map(|s| s.passage_count).sum();
                println!();
                Output::kv("Total sources", &sources.len().to_string());
                Output::kv("Total passages", &total_passages.to_string());
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to list sources: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
