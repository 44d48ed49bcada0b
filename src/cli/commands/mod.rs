//! CLI command implementations.

mod agent;
mod config;
mod imagine;
mod index;
mod init;
mod list;
mod search;
mod sql;

pub use agent::run_agent;
pub use config::run_config;
pub use imagine::run_imagine;
pub use index::run_index;
pub use init::run_init;
pub use list::run_list;
pub use search::run_search;
pub use sql::run_sql;

use crate::config::Settings;
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::vector_store::{MemoryVectorStore, SqliteVectorStore, VectorStore};
use std::sync::Arc;

/// Open the configured vector store backend.
pub(crate) fn open_vector_store(settings: &Settings) -> crate::error::Result<Arc<dyn VectorStore>> {
    match settings.vector_store.provider.as_str() {
        "memory" => Ok(Arc::new(MemoryVectorStore::new())),
        _ => Ok(Arc::new(SqliteVectorStore::new(&settings.vector_store_path())?)),
    }
}

/// Build the configured embedder.
pub(crate) fn open_embedder(settings: &Settings) -> Arc<dyn Embedder> {
    Arc::new(OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    ))
}
