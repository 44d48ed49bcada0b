//! Verktoy - Typed Tools for LLM Agents
//!
//! A library and CLI for exposing external query capabilities to LLM agents
//! as named, described, schema-validated tools.
//!
//! The name "Verktoy" comes from the Norwegian word for "tool."
//!
//! # Overview
//!
//! Verktoy allows you to:
//! - Wrap a vector store, a SQL database, or an image endpoint as a tool
//! - Validate tool arguments against a declared schema before any call
//! - Run an agent loop that selects and invokes tools by name
//! - Index passages and search them semantically from the command line
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector database abstraction
//! - `database` - Relational database handle for the SQL tool
//! - `tool` - The tool abstraction, schemas, and concrete tools
//! - `agent` - Agent loop driving tool calls through a registry
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use verktoy::embedding::OpenAIEmbedder;
//! use verktoy::tool::{RetrieverTool, ToolRegistry};
//! use verktoy::vector_store::MemoryVectorStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(MemoryVectorStore::new());
//!     let embedder = Arc::new(OpenAIEmbedder::new());
//!
//!     let mut registry = ToolRegistry::new();
//!     registry.register(RetrieverTool::new(store, embedder, vec![]))?;
//!
//!     let output = registry
//!         .invoke("retriever", &serde_json::json!({"query": "ownership"}))
//!         .await?;
//!     println!("{}", output.render());
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod database;
pub mod embedding;
pub mod error;
pub mod openai;
pub mod tool;
pub mod vector_store;

pub use error::{Result, VerktoyError};
