//! CLI module for Verktoy.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Verktoy - Typed Tools for LLM Agents
///
/// Expose a knowledge base, a SQL database, and an image endpoint to LLM
/// agents as named, schema-validated tools. The name "Verktoy" comes from
/// the Norwegian word for "tool."
#[derive(Parser, Debug)]
#[command(name = "verktoy")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Verktoy and verify configuration
    Init,

    /// Index passages from a JSONL file into the knowledge base
    Index {
        /// Path to a JSONL file with {"source", "title", "content"} records
        file: PathBuf,

        /// Fallback source name for records without one
        #[arg(short, long)]
        source: Option<String>,

        /// Delete existing passages for the affected sources first
        #[arg(short, long)]
        replace: bool,
    },

    /// List indexed sources
    List,

    /// Search the knowledge base through the retriever tool
    Search {
        /// The search query
        query: String,

        /// Number of passages to return
        #[arg(short, long)]
        limit: Option<usize>,

        /// Restrict to these sources (repeatable)
        #[arg(short, long)]
        source: Vec<String>,
    },

    /// Execute a SQL query through the SQL tool
    Sql {
        /// The SQL query to run
        query: String,

        /// Path to the SQLite database (overrides config)
        #[arg(long)]
        db: Option<String>,
    },

    /// Generate an image through the image tool
    Imagine {
        /// Text description of the image
        prompt: String,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the agent with a task
    Agent {
        /// The task for the agent
        task: String,

        /// Model to use (overrides config)
        #[arg(short, long)]
        model: Option<String>,

        /// Also offer the image generation tool
        #[arg(long)]
        images: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the current configuration
    Show,

    /// Open the configuration file in $EDITOR
    Edit,

    /// Print the configuration file path
    Path,
}
