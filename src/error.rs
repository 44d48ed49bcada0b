//! Error types for Verktoy.

use thiserror::Error;

/// Library-level error type for Verktoy operations.
#[derive(Error, Debug)]
pub enum VerktoyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("SQL database error: {0}")]
    Sql(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Agent error: {0}")]
    Agent(String),
}

/// Result type alias for Verktoy operations.
pub type Result<T> = std::result::Result<T, VerktoyError>;
