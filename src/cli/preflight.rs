//! Pre-flight checks before expensive operations.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail midway.

use crate::error::{Result, VerktoyError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Indexing requires an API key for embeddings.
    Index,
    /// Searching requires an API key for query embeddings.
    Search,
    /// SQL execution runs locally.
    Sql,
    /// Agent runs require an API key.
    Agent,
    /// Image generation requires an API key.
    Imagine,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Index | Operation::Search | Operation::Agent | Operation::Imagine => {
            check_api_key()?;
        }
        Operation::Sql => {
            // No external requirements for local SQL
        }
    }
    Ok(())
}

/// Check if OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(VerktoyError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(VerktoyError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_sql_no_requirements() {
        // Local SQL should always pass pre-flight (no external requirements)
        assert!(check(Operation::Sql).is_ok());
    }
}
