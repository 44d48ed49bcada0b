//! Sql command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::database::SqlDatabase;
use crate::tool::{SqlTool, Tool};
use anyhow::Result;
use serde_json::json;
use std::sync::Arc;

/// Run the sql command.
pub async fn run_sql(query: &str, db_path: Option<String>, settings: Settings) -> Result<()> {
    let path = match db_path {
        Some(p) => Settings::expand_path(&p),
        None => settings.database_path(),
    };

    if !path.exists() {
        Output::error(&format!("Database not found: {}", path.display()));
        Output::info("Point --db at an existing SQLite file, or set [database] sqlite_path in the config.");
        anyhow::bail!("database not found");
    }

    let db = Arc::new(SqlDatabase::open(&path)?);
    let tool = SqlTool::new(db)?;

    let args = tool.schema().validate(&json!({ "query": query }))?;

    match tool.invoke(args).await {
        Ok(output) => {
            println!("{}", output.render());
        }
        Err(e) => {
            Output::error(&format!("Query failed: {}", e));
            return Err(anyhow::anyhow!("{}", e));
        }
    }

    Ok(())
}
