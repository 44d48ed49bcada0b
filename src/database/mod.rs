//! Relational database handle for the SQL execution tool.
//!
//! Wraps a SQLite connection and renders query results as line-separated
//! tuple strings that a language model can read back.

use crate::error::{Result, VerktoyError};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

/// Fixed result string for queries that return no rows.
pub const NO_ROWS: &str = "(no rows)";

/// SQLite-backed database for the SQL tool.
pub struct SqlDatabase {
    conn: Mutex<Connection>,
}

impl SqlDatabase {
    /// Open a database at the given path.
    #[instrument(skip_all)]
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        info!("Opened SQL database at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute a batch of statements (e.g., to seed fixture tables).
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| VerktoyError::Sql(format!("Failed to acquire lock: {}", e)))?;
        conn.execute_batch(sql)?;
        Ok(())
    }

    /// Run a query and render each result row as a parenthesized tuple,
    /// one row per line.
    #[instrument(skip(self))]
    pub fn run(&self, sql: &str) -> Result<String> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| VerktoyError::Sql(format!("Failed to acquire lock: {}", e)))?;

        let mut stmt = conn.prepare(sql)?;
        let column_count = stmt.column_count();

        let mut rows = stmt.query([])?;
        let mut lines = Vec::new();

        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                values.push(format_value(row.get_ref(i)?));
            }
            lines.push(format!("({})", values.join(", ")));
        }

        debug!("Query returned {} rows", lines.len());

        if lines.is_empty() {
            return Ok(NO_ROWS.to_string());
        }

        Ok(lines.join("\n"))
    }

    /// Describe the user tables and their columns.
    ///
    /// The SQL tool embeds this in its description so an orchestrating
    /// model knows what it can query.
    pub fn describe(&self) -> Result<String> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| VerktoyError::Sql(format!("Failed to acquire lock: {}", e)))?;

        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let tables: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .filter_map(|t| t.ok())
            .collect();

        let mut description = String::new();
        for table in &tables {
            description.push_str(&format!("Table '{}':\n  Columns:\n", table));

            let mut col_stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
            let columns = col_stmt.query_map([], |row| {
                let name: String = row.get(1)?;
                let decl_type: String = row.get(2)?;
                Ok((name, decl_type))
            })?;

            for column in columns.filter_map(|c| c.ok()) {
                description.push_str(&format!("    - {}: {}\n", column.0, column.1));
            }
        }

        Ok(description)
    }
}

/// Render a single SQLite value in tuple notation.
fn format_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => format!("'{}'", String::from_utf8_lossy(t)),
        ValueRef::Blob(b) => format!("<blob {} bytes>", b.len()),
    }
}
