//! SQL execution tool.

use super::schema::{InputSchema, ParamType, ToolArgs};
use super::{Tool, ToolOutput};
use crate::database::SqlDatabase;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Tool that executes SQL queries against a relational database.
pub struct SqlTool {
    db: Arc<SqlDatabase>,
    schema: InputSchema,
    description: String,
}

impl SqlTool {
    /// Build the tool, embedding the database's table description so the
    /// orchestrating model knows what it can query.
    pub fn new(db: Arc<SqlDatabase>) -> Result<Self> {
        let tables = db.describe()?;
        let description = format!(
            "Performs SQL queries on the database and returns the result rows as text. \
             It can use the following tables:\n{}",
            tables
        );

        let schema = InputSchema::new().required(
            "query",
            ParamType::String,
            "The SQL query to execute. Must be valid SQLite SQL.",
        );

        Ok(Self {
            db,
            schema,
            description,
        })
    }
}

#[async_trait]
impl Tool for SqlTool {
    fn name(&self) -> &str {
        "sql_engine"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn schema(&self) -> &InputSchema {
        &self.schema
    }

    async fn invoke(&self, args: ToolArgs) -> Result<ToolOutput> {
        let query = args.str("query")?;
        let rows = self.db.run(query)?;
        Ok(ToolOutput::Text(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn receipts_tool() -> SqlTool {
        let db = SqlDatabase::in_memory().unwrap();
        db.execute_batch(
            r#"
            CREATE TABLE receipts (
                receipt_id INTEGER PRIMARY KEY,
                customer_name TEXT NOT NULL,
                price REAL NOT NULL,
                tip REAL NOT NULL
            );
            INSERT INTO receipts VALUES
                (1, 'Alan Payne', 12.06, 1.20),
                (2, 'Alex Mason', 23.86, 0.24),
                (3, 'Woodrow Wilson', 53.43, 5.43),
                (4, 'Margaret James', 21.11, 1.00);
            "#,
        )
        .unwrap();
        SqlTool::new(Arc::new(db)).unwrap()
    }

    #[tokio::test]
    async fn test_highest_price_scenario() {
        let tool = receipts_tool();
        let args = tool
            .schema()
            .validate(&json!({
                "query": "SELECT customer_name, price FROM receipts ORDER BY price DESC LIMIT 1"
            }))
            .unwrap();

        let output = tool.invoke(args).await.unwrap();
        assert!(output.render().contains("('Woodrow Wilson', 53.43)"));
    }

    #[tokio::test]
    async fn test_one_line_per_row() {
        let tool = receipts_tool();
        let args = tool
            .schema()
            .validate(&json!({"query": "SELECT customer_name FROM receipts"}))
            .unwrap();

        let output = tool.invoke(args).await.unwrap();
        assert_eq!(output.render().lines().count(), 4);
    }

    #[tokio::test]
    async fn test_invalid_sql_propagates() {
        let tool = receipts_tool();
        let args = tool
            .schema()
            .validate(&json!({"query": "SELECT nope FROM missing"}))
            .unwrap();
        assert!(tool.invoke(args).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_query_rejected() {
        let tool = receipts_tool();
        let err = tool.schema().validate(&json!({})).unwrap_err();
        assert!(err.to_string().contains("missing required argument 'query'"));
    }

    #[test]
    fn test_description_lists_tables() {
        let tool = receipts_tool();
        assert!(tool.description().contains("Table 'receipts':"));
        assert!(tool.description().contains("- price: REAL"));
    }

    #[tokio::test]
    async fn test_idempotent_reads() {
        let tool = receipts_tool();
        let args = tool
            .schema()
            .validate(&json!({"query": "SELECT * FROM receipts ORDER BY receipt_id"}))
            .unwrap();

        let first = tool.invoke(args.clone()).await.unwrap();
        let second = tool.invoke(args).await.unwrap();
        assert_eq!(first, second);
    }
}
