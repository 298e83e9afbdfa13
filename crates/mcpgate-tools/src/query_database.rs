use std::collections::BTreeMap;

use async_trait::async_trait;
use mcpgate_core::{ParameterSpec, ToolOutput};
use serde_json::Value;
use tracing::debug;

use crate::store::SqlStore;
use crate::{Tool, ToolError};

/// Runs caller-supplied SQL against the shared store.
///
/// The statement is executed verbatim: no validation, no parameter binding
/// and no privilege restriction beyond what the connection itself enforces.
/// Anyone who can reach the endpoint can run any statement the database
/// accepts. Enable `query_only` on the store to rule out writes.
pub struct QueryDatabaseTool {
    store: SqlStore,
}

impl QueryDatabaseTool {
    pub fn new(store: SqlStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for QueryDatabaseTool {
    fn name(&self) -> &str {
        "query_database"
    }

    fn description(&self) -> &str {
        "Execute SQL queries on the database"
    }

    fn parameters(&self) -> BTreeMap<String, ParameterSpec> {
        BTreeMap::from([(
            "query".to_string(),
            ParameterSpec::required("string", "SQL query to execute"),
        )])
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput, ToolError> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' parameter".to_string()))?;

        debug!(query, "Executing SQL");
        let rows = self.store.query(query.to_string()).await?;

        Ok(ToolOutput::result(Value::Array(rows)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool() -> QueryDatabaseTool {
        QueryDatabaseTool::new(SqlStore::in_memory().unwrap())
    }

    #[tokio::test]
    async fn test_select_returns_rows_as_result() {
        let output = tool().execute(json!({"query": "SELECT 1 AS x"})).await.unwrap();
        assert_eq!(output.get("result"), Some(&json!([{"x": 1}])));
    }

    #[tokio::test]
    async fn test_rows_match_direct_store_query() {
        let store = SqlStore::in_memory().unwrap();
        store
            .query("CREATE TABLE users (id INTEGER, name TEXT, score REAL)".into())
            .await
            .unwrap();
        store
            .query("INSERT INTO users VALUES (1, 'ada', 9.5), (2, 'bob', NULL)".into())
            .await
            .unwrap();

        let sql = "SELECT * FROM users ORDER BY id";
        let direct = store.query(sql.into()).await.unwrap();
        let output = QueryDatabaseTool::new(store)
            .execute(json!({"query": sql}))
            .await
            .unwrap();

        assert_eq!(output.get("result"), Some(&Value::Array(direct)));
    }

    #[tokio::test]
    async fn test_missing_query_is_invalid_arguments() {
        let err = tool().execute(json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));

        let err = tool().execute(json!({"query": 42})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn test_store_error_passes_through() {
        let err = tool()
            .execute(json!({"query": "SELECT * FROM nonexistent_table"}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "no such table: nonexistent_table");
    }
}
