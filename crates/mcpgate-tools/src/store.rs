//! Shared SQLite handle used by the query tool and the root endpoint.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rusqlite::types::ValueRef;
use rusqlite::{Batch, Connection, Statement};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::info;

/// Errors raised by the data store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The database rejected or failed the statement. Displays SQLite's own text.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to create database directory '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("database lock error")]
    Poisoned,

    #[error("database task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Process-wide handle to the relational store.
///
/// Cloning is cheap; every clone shares the same connection.
#[derive(Clone, Debug)]
pub struct SqlStore {
    conn: Arc<Mutex<Connection>>,
    location: String,
}

impl SqlStore {
    /// Opens the store named by a connection string.
    ///
    /// Accepts a plain path, a `sqlite://` / `sqlite:` prefixed path, or `:memory:`.
    pub fn open(url: &str) -> Result<Self, StoreError> {
        let location = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);

        if location == ":memory:" {
            return Self::in_memory();
        }

        if let Some(parent) = Path::new(location).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: parent.display().to_string(),
                    source,
                })?;
            }
        }

        let conn = Connection::open(location)?;
        info!("Database opened at {}", location);
        Ok(Self::from_connection(conn, location))
    }

    /// Opens a private in-memory database.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self::from_connection(conn, ":memory:"))
    }

    fn from_connection(conn: Connection, location: &str) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            location: location.to_string(),
        }
    }

    /// Where the store lives (path or `:memory:`).
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Toggles SQLite's `query_only` pragma for the shared connection.
    pub fn set_read_only(&self, read_only: bool) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.pragma_update(None, "query_only", read_only)?;
        Ok(())
    }

    /// Executes `sql` verbatim and returns every row as a JSON object.
    ///
    /// Multiple `;`-separated statements all run; the rows come from the last.
    ///
    /// Runs on the blocking pool so the calling task only suspends.
    pub async fn query(&self, sql: String) -> Result<Vec<Value>, StoreError> {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| StoreError::Poisoned)?;
            run_query(&conn, &sql).map_err(StoreError::from)
        })
        .await?
    }

    /// Current time according to the database.
    pub async fn now(&self) -> Result<String, StoreError> {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| StoreError::Poisoned)?;
            let now: String = conn.query_row("SELECT datetime('now')", [], |row| row.get(0))?;
            Ok::<_, StoreError>(now)
        })
        .await?
    }
}

/// Runs every statement in `sql` in order and returns the rows of the last one.
///
/// Empty and comment-only input runs nothing and yields no rows.
fn run_query(conn: &Connection, sql: &str) -> rusqlite::Result<Vec<Value>> {
    let mut batch = Batch::new(conn, sql);
    let mut out = Vec::new();
    while let Some(mut stmt) = batch.next()? {
        out = collect_rows(&mut stmt)?;
    }
    Ok(out)
}

fn collect_rows(stmt: &mut Statement<'_>) -> rusqlite::Result<Vec<Value>> {
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut obj = Map::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            obj.insert(name.clone(), value_to_json(row.get_ref(i)?));
        }
        out.push(Value::Object(obj));
    }
    Ok(out)
}

fn value_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::Number(n.into()),
        ValueRef::Real(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(STANDARD.encode(bytes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_query_maps_sqlite_types() {
        let store = SqlStore::in_memory().unwrap();
        let rows = store
            .query("SELECT 1 AS i, 2.5 AS r, 'txt' AS t, NULL AS n, x'0102' AS b".into())
            .await
            .unwrap();

        assert_eq!(
            rows,
            vec![json!({"i": 1, "r": 2.5, "t": "txt", "n": null, "b": "AQI="})]
        );
    }

    #[tokio::test]
    async fn test_columns_keep_statement_order() {
        let store = SqlStore::in_memory().unwrap();
        let rows = store.query("SELECT 3 AS z, 2 AS a, 1 AS m".into()).await.unwrap();
        let keys: Vec<_> = rows[0].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[tokio::test]
    async fn test_statements_without_columns_return_no_rows() {
        let store = SqlStore::in_memory().unwrap();
        let created = store
            .query("CREATE TABLE items (id INTEGER PRIMARY KEY, name TEXT)".into())
            .await
            .unwrap();
        assert!(created.is_empty());

        let inserted = store
            .query("INSERT INTO items (name) VALUES ('a'), ('b')".into())
            .await
            .unwrap();
        assert!(inserted.is_empty());

        let rows = store.query("SELECT name FROM items ORDER BY id".into()).await.unwrap();
        assert_eq!(rows, vec![json!({"name": "a"}), json!({"name": "b"})]);
    }

    #[tokio::test]
    async fn test_rejected_statement_surfaces_sqlite_message() {
        let store = SqlStore::in_memory().unwrap();
        let err = store
            .query("SELECT * FROM nonexistent_table".into())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no such table: nonexistent_table"));
    }

    #[tokio::test]
    async fn test_read_only_blocks_writes() {
        let store = SqlStore::in_memory().unwrap();
        store.set_read_only(true).unwrap();

        assert!(store.query("CREATE TABLE t (x INTEGER)".into()).await.is_err());
        assert_eq!(store.query("SELECT 1 AS x".into()).await.unwrap(), vec![json!({"x": 1})]);
    }

    #[tokio::test]
    async fn test_open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("gate.db");
        let store = SqlStore::open(&format!("sqlite://{}", path.display())).unwrap();

        store.query("CREATE TABLE t (x INTEGER)".into()).await.unwrap();
        assert!(path.exists());
        assert_eq!(store.location(), path.display().to_string());
    }

    #[tokio::test]
    async fn test_now_reads_database_clock() {
        let store = SqlStore::in_memory().unwrap();
        let now = store.now().await.unwrap();
        // datetime('now') is "YYYY-MM-DD HH:MM:SS"
        assert_eq!(now.len(), 19);
    }

    #[tokio::test]
    async fn test_every_statement_in_a_batch_runs() {
        let store = SqlStore::in_memory().unwrap();
        let rows = store
            .query("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (1); INSERT INTO t VALUES (2)".into())
            .await
            .unwrap();
        assert!(rows.is_empty());

        let rows = store.query("SELECT x FROM t ORDER BY x".into()).await.unwrap();
        assert_eq!(rows, vec![json!({"x": 1}), json!({"x": 2})]);
    }

    #[tokio::test]
    async fn test_batch_returns_rows_of_last_statement() {
        let store = SqlStore::in_memory().unwrap();
        let rows = store.query("SELECT 1 AS a; SELECT 2 AS b".into()).await.unwrap();
        assert_eq!(rows, vec![json!({"b": 2})]);
    }

    #[tokio::test]
    async fn test_batch_stops_at_first_failing_statement() {
        let store = SqlStore::in_memory().unwrap();
        let err = store
            .query("CREATE TABLE t (x INTEGER); SELECT * FROM missing; INSERT INTO t VALUES (1)".into())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no such table: missing"));

        let rows = store.query("SELECT count(*) AS n FROM t".into()).await.unwrap();
        assert_eq!(rows, vec![json!({"n": 0})]);
    }

    #[tokio::test]
    async fn test_empty_and_comment_only_sql_yield_no_rows() {
        let store = SqlStore::in_memory().unwrap();
        for sql in ["", "   ", "-- hi", "/* nothing */", ";"] {
            assert_eq!(store.query(sql.into()).await.unwrap(), Vec::<Value>::new(), "{sql:?}");
        }
    }

    #[tokio::test]
    async fn test_poisoned_lock_is_reported() {
        let store = SqlStore::in_memory().unwrap();
        let conn = Arc::clone(&store.conn);
        let _ = std::thread::spawn(move || {
            let _guard = conn.lock().unwrap();
            panic!("poison the connection lock");
        })
        .join();

        assert!(matches!(store.now().await, Err(StoreError::Poisoned)));
        assert!(matches!(store.query("SELECT 1".into()).await, Err(StoreError::Poisoned)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_queries_share_one_connection() {
        let store = SqlStore::in_memory().unwrap();
        store.query("CREATE TABLE hits (n INTEGER)".into()).await.unwrap();

        let mut tasks = tokio::task::JoinSet::new();
        for n in 0..32 {
            let store = store.clone();
            tasks.spawn(async move { store.query(format!("INSERT INTO hits VALUES ({n})")).await });
        }
        while let Some(res) = tasks.join_next().await {
            res.unwrap().unwrap();
        }

        let rows = store.query("SELECT count(*) AS c, sum(n) AS s FROM hits".into()).await.unwrap();
        assert_eq!(rows, vec![json!({"c": 32, "s": 496})]);
    }
}
