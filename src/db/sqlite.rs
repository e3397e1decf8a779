//! SQLite review store.
//!
//! Every call opens its own connection and closes it before returning. Reads
//! use a read-only connection; writes run inside a transaction that is
//! committed before the connection closes.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column as SqlxColumn, ConnectOptions, Connection, Executor, Row as SqlxRow};
use sqlx::{Statement, TypeInfo, ValueRef};
use tracing::{debug, warn};

use crate::db::{Column, ColumnInfo, DatabaseClient, QueryResult, Row, Schema, Table, Value};
use crate::error::{AskError, Result};

/// How long a connection waits on another process's lock.
const BUSY_TIMEOUT_SECS: u64 = 5;

/// How a connection to the store is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Existing file, read-only.
    ReadOnly,
    /// Existing file, read-write.
    ReadWrite,
    /// Read-write, creating the file if needed.
    Create,
}

/// A file-backed SQLite store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Creates a store handle for the given file. Nothing is opened yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the database file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a fresh connection.
    ///
    /// `ReadOnly` and `ReadWrite` require the file to exist already, so a
    /// mistyped path is reported instead of silently creating an empty store.
    pub async fn open(&self, mode: OpenMode) -> Result<SqliteConnection> {
        if mode != OpenMode::Create && !self.path.is_file() {
            return Err(AskError::connection(format!(
                "Database file not found: {}",
                self.path.display()
            )));
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .read_only(mode == OpenMode::ReadOnly)
            .create_if_missing(mode == OpenMode::Create)
            .busy_timeout(Duration::from_secs(BUSY_TIMEOUT_SECS));

        debug!("Opening {} ({:?})", self.path.display(), mode);

        options.connect().await.map_err(|e| {
            AskError::connection(format!(
                "Failed to open database {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Lists user tables, excluding SQLite's internal ones.
    pub async fn table_names(&self) -> Result<Vec<String>> {
        let mut conn = self.open(OpenMode::ReadOnly).await?;
        let names = fetch_table_names(&mut conn).await;
        close(conn).await;
        names
    }

    /// Returns true if the store contains the given table.
    pub async fn has_table(&self, table: &str) -> Result<bool> {
        Ok(self
            .table_names()
            .await?
            .iter()
            .any(|name| name.eq_ignore_ascii_case(table)))
    }
}

#[async_trait]
impl DatabaseClient for SqliteStore {
    async fn introspect_schema(&self) -> Result<Schema> {
        let mut conn = self.open(OpenMode::ReadOnly).await?;
        let schema = fetch_schema(&mut conn).await;
        close(conn).await;
        schema
    }

    async fn execute_read(&self, sql: &str) -> Result<QueryResult> {
        let mut conn = self.open(OpenMode::ReadOnly).await?;
        let start = Instant::now();

        let fetched = sqlx::query(sql)
            .persistent(false)
            .fetch_all(&mut conn)
            .await
            .map_err(|e| AskError::query(format_query_error(e)));

        let rows = match fetched {
            Ok(rows) => rows,
            Err(e) => {
                close(conn).await;
                return Err(e);
            }
        };
        let execution_time = start.elapsed();

        let columns = match rows.first() {
            Some(first) => column_info(first),
            None => prepared_columns(&mut conn, sql).await,
        };
        close(conn).await;

        let rows: Vec<Row> = rows.iter().map(convert_row).collect();
        debug!("Read returned {} rows in {:?}", rows.len(), execution_time);

        Ok(QueryResult::with_data(columns, rows).with_execution_time(execution_time))
    }

    async fn execute_write(&self, sql: &str) -> Result<QueryResult> {
        let mut conn = self.open(OpenMode::ReadWrite).await?;
        let start = Instant::now();

        let outcome = run_in_transaction(&mut conn, sql).await;
        close(conn).await;

        let rows_affected = outcome?;
        let execution_time = start.elapsed();
        debug!(
            "Write committed, {} rows affected in {:?}",
            rows_affected, execution_time
        );

        Ok(QueryResult::written(rows_affected).with_execution_time(execution_time))
    }
}

/// Executes `sql` in a transaction and commits it. On error the transaction
/// is rolled back when dropped.
async fn run_in_transaction(conn: &mut SqliteConnection, sql: &str) -> Result<u64> {
    let mut tx = conn
        .begin()
        .await
        .map_err(|e| AskError::query(format!("Failed to begin transaction: {e}")))?;

    let done = sqlx::query(sql)
        .persistent(false)
        .execute(&mut *tx)
        .await
        .map_err(|e| AskError::query(format_query_error(e)))?;

    tx.commit()
        .await
        .map_err(|e| AskError::query(format!("Failed to commit: {e}")))?;

    Ok(done.rows_affected())
}

/// Closes a connection, logging rather than failing if SQLite complains.
async fn close(conn: SqliteConnection) {
    if let Err(e) = conn.close().await {
        warn!("Failed to close database connection: {}", e);
    }
}

/// Column metadata for a statement that returned no rows. Best effort: an
/// empty list if the statement cannot be prepared on its own.
async fn prepared_columns(conn: &mut SqliteConnection, sql: &str) -> Vec<ColumnInfo> {
    match (&mut *conn).prepare(sql).await {
        Ok(statement) => statement
            .columns()
            .iter()
            .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
            .collect(),
        Err(e) => {
            debug!("Could not prepare statement for column metadata: {}", e);
            Vec::new()
        }
    }
}

async fn fetch_table_names(conn: &mut SqliteConnection) -> Result<Vec<String>> {
    sqlx::query_scalar(
        r#"
        SELECT name
        FROM sqlite_master
        WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
        ORDER BY name
        "#,
    )
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| AskError::query(format!("Failed to fetch tables: {e}")))
}

async fn fetch_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    let table_names = fetch_table_names(conn).await?;
    let mut tables = Vec::with_capacity(table_names.len());

    for name in table_names {
        tables.push(fetch_table(conn, name).await?);
    }

    Ok(Schema { tables })
}

/// Reads one table's columns through the `pragma_table_info` table-valued
/// function so the name can be bound.
async fn fetch_table(conn: &mut SqliteConnection, name: String) -> Result<Table> {
    let rows: Vec<(String, String, bool, Option<String>, i64)> = sqlx::query_as(
        r#"
        SELECT name, type, "notnull", dflt_value, pk
        FROM pragma_table_info(?1)
        ORDER BY cid
        "#,
    )
    .bind(&name)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| AskError::query(format!("Failed to fetch columns for {name}: {e}")))?;

    let mut primary_key: Vec<(i64, String)> = Vec::new();
    let columns = rows
        .into_iter()
        .map(|(column, data_type, not_null, default, pk)| {
            if pk > 0 {
                primary_key.push((pk, column.clone()));
            }
            Column {
                name: column,
                data_type,
                is_nullable: !not_null,
                default,
            }
        })
        .collect();
    primary_key.sort();

    Ok(Table {
        name,
        columns,
        primary_key: primary_key.into_iter().map(|(_, column)| column).collect(),
    })
}

fn column_info(row: &SqliteRow) -> Vec<ColumnInfo> {
    row.columns()
        .iter()
        .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
        .collect()
}

/// Converts a sqlx SqliteRow to our Row type.
fn convert_row(row: &SqliteRow) -> Row {
    (0..row.columns().len())
        .map(|i| convert_value(row, i))
        .collect()
}

/// Converts a single column value, dispatching on the value's storage class
/// rather than the column's declared type.
fn convert_value(row: &SqliteRow, index: usize) -> Value {
    let type_name = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_uppercase(),
        Err(_) => return Value::Null,
    };

    match type_name.as_str() {
        "INTEGER" | "INT" | "INT8" | "BIGINT" | "BOOLEAN" => row
            .try_get::<i64, _>(index)
            .map(Value::Int)
            .unwrap_or(Value::Null),

        "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" => row
            .try_get::<f64, _>(index)
            .map(Value::Float)
            .unwrap_or(Value::Null),

        "BLOB" => row
            .try_get::<Vec<u8>, _>(index)
            .map(Value::Bytes)
            .unwrap_or(Value::Null),

        // TEXT and date/time affinities come back as strings
        _ => row
            .try_get::<String, _>(index)
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}

/// Formats a query error, keeping SQLite's own message when there is one.
fn format_query_error(error: sqlx::Error) -> String {
    match error.as_database_error() {
        Some(db_error) => format!("ERROR: {}", db_error.message()),
        None => error.to_string(),
    }
}
