//! Database layer for askdb.
//!
//! The review store is a single SQLite file. Callers go through the
//! `DatabaseClient` trait so the request pipeline can be exercised against
//! an in-memory mock.

mod mock;
mod schema;
mod sqlite;
mod types;

pub use mock::{CallKind, FailingDatabaseClient, MockDatabaseClient};
pub use schema::{Column, Schema, Table};
pub use sqlite::{OpenMode, SqliteStore};
pub use types::{format_row, ColumnInfo, QueryResult, Row, Value};

use crate::error::Result;
use async_trait::async_trait;

/// Interface for the review store.
///
/// Each call is self-contained: implementations open and release whatever
/// connection they need within the call.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Introspects the store, returning its tables and columns.
    async fn introspect_schema(&self) -> Result<Schema>;

    /// Executes a statement without committing anything and returns all rows.
    async fn execute_read(&self, sql: &str) -> Result<QueryResult>;

    /// Executes a statement inside a transaction and commits it.
    async fn execute_write(&self, sql: &str) -> Result<QueryResult>;
}
