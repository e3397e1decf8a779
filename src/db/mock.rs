//! Mock database clients for testing.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{DatabaseClient, QueryResult, Schema};
use crate::error::{AskError, Result};

/// Which entry point a mock call went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Read,
    Write,
}

/// A mock database client that returns a fixed result and records every
/// statement it receives.
#[derive(Debug, Default)]
pub struct MockDatabaseClient {
    schema: Schema,
    result: QueryResult,
    calls: Mutex<Vec<(CallKind, String)>>,
}

impl MockDatabaseClient {
    /// Creates a mock that returns an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the result returned for reads.
    pub fn with_result(mut self, result: QueryResult) -> Self {
        self.result = result;
        self
    }

    /// Sets the schema returned by introspection.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    /// Statements received so far, oldest first.
    pub fn calls(&self) -> Vec<(CallKind, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, kind: CallKind, sql: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((kind, sql.to_string()));
        }
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn introspect_schema(&self) -> Result<Schema> {
        Ok(self.schema.clone())
    }

    async fn execute_read(&self, sql: &str) -> Result<QueryResult> {
        self.record(CallKind::Read, sql);
        Ok(self.result.clone())
    }

    async fn execute_write(&self, sql: &str) -> Result<QueryResult> {
        self.record(CallKind::Write, sql);
        Ok(QueryResult::written(0))
    }
}

/// A database client whose every call fails with a query error.
#[derive(Debug, Clone)]
pub struct FailingDatabaseClient {
    message: String,
}

impl FailingDatabaseClient {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn introspect_schema(&self) -> Result<Schema> {
        Err(AskError::query(self.message.clone()))
    }

    async fn execute_read(&self, _sql: &str) -> Result<QueryResult> {
        Err(AskError::query(self.message.clone()))
    }

    async fn execute_write(&self, _sql: &str) -> Result<QueryResult> {
        Err(AskError::query(self.message.clone()))
    }
}
