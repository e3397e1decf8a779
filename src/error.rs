//! Error types for askdb.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for askdb operations.
#[derive(Error, Debug)]
pub enum AskError {
    /// Store errors (missing database file, cannot open, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution errors (syntax errors, missing table, type mismatches, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// LLM API errors (auth, quota, network, malformed responses, etc.)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Configuration errors (invalid config file, missing credential, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Dataset ingestion errors (unreadable CSV, ragged rows, etc.)
    #[error("Ingest error: {0}")]
    Ingest(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AskError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates an LLM error with the given message.
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an ingest error with the given message.
    pub fn ingest(msg: impl Into<String>) -> Self {
        Self::Ingest(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Llm(_) => "LLM Error",
            Self::Config(_) => "Configuration Error",
            Self::Ingest(_) => "Ingest Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using AskError.
pub type Result<T> = std::result::Result<T, AskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_connection() {
        let err = AskError::connection("database file 'output.db' does not exist");
        assert_eq!(
            err.to_string(),
            "Connection error: database file 'output.db' does not exist"
        );
        assert_eq!(err.category(), "Connection Error");
    }

    #[test]
    fn test_error_display_query() {
        let err = AskError::query("no such column: reviewTxt");
        assert_eq!(err.to_string(), "Query error: no such column: reviewTxt");
        assert_eq!(err.category(), "Query Error");
    }

    #[test]
    fn test_error_display_llm() {
        let err = AskError::llm("Quota exceeded.");
        assert_eq!(err.to_string(), "LLM error: Quota exceeded.");
        assert_eq!(err.category(), "LLM Error");
    }

    #[test]
    fn test_error_display_config() {
        let err = AskError::config("GOOGLE_API_KEY is not set");
        assert_eq!(
            err.to_string(),
            "Configuration error: GOOGLE_API_KEY is not set"
        );
        assert_eq!(err.category(), "Configuration Error");
    }

    #[test]
    fn test_error_display_ingest() {
        let err = AskError::ingest("record 3 has 4 fields, expected 12");
        assert_eq!(
            err.to_string(),
            "Ingest error: record 3 has 4 fields, expected 12"
        );
        assert_eq!(err.category(), "Ingest Error");
    }

    #[test]
    fn test_error_display_internal() {
        let err = AskError::internal("unexpected state");
        assert_eq!(err.to_string(), "Internal error: unexpected state");
        assert_eq!(err.category(), "Internal Error");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AskError>();
    }
}
