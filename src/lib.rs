//! askdb - natural-language questions over a review dataset.
//!
//! This library exposes the core modules for use by the binary and the
//! integration tests.

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod llm;
pub mod logging;
pub mod output;
pub mod query;
pub mod safety;
