//! Integration tests for askdb.

pub mod common;
pub mod executor_test;
pub mod ingest_test;
pub mod pipeline_test;
