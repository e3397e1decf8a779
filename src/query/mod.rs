//! Query execution for askdb.
//!
//! Separates classification, policy and execution from the request pipeline
//! so each can be tested on its own.

pub mod executor;

pub use executor::{ExecutionResult, QueryExecutor};
