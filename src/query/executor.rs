//! Query execution with safety classification.
//!
//! Every statement is classified and checked against the execution policy
//! before it reaches the store. Reads never commit; writes commit only when
//! the policy allows them.

use tracing::{info, warn};

use crate::db::{DatabaseClient, QueryResult};
use crate::error::Result;
use crate::safety::{classify_sql, ClassificationResult, ExecutionPolicy, PolicyDecision};

/// Query executor that handles SQL classification and execution.
pub struct QueryExecutor<'a> {
    db: &'a dyn DatabaseClient,
    policy: &'a ExecutionPolicy,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new query executor.
    pub fn new(db: &'a dyn DatabaseClient, policy: &'a ExecutionPolicy) -> Self {
        Self { db, policy }
    }

    /// Classifies `sql` and runs it if the policy permits.
    ///
    /// Store failures are returned as errors; a refusal is not an error.
    pub async fn execute(&self, sql: &str) -> Result<ExecutionResult> {
        let classification = classify_sql(sql);
        info!(
            "Classified statement as {} ({})",
            classification.level, classification.statement_type
        );

        let result = match self.policy.decide(sql, &classification) {
            PolicyDecision::ReadOnly => self.db.execute_read(sql).await?,
            PolicyDecision::Write => {
                warn!(
                    "Committing {} statement because writes are allowed",
                    classification.statement_type
                );
                self.db.execute_write(sql).await?
            }
            PolicyDecision::Refuse { reason } => {
                warn!("Refused statement: {}", reason);
                return Ok(ExecutionResult::Refused {
                    classification,
                    reason,
                });
            }
        };

        info!(
            "Statement returned {} rows in {:?}",
            result.row_count, result.execution_time
        );
        Ok(ExecutionResult::Executed {
            result,
            classification,
        })
    }
}

/// Result of executing a query.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    /// The statement ran.
    Executed {
        result: QueryResult,
        classification: ClassificationResult,
    },
    /// The policy refused the statement; nothing reached the store.
    Refused {
        classification: ClassificationResult,
        reason: String,
    },
}
