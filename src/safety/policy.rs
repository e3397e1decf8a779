//! Execution policy applied to statements that passed the request gate.

use tracing::debug;

use super::{referenced_relations, ClassificationResult, StatementType};

/// What the executor is allowed to do with a classified statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    /// Run on a read-only connection; nothing is committed.
    ReadOnly,
    /// Run inside a transaction and commit.
    Write,
    /// Do not run the statement.
    Refuse { reason: String },
}

impl PolicyDecision {
    fn refuse(reason: impl Into<String>) -> Self {
        Self::Refuse {
            reason: reason.into(),
        }
    }
}

/// Allow-list of relations plus the write switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPolicy {
    allow_writes: bool,
    allowed_tables: Vec<String>,
}

impl ExecutionPolicy {
    /// Creates a policy that permits the given tables. Names compare
    /// case-insensitively.
    pub fn new<I, S>(allowed_tables: I, allow_writes: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allow_writes,
            allowed_tables: allowed_tables
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn allow_writes(&self) -> bool {
        self.allow_writes
    }

    pub fn allowed_tables(&self) -> &[String] {
        &self.allowed_tables
    }

    /// Decides how `sql` may run given its classification.
    ///
    /// Only a single statement is ever executed; text holding several is
    /// refused outright.
    pub fn decide(&self, sql: &str, classification: &ClassificationResult) -> PolicyDecision {
        if let StatementType::Multiple(_) = classification.statement_type {
            return PolicyDecision::refuse(
                "Generated text contains more than one statement; only one may run",
            );
        }

        let relations = match referenced_relations(sql) {
            Ok(relations) => relations,
            Err(e) => return PolicyDecision::refuse(e.to_string()),
        };

        let unknown: Vec<&str> = relations
            .iter()
            .filter(|r| !self.allowed_tables.contains(r))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            return PolicyDecision::refuse(format!(
                "Statement references relations outside the allow-list: {}",
                unknown.join(", ")
            ));
        }

        debug!(
            "Policy check: level={} type={} relations={:?}",
            classification.level, classification.statement_type, relations
        );

        if !classification.is_write() {
            return PolicyDecision::ReadOnly;
        }

        if self.allow_writes {
            PolicyDecision::Write
        } else {
            PolicyDecision::refuse(format!(
                "{} statement ({}) would modify the database; writes are not allowed",
                classification.statement_type, classification.level
            ))
        }
    }
}
