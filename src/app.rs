//! Core orchestrator for askdb.
//!
//! Runs one question through the pipeline: translate, sanitize, gate,
//! classify, and execute. Each call to [`Orchestrator::ask`] is independent;
//! nothing is remembered between questions.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::Settings;
use crate::db::{DatabaseClient, QueryResult, SqliteStore};
use crate::error::Result;
use crate::llm::{sanitize_sql, LlmClient, PromptContext, Translator};
use crate::query::{ExecutionResult, QueryExecutor};
use crate::safety::{ClassificationResult, ExecutionPolicy, GateDecision, RequestGate};

/// What happened to the generated text after the model returned it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The gate did not recognise a query; nothing was executed.
    NotAQuery,
    /// The gate passed but the execution policy refused the statement.
    Refused {
        classification: ClassificationResult,
        reason: String,
    },
    /// The statement ran.
    Executed {
        classification: ClassificationResult,
        result: QueryResult,
    },
}

/// Everything shown to the user for one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    /// The question as asked.
    pub question: String,
    /// Raw model output, trimmed but otherwise untouched.
    pub generated: String,
    /// Sanitized SQL, present when the gate passed.
    pub sql: Option<String>,
    pub outcome: Outcome,
}

impl Answer {
    /// Returns the result rows if the statement was executed.
    pub fn result(&self) -> Option<&QueryResult> {
        match &self.outcome {
            Outcome::Executed { result, .. } => Some(result),
            _ => None,
        }
    }
}

/// Main orchestrator that owns the translator, the store, and the safety
/// checks for the lifetime of the process.
pub struct Orchestrator {
    translator: Translator,
    db: Box<dyn DatabaseClient>,
    gate: RequestGate,
    policy: ExecutionPolicy,
}

impl Orchestrator {
    /// Creates an orchestrator from explicit components.
    pub fn new(
        translator: Translator,
        db: Box<dyn DatabaseClient>,
        gate: RequestGate,
        policy: ExecutionPolicy,
    ) -> Self {
        Self {
            translator,
            db,
            gate,
            policy,
        }
    }

    /// Builds the standard pipeline from resolved settings: the SQLite store
    /// at the configured path, the built-in review prompt for the configured
    /// table, and a policy that allow-lists only that table.
    pub fn from_settings(settings: &Settings, client: Box<dyn LlmClient>) -> Self {
        let translator = Translator::new(client, PromptContext::for_table(&settings.table));
        let db = Box::new(SqliteStore::new(&settings.database_path));
        let policy = ExecutionPolicy::new([settings.table.as_str()], settings.allow_writes);

        Self::new(translator, db, RequestGate::new(settings.gate), policy)
    }

    /// Answers a single question.
    ///
    /// Model and store failures end the request with an error. A gate miss or
    /// a policy refusal is a normal answer.
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        let generated = self.translator.translate(question).await?;
        let sanitized = sanitize_sql(&generated);
        debug!("Sanitized model output: {}", sanitized);

        let sql = match self.gate.check(&sanitized) {
            GateDecision::Execute(sql) => sql,
            GateDecision::Skip => {
                info!("Gate ({}) found no query; skipping execution", self.gate.mode());
                return Ok(Answer {
                    question: question.to_string(),
                    generated,
                    sql: None,
                    outcome: Outcome::NotAQuery,
                });
            }
        };
        info!("Gate ({}) passed", self.gate.mode());

        let executor = QueryExecutor::new(self.db.as_ref(), &self.policy);
        let outcome = match executor.execute(&sql).await? {
            ExecutionResult::Executed {
                result,
                classification,
            } => Outcome::Executed {
                classification,
                result,
            },
            ExecutionResult::Refused {
                classification,
                reason,
            } => Outcome::Refused {
                classification,
                reason,
            },
        };

        Ok(Answer {
            question: question.to_string(),
            generated,
            sql: Some(sql),
            outcome,
        })
    }
}
