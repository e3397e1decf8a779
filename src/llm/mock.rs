//! Mock LLM clients for testing.
//!
//! Provide deterministic responses based on input patterns, and a client
//! that always fails for exercising error paths.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::error::{AskError, Result};
use crate::llm::types::{Message, Role};
use crate::llm::LlmClient;

/// Mock LLM client that returns canned responses based on input patterns.
///
/// Patterns are matched against the question only: the last non-empty line
/// of the last user message. A translator prompt always ends with the
/// question, so the few-shot examples earlier in the prompt never match.
#[derive(Debug, Default)]
pub struct MockLlmClient {
    /// Custom response mappings (pattern -> response).
    custom_responses: Vec<(String, String)>,
    /// Every prompt received, in order.
    received: Mutex<Vec<String>>,
}

impl MockLlmClient {
    /// Creates a new mock client with default responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom response mapping.
    ///
    /// When the question contains `pattern` (case-insensitive), the mock
    /// returns `response` verbatim.
    pub fn with_response(
        mut self,
        pattern: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.custom_responses
            .push((pattern.into(), response.into()));
        self
    }

    /// Returns a copy of every prompt this client has received.
    pub fn received_prompts(&self) -> Vec<String> {
        self.received
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }

    /// Generates a mock response based on the question.
    fn mock_response(&self, question: &str) -> String {
        let question_lower = question.to_lowercase();

        for (pattern, response) in &self.custom_responses {
            if question_lower.contains(&pattern.to_lowercase()) {
                return response.clone();
            }
        }

        if question_lower.contains("how many reviews") {
            return "SELECT COUNT(*) FROM output;".to_string();
        }

        if question_lower.contains("rating of 5") {
            return "```sql\nSELECT reviewText FROM output WHERE overall = 5;\n```".to_string();
        }

        if question_lower.contains("average rating") {
            return "SELECT AVG(overall) FROM output;".to_string();
        }

        if question_lower.contains("delete") || question_lower.contains("remove") {
            return "```sql\nDELETE FROM output;\n```".to_string();
        }

        "Invalid query.".to_string()
    }

    /// Extracts the question from a message list.
    fn extract_question(messages: &[Message]) -> String {
        messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .and_then(|m| m.content.lines().rev().find(|line| !line.trim().is_empty()))
            .map(str::to_string)
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        if let Ok(mut received) = self.received.lock() {
            if let Some(last) = messages.iter().rev().find(|m| m.role == Role::User) {
                received.push(last.content.clone());
            }
        }

        let question = Self::extract_question(messages);
        Ok(self.mock_response(&question))
    }

    fn model(&self) -> &str {
        "mock"
    }
}

/// LLM client whose every call fails, standing in for an unreachable or
/// unauthorised provider.
#[derive(Debug, Clone)]
pub struct FailingLlmClient {
    message: String,
}

impl FailingLlmClient {
    /// Creates a client that fails with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl LlmClient for FailingLlmClient {
    async fn complete(&self, _messages: &[Message]) -> Result<String> {
        Err(AskError::llm(self.message.clone()))
    }

    fn model(&self) -> &str {
        "failing"
    }
}
