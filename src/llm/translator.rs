//! Natural-language to SQL translation.

use tracing::{debug, info};

use crate::error::Result;
use crate::llm::prompt::{build_prompt, PromptContext};
use crate::llm::types::Message;
use crate::llm::LlmClient;

/// Turns a question into model-generated text (normally a SQL statement).
///
/// Owns its client and context for the lifetime of the process; nothing is
/// carried between questions.
pub struct Translator {
    client: Box<dyn LlmClient>,
    context: PromptContext,
}

impl Translator {
    /// Creates a translator from a configured client and prompt context.
    pub fn new(client: Box<dyn LlmClient>, context: PromptContext) -> Self {
        Self { client, context }
    }

    /// Returns the prompt context this translator sends.
    pub fn context(&self) -> &PromptContext {
        &self.context
    }

    /// Sends one prompt to the model and returns its trimmed output.
    ///
    /// Provider failures are returned as-is; there is no retry.
    pub async fn translate(&self, question: &str) -> Result<String> {
        let prompt = build_prompt(&self.context, question);
        info!(
            "Translating question with {} ({} context blocks, {} prompt bytes)",
            self.client.model(),
            self.context.blocks().len(),
            prompt.len()
        );

        let response = self.client.complete(&[Message::user(prompt)]).await?;
        let generated = response.trim().to_string();

        debug!("Model returned {} bytes", generated.len());
        Ok(generated)
    }
}
