//! LLM client factory.
//!
//! Centralizes provider-specific logic for creating LLM clients from the
//! resolved settings.

use crate::config::Settings;
use crate::error::{AskError, Result};
use crate::llm::{
    GeminiClient, GeminiConfig, LlmClient, LlmProvider, MockLlmClient, OpenAiClient, OpenAiConfig,
};

/// Creates an LLM client for the configured provider.
///
/// If `api_key` is provided, it takes precedence over the environment. For
/// providers that require a key, a missing key is a configuration failure so
/// the process stops before any request is served:
/// - Gemini: `GOOGLE_API_KEY`
/// - OpenAI: `OPENAI_API_KEY`
pub fn create_client(settings: &Settings, api_key: Option<String>) -> Result<Box<dyn LlmClient>> {
    let provider = settings.provider;

    let resolve_key = |api_key: Option<String>| -> Result<String> {
        let var = provider
            .api_key_env_var()
            .ok_or_else(|| AskError::internal(format!("{provider} does not use an API key")))?;
        api_key
            .or_else(|| std::env::var(var).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AskError::config(format!(
                    "No API key configured for {provider}. Set {var} in the environment or a .env file."
                ))
            })
    };

    match provider {
        LlmProvider::Gemini => {
            let key = resolve_key(api_key)?;
            let mut config =
                GeminiConfig::new(key, settings.model.clone()).with_timeout(settings.timeout_secs);
            if let Some(base_url) = &settings.base_url {
                config = config.with_base_url(base_url.as_str());
            }
            Ok(Box::new(GeminiClient::new(config)?))
        }
        LlmProvider::OpenAi => {
            let key = resolve_key(api_key)?;
            let mut config =
                OpenAiConfig::new(key, settings.model.clone()).with_timeout(settings.timeout_secs);
            if let Some(base_url) = &settings.base_url {
                config = config.with_base_url(base_url.as_str());
            }
            Ok(Box::new(OpenAiClient::new(config)?))
        }
        LlmProvider::Mock => Ok(Box::new(MockLlmClient::new())),
    }
}
