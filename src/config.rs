//! Configuration management for askdb.
//!
//! Handles loading configuration from TOML files and environment variables,
//! and resolves everything into an immutable [`Settings`] value that is built
//! once at startup and handed to the pipeline.

use crate::error::{AskError, Result};
use crate::llm::LlmProvider;
use crate::safety::GateMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Main configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// LLM provider configuration.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Location of the review store.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Execution safety settings.
    #[serde(default)]
    pub safety: SafetyConfig,
}

/// LLM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// LLM provider: "gemini", "openai" or "mock".
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model name. Falls back to the provider's environment variable, then
    /// the provider default.
    #[serde(default)]
    pub model: Option<String>,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Override for the provider API base, e.g. `http://localhost:8080/v1`.
    /// Each client appends its own request path: `/chat/completions` for
    /// OpenAI, `/models/{model}:generateContent` for Gemini.
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            timeout_secs: default_timeout_secs(),
            base_url: None,
        }
    }
}

/// Review store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite file.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    /// Name of the review table.
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("output.db")
}

fn default_table() -> String {
    "output".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            table: default_table(),
        }
    }
}

/// Execution safety settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SafetyConfig {
    /// How generated text is recognised as a query.
    #[serde(default)]
    pub gate: GateMode,

    /// Whether mutating statements may run and be committed.
    #[serde(default)]
    pub allow_writes: bool,
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("askdb")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AskError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            AskError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}

/// Values supplied on the command line (or through their `env` fallbacks).
///
/// Every field takes precedence over the config file when set.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub database: Option<PathBuf>,
    pub table: Option<String>,
    pub gate: Option<GateMode>,
    pub allow_writes: bool,
}

/// Fully resolved, immutable process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub provider: LlmProvider,
    pub model: String,
    pub timeout_secs: u64,
    pub base_url: Option<Url>,
    pub database_path: PathBuf,
    pub table: String,
    pub gate: GateMode,
    pub allow_writes: bool,
}

impl Settings {
    /// Resolves settings with precedence: overrides, config file, provider
    /// environment variables, built-in defaults.
    pub fn resolve(config: &Config, overrides: &SettingsOverrides) -> Result<Self> {
        let provider_name = overrides
            .provider
            .as_deref()
            .unwrap_or(config.llm.provider.as_str());
        let provider: LlmProvider = provider_name.parse().map_err(AskError::config)?;

        let model = overrides
            .model
            .clone()
            .or_else(|| config.llm.model.clone())
            .or_else(|| provider.model_env_var().and_then(|var| std::env::var(var).ok()))
            .unwrap_or_else(|| provider.default_model().to_string());

        if model.trim().is_empty() {
            return Err(AskError::config("Model name must not be empty"));
        }

        let base_url = config
            .llm
            .base_url
            .as_deref()
            .map(|raw| {
                Url::parse(raw)
                    .map_err(|e| AskError::config(format!("Invalid llm.base_url '{raw}': {e}")))
            })
            .transpose()?;

        if config.llm.timeout_secs == 0 {
            return Err(AskError::config("llm.timeout_secs must be greater than zero"));
        }

        let table = overrides
            .table
            .clone()
            .unwrap_or_else(|| config.database.table.clone());
        validate_table_name(&table)?;

        Ok(Self {
            provider,
            model,
            timeout_secs: config.llm.timeout_secs,
            base_url,
            database_path: overrides
                .database
                .clone()
                .unwrap_or_else(|| config.database.path.clone()),
            table,
            gate: overrides.gate.unwrap_or(config.safety.gate),
            allow_writes: overrides.allow_writes || config.safety.allow_writes,
        })
    }

    /// Returns a one-line description for logs. Never includes credentials.
    pub fn summary(&self) -> String {
        format!(
            "provider={} model={} db={} table={} gate={} allow_writes={}",
            self.provider,
            self.model,
            self.database_path.display(),
            self.table,
            self.gate,
            self.allow_writes
        )
    }
}

/// Table names end up quoted in SQL, but control characters never make sense.
fn validate_table_name(table: &str) -> Result<()> {
    if table.trim().is_empty() {
        return Err(AskError::config("Table name must not be empty"));
    }
    if table.chars().any(char::is_control) {
        return Err(AskError::config(format!(
            "Table name {table:?} contains control characters"
        )));
    }
    Ok(())
}
