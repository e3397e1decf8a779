//! Presentation of answers.
//!
//! Text output mirrors what a user sees interactively: the raw generated
//! response first, then one line per result row. JSON output serializes the
//! whole answer for scripting.

use std::fmt;
use std::str::FromStr;

use crate::app::{Answer, Outcome};
use crate::error::{AskError, Result};
use crate::safety::ClassificationResult;

/// How answers are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {}. Expected text or json", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Renders an answer in the requested format. The result has no trailing
/// newline.
pub fn render_answer(answer: &Answer, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(answer)),
        OutputFormat::Json => to_json(answer),
    }
}

fn render_text(answer: &Answer) -> String {
    let mut lines = vec![format!("Generated Response: {}", answer.generated)];

    match &answer.outcome {
        Outcome::NotAQuery => {}
        Outcome::Refused { reason, .. } => lines.push(format!("Refused: {}", reason)),
        Outcome::Executed { result, .. } => {
            lines.push("Database Query Results:".to_string());
            match result.rows_affected {
                Some(affected) => lines.push(format!("{} rows affected", affected)),
                None => lines.extend(result.tuple_lines()),
            }
        }
    }

    lines.join("\n")
}

/// Renders a classification for `askdb classify`.
pub fn render_classification(
    classification: &ClassificationResult,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(classification),
        OutputFormat::Text => {
            let mut text = format!(
                "Level: {}\nStatement: {}",
                classification.level, classification.statement_type
            );
            if let Some(warning) = &classification.warning {
                text.push_str("\nWarning: ");
                text.push_str(warning);
            }
            Ok(text)
        }
    }
}

/// Pretty-printed JSON for any serializable value.
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AskError::internal(format!("Failed to serialize output: {e}")))
}
