//! Request gate: decides whether sanitized model output is a query at all.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Literal marker used by the substring gate.
const SELECT_MARKER: &str = "SELECT";

/// Leading SQL comments, then a whole-word `SELECT` or `WITH`.
const LEADING_KEYWORD_PATTERN: &str = r"(?is)^\s*(?:(?:--[^\n]*(?:\n|$)|/\*.*?\*/)\s*)*(?:select|with)\b";

fn leading_keyword() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(LEADING_KEYWORD_PATTERN).expect("leading keyword pattern is valid")
    })
}

/// How the gate recognises an executable query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GateMode {
    /// Pass when the text contains `SELECT` anywhere (case-sensitive).
    Substring,
    /// Pass when the text starts with `SELECT` or `WITH`, ignoring case and
    /// leading comments.
    #[default]
    LeadingKeyword,
}

impl GateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Substring => "substring",
            Self::LeadingKeyword => "leading-keyword",
        }
    }
}

impl fmt::Display for GateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "substring" => Ok(Self::Substring),
            "leading-keyword" | "leading_keyword" | "keyword" => Ok(Self::LeadingKeyword),
            _ => Err(format!(
                "Unknown gate mode: {}. Expected substring or leading-keyword",
                s
            )),
        }
    }
}

/// Outcome of the request gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// The text looks like a query and carries on to classification.
    Execute(String),
    /// The text is not a query; only the raw model output is shown.
    Skip,
}

impl GateDecision {
    pub fn is_execute(&self) -> bool {
        matches!(self, Self::Execute(_))
    }
}

/// Checks sanitized model output before anything touches the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestGate {
    mode: GateMode,
}

impl RequestGate {
    pub fn new(mode: GateMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> GateMode {
        self.mode
    }

    /// Returns whether `sanitized` passes under the configured mode.
    pub fn passes(&self, sanitized: &str) -> bool {
        match self.mode {
            GateMode::Substring => sanitized.contains(SELECT_MARKER),
            GateMode::LeadingKeyword => leading_keyword().is_match(sanitized),
        }
    }

    /// Decides whether the sanitized text goes on to execution.
    pub fn check(&self, sanitized: &str) -> GateDecision {
        if self.passes(sanitized) {
            GateDecision::Execute(sanitized.to_string())
        } else {
            GateDecision::Skip
        }
    }
}
