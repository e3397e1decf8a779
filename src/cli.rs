//! Command-line argument parsing for askdb.

use askdb::config::{Config, SettingsOverrides};
use askdb::output::OutputFormat;
use askdb::safety::GateMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ask questions about a review dataset in plain language.
#[derive(Parser, Debug)]
#[command(name = "askdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long = "db", value_name = "PATH", env = "ASKDB_DATABASE", global = true)]
    pub database: Option<PathBuf>,

    /// Table holding the reviews
    #[arg(long, value_name = "NAME", global = true)]
    pub table: Option<String>,

    /// LLM provider (gemini, openai, mock)
    #[arg(long, value_name = "PROVIDER", env = "ASKDB_PROVIDER", global = true)]
    pub provider: Option<String>,

    /// Model identifier
    #[arg(long, value_name = "MODEL", env = "ASKDB_MODEL", global = true)]
    pub model: Option<String>,

    /// How generated text is recognised as a query (substring, leading-keyword)
    #[arg(long, value_name = "MODE", global = true)]
    pub gate: Option<GateMode>,

    /// Run and commit statements that modify the database
    #[arg(long, global = true)]
    pub allow_writes: bool,

    /// Output format (text, json)
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ask a single question and print the answer
    Ask {
        /// The question, in plain language
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Read questions from stdin, one per line
    Repl,
    /// Replace the review table with the contents of a CSV file
    Load {
        /// CSV file with a header row
        #[arg(value_name = "CSV")]
        csv: PathBuf,
    },
    /// Print the database schema
    Schema,
    /// Classify a SQL statement without calling the model
    Classify {
        /// SQL to classify
        sql: String,
    },
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Collects the flags that take precedence over the config file.
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            provider: self.provider.clone(),
            model: self.model.clone(),
            database: self.database.clone(),
            table: self.table.clone(),
            gate: self.gate,
            allow_writes: self.allow_writes,
        }
    }
}
