//! askdb - ask a review dataset questions in plain language.

mod cli;

use std::io::{self, BufRead, Write};

use askdb::app::Orchestrator;
use askdb::config::{Config, Settings};
use askdb::db::{DatabaseClient, SqliteStore};
use askdb::error::{AskError, Result};
use askdb::ingest::load_csv;
use askdb::llm::create_client;
use askdb::logging::init_stderr_logging;
use askdb::output::{render_answer, render_classification, to_json, OutputFormat};
use askdb::safety::classify_sql;
use cli::{Cli, Command};
use tracing::{debug, error, info};

fn main() {
    // .env must be loaded before clap reads its env fallbacks
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse_args();
    init_stderr_logging(cli.verbose);

    match dotenv {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => error!("Failed to load .env: {}", e),
    }

    if let Err(e) = run(cli) {
        error!("{}: {}", e.category(), e);
        eprintln!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;
    let settings = Settings::resolve(&config, &cli.overrides())?;
    info!("Settings: {}", settings.summary());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| AskError::internal(format!("Failed to start runtime: {e}")))?;

    runtime.block_on(dispatch(cli.command, cli.format, settings))
}

async fn dispatch(command: Command, format: OutputFormat, settings: Settings) -> Result<()> {
    match command {
        Command::Ask { question } => {
            let orchestrator = build_orchestrator(&settings)?;
            let answer = orchestrator.ask(&question.join(" ")).await?;
            println!("{}", render_answer(&answer, format)?);
            Ok(())
        }
        Command::Repl => {
            let orchestrator = build_orchestrator(&settings)?;
            repl(&orchestrator, format).await
        }
        Command::Load { csv } => {
            let store = SqliteStore::new(&settings.database_path);
            let report = load_csv(&csv, &store, &settings.table).await?;
            match format {
                OutputFormat::Json => println!("{}", to_json(&report)?),
                OutputFormat::Text => println!(
                    "Loaded {} rows into table '{}' ({} columns)",
                    report.rows,
                    report.table,
                    report.columns.len()
                ),
            }
            Ok(())
        }
        Command::Schema => {
            let store = SqliteStore::new(&settings.database_path);
            let schema = store.introspect_schema().await?;
            match format {
                OutputFormat::Json => println!("{}", to_json(&schema)?),
                OutputFormat::Text => print!("{}", schema.format_for_display()),
            }
            Ok(())
        }
        Command::Classify { sql } => {
            println!("{}", render_classification(&classify_sql(&sql), format)?);
            Ok(())
        }
    }
}

/// Builds the pipeline. A missing API key fails here, before any question
/// is read.
fn build_orchestrator(settings: &Settings) -> Result<Orchestrator> {
    let client = create_client(settings, None)?;
    Ok(Orchestrator::from_settings(settings, client))
}

/// Answers one question per stdin line until EOF. A failed question is
/// reported and the loop moves on.
async fn repl(orchestrator: &Orchestrator, format: OutputFormat) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout
            .flush()
            .map_err(|e| AskError::internal(format!("Failed to write prompt: {e}")))?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| AskError::internal(format!("Failed to read input: {e}")))?;
        if read == 0 {
            println!();
            return Ok(());
        }

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if matches!(question, "exit" | "quit") {
            return Ok(());
        }

        match orchestrator.ask(question).await {
            Ok(answer) => println!("{}", render_answer(&answer, format)?),
            Err(e) => {
                error!("{}: {}", e.category(), e);
                eprintln!("{}: {}", e.category(), e);
            }
        }
    }
}
