//! CSV ingestion into the review store.
//!
//! Loading replaces the target table wholesale: the old table is dropped and
//! a new one created and filled in a single transaction, so running the same
//! load twice leaves an identical table.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::Serialize;
use sqlx::sqlite::SqliteArguments;
use sqlx::query::Query;
use sqlx::{Connection, Sqlite};
use tracing::{debug, info};

use crate::db::{OpenMode, SqliteStore};
use crate::error::{AskError, Result};

/// Storage affinity inferred for a CSV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Affinity {
    Integer,
    Real,
    Text,
}

impl Affinity {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Text => "TEXT",
        }
    }

    /// Narrowest affinity that still fits `field`, given what the column has
    /// seen so far. Affinity only ever widens.
    fn widen(self, field: &str) -> Self {
        match self {
            Self::Integer if field.parse::<i64>().is_ok() => Self::Integer,
            Self::Integer | Self::Real if field.parse::<f64>().is_ok() => Self::Real,
            _ => Self::Text,
        }
    }
}

impl fmt::Display for Affinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_sql())
    }
}

/// A column created by a load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedColumn {
    pub name: String,
    pub affinity: Affinity,
}

/// Summary of a completed load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub table: String,
    pub columns: Vec<LoadedColumn>,
    pub rows: usize,
}

/// Reads `csv_path` and replaces `table` in the store with its contents.
///
/// The first record is the header. Blank header cells are named
/// `Unnamed: <index>`. Empty fields are stored as NULL. The store file is
/// created if it does not exist yet.
pub async fn load_csv(csv_path: &Path, store: &SqliteStore, table: &str) -> Result<IngestReport> {
    let (headers, records) = read_csv(csv_path)?;
    let affinities = infer_affinities(headers.len(), &records);

    let columns: Vec<LoadedColumn> = headers
        .into_iter()
        .zip(affinities)
        .map(|(name, affinity)| LoadedColumn { name, affinity })
        .collect();

    debug!(
        "Inferred columns for {}: {:?}",
        csv_path.display(),
        columns
            .iter()
            .map(|c| format!("{} {}", c.name, c.affinity))
            .collect::<Vec<_>>()
    );

    write_table(store, table, &columns, &records).await?;

    info!(
        "Loaded {} rows into {} from {}",
        records.len(),
        table,
        csv_path.display()
    );

    Ok(IngestReport {
        table: table.to_string(),
        columns,
        rows: records.len(),
    })
}

/// Reads the header and every record, rejecting ragged rows.
fn read_csv(csv_path: &Path) -> Result<(Vec<String>, Vec<csv::StringRecord>)> {
    if !csv_path.is_file() {
        return Err(AskError::ingest(format!(
            "CSV file not found: {}",
            csv_path.display()
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(csv_path)
        .map_err(|e| AskError::ingest(format!("Failed to open {}: {e}", csv_path.display())))?;

    let header_record = reader
        .headers()
        .map_err(|e| AskError::ingest(format!("Failed to read CSV header: {e}")))?
        .clone();
    let headers = normalize_headers(&header_record)?;

    let records = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| AskError::ingest(format!("Malformed CSV record: {e}")))?;

    Ok((headers, records))
}

fn normalize_headers(record: &csv::StringRecord) -> Result<Vec<String>> {
    if record.is_empty() || record.iter().all(|h| h.trim().is_empty()) {
        return Err(AskError::ingest("CSV file has no header row"));
    }

    let mut seen = HashSet::new();
    let mut headers = Vec::with_capacity(record.len());

    for (i, raw) in record.iter().enumerate() {
        let name = match raw.trim() {
            "" => format!("Unnamed: {}", i),
            trimmed => trimmed.to_string(),
        };
        if !seen.insert(name.to_lowercase()) {
            return Err(AskError::ingest(format!(
                "Duplicate column name in CSV header: {}",
                name
            )));
        }
        headers.push(name);
    }

    Ok(headers)
}

/// Infers one affinity per column across all records.
fn infer_affinities(width: usize, records: &[csv::StringRecord]) -> Vec<Affinity> {
    let mut affinities = vec![Affinity::Integer; width];
    let mut seen_value = vec![false; width];

    for record in records {
        for (i, field) in record.iter().enumerate().take(width) {
            if field.is_empty() {
                continue;
            }
            seen_value[i] = true;
            affinities[i] = affinities[i].widen(field);
        }
    }

    // A column with no values at all carries no type evidence.
    affinities
        .into_iter()
        .zip(seen_value)
        .map(|(affinity, seen)| if seen { affinity } else { Affinity::Text })
        .collect()
}

/// Quotes an identifier for SQLite.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn create_table_sql(table: &str, columns: &[LoadedColumn]) -> String {
    let defs = columns
        .iter()
        .map(|c| format!("{} {}", quote_ident(&c.name), c.affinity.as_sql()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {} ({})", quote_ident(table), defs)
}

fn insert_sql(table: &str, columns: &[LoadedColumn]) -> String {
    let names = columns
        .iter()
        .map(|c| quote_ident(&c.name))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=columns.len())
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        names,
        placeholders
    )
}

fn bind_field<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    affinity: Affinity,
    field: &str,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    if field.is_empty() {
        return query.bind(None::<String>);
    }
    match affinity {
        Affinity::Integer => query.bind(field.parse::<i64>().ok()),
        Affinity::Real => query.bind(field.parse::<f64>().ok()),
        Affinity::Text => query.bind(field.to_string()),
    }
}

async fn write_table(
    store: &SqliteStore,
    table: &str,
    columns: &[LoadedColumn],
    records: &[csv::StringRecord],
) -> Result<()> {
    let mut conn = store.open(OpenMode::Create).await?;
    let mut tx = conn
        .begin()
        .await
        .map_err(|e| AskError::ingest(format!("Failed to begin transaction: {e}")))?;

    sqlx::query(&format!("DROP TABLE IF EXISTS {}", quote_ident(table)))
        .execute(&mut *tx)
        .await
        .map_err(|e| AskError::ingest(format!("Failed to drop {table}: {e}")))?;

    sqlx::query(&create_table_sql(table, columns))
        .execute(&mut *tx)
        .await
        .map_err(|e| AskError::ingest(format!("Failed to create {table}: {e}")))?;

    let insert = insert_sql(table, columns);
    for (line, record) in records.iter().enumerate() {
        let query = columns
            .iter()
            .zip(record.iter())
            .fold(sqlx::query(&insert), |query, (column, field)| {
                bind_field(query, column.affinity, field)
            });
        query.execute(&mut *tx).await.map_err(|e| {
            AskError::ingest(format!("Failed to insert record {}: {e}", line + 1))
        })?;
    }

    tx.commit()
        .await
        .map_err(|e| AskError::ingest(format!("Failed to commit load: {e}")))?;
    conn.close()
        .await
        .map_err(|e| AskError::ingest(format!("Failed to close database: {e}")))?;

    Ok(())
}
