//! Database schema types for askdb.
//!
//! Represents the tables and columns found in the review store.

use serde::Serialize;

/// Represents the schema of the review store.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Schema {
    /// All user tables, ordered by name.
    pub tables: Vec<Table>,
}

impl Schema {
    /// Creates a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a table by name, ignoring case.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|table| table.name.eq_ignore_ascii_case(name))
    }

    /// Formats the schema for terminal output.
    pub fn format_for_display(&self) -> String {
        if self.tables.is_empty() {
            return "Database Schema:\n\n(no tables)\n".to_string();
        }

        let tables_text = self
            .tables
            .iter()
            .map(format_table)
            .collect::<Vec<_>>()
            .join("\n");

        format!("Database Schema:\n\n{}", tables_text)
    }
}

fn format_table(table: &Table) -> String {
    let column_lines = table
        .columns
        .iter()
        .map(|column| format_column_line(table, column))
        .collect::<Vec<_>>()
        .join("");

    format!("Table: {}\n{}", table.name, column_lines)
}

fn format_column_line(table: &Table, column: &Column) -> String {
    let data_type = if column.data_type.is_empty() {
        "ANY"
    } else {
        column.data_type.as_str()
    };
    let annotations = [
        table.primary_key.contains(&column.name).then_some("PK"),
        (!column.is_nullable).then_some("NOT NULL"),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>();

    match (annotations.is_empty(), &column.default) {
        (false, Some(default)) => format!(
            "  - {}: {} ({}, DEFAULT {})\n",
            column.name,
            data_type,
            annotations.join(", "),
            default
        ),
        (false, None) => format!(
            "  - {}: {} ({})\n",
            column.name,
            data_type,
            annotations.join(", ")
        ),
        (true, Some(default)) => {
            format!("  - {}: {} (DEFAULT {})\n", column.name, data_type, default)
        }
        (true, None) => format!("  - {}: {}\n", column.name, data_type),
    }
}

/// Represents a database table.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Table {
    /// Table name.
    pub name: String,

    /// Columns in declaration order.
    pub columns: Vec<Column>,

    /// Column names that form the primary key.
    pub primary_key: Vec<String>,
}

impl Table {
    /// Creates a new table with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: Vec::new(),
        }
    }

    /// Returns the column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Represents a column in a table.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Declared type (e.g. "INTEGER", "TEXT"); empty when undeclared.
    pub data_type: String,

    /// Whether the column allows NULL values.
    pub is_nullable: bool,

    /// Default value expression, if any.
    pub default: Option<String>,
}

impl Column {
    /// Creates a new nullable column with the given name and data type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            is_nullable: true,
            default: None,
        }
    }

    /// Sets whether the column is nullable.
    pub fn nullable(self, nullable: bool) -> Self {
        Self {
            is_nullable: nullable,
            ..self
        }
    }

    /// Sets the default value.
    pub fn with_default(self, default: impl Into<String>) -> Self {
        Self {
            default: Some(default.into()),
            ..self
        }
    }
}
