//! Query result types for askdb.
//!
//! Defines the structures used to represent rows coming back from the
//! review store.

use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// Represents the result of executing a SQL statement.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct QueryResult {
    /// Column metadata for the result set.
    pub columns: Vec<ColumnInfo>,

    /// Rows of data, in the order the statement produced them.
    pub rows: Vec<Row>,

    /// Time taken to execute the statement.
    #[serde(rename = "execution_time_ms", serialize_with = "serialize_millis")]
    pub execution_time: Duration,

    /// Number of rows returned.
    pub row_count: usize,

    /// Rows changed by a committed write; `None` for reads.
    pub rows_affected: Option<u64>,
}

impl QueryResult {
    /// Creates a new empty query result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query result with the given columns and rows.
    pub fn with_data(columns: Vec<ColumnInfo>, rows: Vec<Row>) -> Self {
        let row_count = rows.len();
        Self {
            columns,
            rows,
            execution_time: Duration::ZERO,
            row_count,
            rows_affected: None,
        }
    }

    /// Creates the result of a committed write.
    pub fn written(rows_affected: u64) -> Self {
        Self {
            rows_affected: Some(rows_affected),
            ..Self::default()
        }
    }

    /// Sets the execution time.
    pub fn with_execution_time(mut self, duration: Duration) -> Self {
        self.execution_time = duration;
        self
    }

    /// Returns true if the result set is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders each row as a tuple line, e.g. `(10)` or `('great phone', 5)`.
    pub fn tuple_lines(&self) -> Vec<String> {
        self.rows.iter().map(|row| format_row(row)).collect()
    }
}

/// Metadata about a column in a result set.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,

    /// Declared or observed SQLite type.
    pub data_type: String,
}

impl ColumnInfo {
    /// Creates a new column info with the given name and type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// A row of data from a query result.
pub type Row = Vec<Value>;

/// Formats a row as a parenthesised, comma-separated tuple.
pub fn format_row(row: &[Value]) -> String {
    let values = row
        .iter()
        .map(Value::to_tuple_field)
        .collect::<Vec<_>>()
        .join(", ");
    format!("({})", values)
}

/// A single SQLite value.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    /// NULL value.
    #[default]
    Null,

    /// INTEGER storage class.
    Int(i64),

    /// REAL storage class.
    Float(f64),

    /// TEXT storage class.
    String(String),

    /// BLOB storage class.
    Bytes(Vec<u8>),
}

impl Value {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Plain representation, used for table-like output.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::String(s) => s.clone(),
            Value::Bytes(b) => format!("<{} bytes>", b.len()),
        }
    }

    /// Representation inside a row tuple. Text is single-quoted as-is.
    pub fn to_tuple_field(&self) -> String {
        match self {
            Value::String(s) => format!("'{}'", s),
            Value::Bytes(b) => {
                let hex: String = b.iter().map(|byte| format!("{:02X}", byte)).collect();
                format!("X'{}'", hex)
            }
            other => other.to_display_string(),
        }
    }
}

/// Floats always carry a decimal point so `4.0` does not read as an integer.
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_display_string(), "NULL");
        assert_eq!(Value::Int(42).to_display_string(), "42");
        assert_eq!(Value::Float(2.71).to_display_string(), "2.71");
        assert_eq!(Value::Float(4.0).to_display_string(), "4.0");
        assert_eq!(
            Value::String("hello".to_string()).to_display_string(),
            "hello"
        );
        assert_eq!(Value::Bytes(vec![1, 2, 3]).to_display_string(), "<3 bytes>");
    }

    #[test]
    fn test_value_tuple_field() {
        assert_eq!(Value::Null.to_tuple_field(), "NULL");
        assert_eq!(Value::Int(10).to_tuple_field(), "10");
        assert_eq!(Value::from("great phone").to_tuple_field(), "'great phone'");
        assert_eq!(Value::from("it's fine").to_tuple_field(), "'it's fine'");
        assert_eq!(Value::Bytes(vec![0xAB, 0x01]).to_tuple_field(), "X'AB01'");
    }

    #[test]
    fn test_value_from_conversions() {
        assert_eq!(Value::from(42i64), Value::Int(42));
        assert_eq!(Value::from(2.71f64), Value::Float(2.71));
        assert_eq!(Value::from("hello"), Value::String("hello".to_string()));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(5i64)), Value::Int(5));
    }

    #[test]
    fn test_format_row() {
        assert_eq!(format_row(&[Value::Int(10)]), "(10)");
        assert_eq!(
            format_row(&[Value::from("some text"), Value::Int(5)]),
            "('some text', 5)"
        );
        assert_eq!(format_row(&[Value::Null, Value::Float(4.5)]), "(NULL, 4.5)");
        assert_eq!(
            format_row(&[Value::from("It's hard to believe"), Value::Float(3.0)]),
            "('It's hard to believe', 3.0)"
        );
        assert_eq!(format_row(&[]), "()");
    }

    #[test]
    fn test_query_result_with_data() {
        let columns = vec![
            ColumnInfo::new("reviewerName", "TEXT"),
            ColumnInfo::new("overall", "REAL"),
        ];
        let rows = vec![
            vec![Value::from("Alice"), Value::Float(5.0)],
            vec![Value::from("Bob"), Value::Float(1.0)],
        ];

        let result = QueryResult::with_data(columns, rows);

        assert!(!result.is_empty());
        assert_eq!(result.row_count, 2);
        assert_eq!(result.rows_affected, None);
        assert_eq!(
            result.tuple_lines(),
            vec!["('Alice', 5.0)".to_string(), "('Bob', 1.0)".to_string()]
        );
    }

    #[test]
    fn test_written_result() {
        let result = QueryResult::written(3).with_execution_time(Duration::from_millis(7));
        assert!(result.is_empty());
        assert_eq!(result.rows_affected, Some(3));
        assert_eq!(result.execution_time, Duration::from_millis(7));
    }

    #[test]
    fn test_serializes_plain_values() {
        let result = QueryResult::with_data(
            vec![ColumnInfo::new("n", "INTEGER")],
            vec![vec![Value::Int(10), Value::Null, Value::from("x")]],
        )
        .with_execution_time(Duration::from_millis(12));

        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["rows"][0], serde_json::json!([10, null, "x"]));
        assert_eq!(json["execution_time_ms"], 12);
        assert_eq!(json["columns"][0]["name"], "n");
    }
}
