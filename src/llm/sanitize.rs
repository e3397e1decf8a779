//! Cleanup of model output before it is treated as SQL.
//!
//! Models commonly wrap generated code in markdown fences. The sanitizer
//! removes the SQL-tagged opener and every bare fence, then trims. It does
//! not try to separate prose from code.

/// Fence opener tagged as SQL.
const SQL_FENCE: &str = "```sql";

/// Generic fence marker (opener or closer).
const FENCE: &str = "```";

/// Removes every code-fence marker from `text` and trims the result.
///
/// Idempotent: applying it to its own output changes nothing.
pub fn sanitize_sql(text: &str) -> String {
    let mut cleaned = text.replace(SQL_FENCE, "").replace(FENCE, "");

    // Removing one marker can splice backticks into a new one (e.g. "``````").
    while cleaned.contains(FENCE) {
        cleaned = cleaned.replace(FENCE, "");
    }

    cleaned.trim().to_string()
}
