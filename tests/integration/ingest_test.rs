//! Loading the review CSV into SQLite.

use askdb::db::{DatabaseClient, SqliteStore, Value};
use askdb::ingest::{load_csv, Affinity};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use super::common::{write_reviews_csv, REVIEW_COUNT};

async fn dump(store: &SqliteStore) -> Vec<Vec<Value>> {
    store
        .execute_read("SELECT * FROM output ORDER BY \"Unnamed: 0\"")
        .await
        .unwrap()
        .rows
}

#[tokio::test]
async fn test_load_creates_table_with_inferred_types() {
    let dir = TempDir::new().unwrap();
    let csv = write_reviews_csv(dir.path());
    let store = SqliteStore::new(dir.path().join("output.db"));

    let report = load_csv(&csv, &store, "output").await.unwrap();

    assert_eq!(report.table, "output");
    assert_eq!(report.rows, REVIEW_COUNT as usize);

    let typed: Vec<(&str, Affinity)> = report
        .columns
        .iter()
        .map(|c| (c.name.as_str(), c.affinity))
        .collect();
    assert_eq!(
        typed,
        vec![
            ("Unnamed: 0", Affinity::Integer),
            ("reviewerID", Affinity::Text),
            ("asin", Affinity::Text),
            ("reviewerName", Affinity::Text),
            ("helpful", Affinity::Text),
            ("reviewText", Affinity::Text),
            ("overall", Affinity::Real),
            ("summary", Affinity::Text),
            ("unixReviewTime", Affinity::Integer),
            ("reviewTime", Affinity::Text),
            ("day_diff", Affinity::Integer),
            ("helpful_yes", Affinity::Integer),
            ("total_vote", Affinity::Integer),
        ]
    );

    let schema = store.introspect_schema().await.unwrap();
    let table = schema.table("output").expect("output table");
    assert_eq!(table.columns.len(), 13);
    assert_eq!(table.columns[6].data_type, "REAL");
}

#[tokio::test]
async fn test_load_stores_empty_fields_as_null() {
    let dir = TempDir::new().unwrap();
    let csv = write_reviews_csv(dir.path());
    let store = SqliteStore::new(dir.path().join("output.db"));
    load_csv(&csv, &store, "output").await.unwrap();

    let result = store
        .execute_read("SELECT overall, helpful_yes FROM output WHERE reviewerName = '53rdcard'")
        .await
        .unwrap();

    assert_eq!(result.rows, vec![vec![Value::Null, Value::Int(2)]]);
}

#[tokio::test]
async fn test_reload_replaces_table() {
    let dir = TempDir::new().unwrap();
    let csv = write_reviews_csv(dir.path());
    let store = SqliteStore::new(dir.path().join("output.db"));

    load_csv(&csv, &store, "output").await.unwrap();
    let first = dump(&store).await;
    load_csv(&csv, &store, "output").await.unwrap();
    let second = dump(&store).await;

    assert_eq!(first.len(), REVIEW_COUNT as usize);
    assert_eq!(first, second);
    assert_eq!(store.table_names().await.unwrap(), vec!["output".to_string()]);
}

#[tokio::test]
async fn test_load_into_custom_table_keeps_others() {
    let dir = TempDir::new().unwrap();
    let csv = write_reviews_csv(dir.path());
    let store = SqliteStore::new(dir.path().join("reviews.db"));

    load_csv(&csv, &store, "output").await.unwrap();
    load_csv(&csv, &store, "reviews").await.unwrap();

    assert_eq!(
        store.table_names().await.unwrap(),
        vec!["output".to_string(), "reviews".to_string()]
    );
}

#[tokio::test]
async fn test_missing_csv_is_ingest_error() {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::new(dir.path().join("output.db"));

    let err = load_csv(&dir.path().join("missing.csv"), &store, "output")
        .await
        .unwrap_err();

    assert_eq!(err.category(), "Ingest Error");
    assert!(!store.path().exists());
}

#[tokio::test]
async fn test_ragged_csv_is_rejected_without_touching_store() {
    let dir = TempDir::new().unwrap();
    let good = write_reviews_csv(dir.path());
    let store = SqliteStore::new(dir.path().join("output.db"));
    load_csv(&good, &store, "output").await.unwrap();

    let bad = dir.path().join("bad.csv");
    std::fs::write(&bad, "reviewerID,overall\nA1,5.0\nA2,4.0,extra\n").unwrap();

    let err = load_csv(&bad, &store, "output").await.unwrap_err();

    assert_eq!(err.category(), "Ingest Error");
    assert_eq!(dump(&store).await.len(), REVIEW_COUNT as usize);
}
