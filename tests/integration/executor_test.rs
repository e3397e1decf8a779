//! Policy-checked execution against a real SQLite store.

use askdb::db::{DatabaseClient, Value};
use askdb::query::{ExecutionResult, QueryExecutor};
use askdb::safety::{ExecutionPolicy, SafetyLevel};
use pretty_assertions::assert_eq;

use super::common::{Fixture, REVIEW_COUNT};

async fn count(fixture: &Fixture) -> i64 {
    let result = fixture
        .store
        .execute_read("SELECT COUNT(*) FROM output")
        .await
        .unwrap();
    match result.rows[0][0] {
        Value::Int(n) => n,
        ref other => panic!("Expected integer count, got {:?}", other),
    }
}

#[tokio::test]
async fn test_count_formats_as_tuple() {
    let fixture = Fixture::loaded().await;
    let policy = ExecutionPolicy::new(["output"], false);
    let executor = QueryExecutor::new(&fixture.store, &policy);

    match executor.execute("SELECT COUNT(*) FROM output;").await.unwrap() {
        ExecutionResult::Executed {
            result,
            classification,
        } => {
            assert_eq!(classification.level, SafetyLevel::Safe);
            assert_eq!(result.columns[0].name, "COUNT(*)");
            assert_eq!(result.tuple_lines(), vec!["(10)".to_string()]);
            assert_eq!(result.rows_affected, None);
        }
        other => panic!("Expected execution, got {:?}", other),
    }
}

#[tokio::test]
async fn test_text_rows_keep_apostrophes() {
    let fixture = Fixture::loaded().await;
    let policy = ExecutionPolicy::new(["output"], false);
    let executor = QueryExecutor::new(&fixture.store, &policy);

    match executor
        .execute("SELECT reviewText, overall FROM output WHERE overall = 3")
        .await
        .unwrap()
    {
        ExecutionResult::Executed { result, .. } => {
            assert_eq!(
                result.tuple_lines(),
                vec!["('It's hard to believe how affordable digital has become.', 3.0)".to_string()]
            );
        }
        other => panic!("Expected execution, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cte_over_allowed_table_runs() {
    let fixture = Fixture::loaded().await;
    let policy = ExecutionPolicy::new(["output"], false);
    let executor = QueryExecutor::new(&fixture.store, &policy);

    let sql = "WITH rated AS (SELECT overall FROM output WHERE overall IS NOT NULL) \
               SELECT COUNT(*) FROM rated";
    match executor.execute(sql).await.unwrap() {
        ExecutionResult::Executed { result, .. } => {
            assert_eq!(result.rows, vec![vec![Value::Int(REVIEW_COUNT - 1)]]);
        }
        other => panic!("Expected execution, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_result_keeps_columns() {
    let fixture = Fixture::loaded().await;
    let policy = ExecutionPolicy::new(["output"], false);
    let executor = QueryExecutor::new(&fixture.store, &policy);

    match executor
        .execute("SELECT reviewText, overall FROM output WHERE overall > 5")
        .await
        .unwrap()
    {
        ExecutionResult::Executed { result, .. } => {
            assert!(result.is_empty());
            let names: Vec<&str> = result.columns.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(names, vec!["reviewText", "overall"]);
        }
        other => panic!("Expected execution, got {:?}", other),
    }
}

#[tokio::test]
async fn test_write_refused_by_default() {
    let fixture = Fixture::loaded().await;
    let policy = ExecutionPolicy::new(["output"], false);
    let executor = QueryExecutor::new(&fixture.store, &policy);

    let outcome = executor.execute("DELETE FROM output").await.unwrap();

    assert!(matches!(outcome, ExecutionResult::Refused { .. }));
    assert_eq!(count(&fixture).await, REVIEW_COUNT);
}

#[tokio::test]
async fn test_other_tables_refused() {
    let fixture = Fixture::loaded().await;
    let policy = ExecutionPolicy::new(["output"], false);
    let executor = QueryExecutor::new(&fixture.store, &policy);

    match executor.execute("SELECT * FROM sqlite_master").await.unwrap() {
        ExecutionResult::Refused { reason, .. } => {
            assert!(reason.contains("sqlite_master"), "{reason}");
        }
        other => panic!("Expected refusal, got {:?}", other),
    }
}

#[tokio::test]
async fn test_allowed_write_commits() {
    let fixture = Fixture::loaded().await;
    let policy = ExecutionPolicy::new(["output"], true);
    let executor = QueryExecutor::new(&fixture.store, &policy);

    match executor
        .execute("DELETE FROM output WHERE overall IS NULL")
        .await
        .unwrap()
    {
        ExecutionResult::Executed {
            result,
            classification,
        } => {
            assert_eq!(classification.level, SafetyLevel::Destructive);
            assert_eq!(result.rows_affected, Some(1));
        }
        other => panic!("Expected execution, got {:?}", other),
    }

    assert_eq!(count(&fixture).await, REVIEW_COUNT - 1);
}

#[tokio::test]
async fn test_failed_write_is_rolled_back() {
    let fixture = Fixture::loaded().await;
    let policy = ExecutionPolicy::new(["output"], true);
    let executor = QueryExecutor::new(&fixture.store, &policy);

    let err = executor
        .execute("UPDATE output SET missing_column = 1")
        .await
        .unwrap_err();

    assert_eq!(err.category(), "Query Error");
    assert_eq!(count(&fixture).await, REVIEW_COUNT);
}

#[tokio::test]
async fn test_missing_table_is_query_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = askdb::db::SqliteStore::new(dir.path().join("empty.db"));
    create_unrelated_table(&store).await;

    let policy = ExecutionPolicy::new(["output"], false);
    let executor = QueryExecutor::new(&store, &policy);

    let err = executor
        .execute("SELECT COUNT(*) FROM output")
        .await
        .unwrap_err();

    assert_eq!(err.category(), "Query Error");
    assert!(err.to_string().contains("no such table"));
}

/// Creates the database file with only a header-only `other` table in it.
async fn create_unrelated_table(store: &askdb::db::SqliteStore) {
    let dir = store.path().parent().unwrap().to_path_buf();
    let csv = dir.join("empty.csv");
    std::fs::write(&csv, "a,b\n").unwrap();
    askdb::ingest::load_csv(&csv, store, "other").await.unwrap();
}
