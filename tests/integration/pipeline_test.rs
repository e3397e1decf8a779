//! End-to-end question answering against a loaded SQLite store.

use askdb::app::{Orchestrator, Outcome};
use askdb::config::SettingsOverrides;
use askdb::db::{SqliteStore, Value};
use askdb::llm::{create_client, FailingLlmClient, MockLlmClient, PromptContext, Translator};
use askdb::output::{render_answer, OutputFormat};
use askdb::safety::{ExecutionPolicy, GateMode, RequestGate, SafetyLevel};
use pretty_assertions::assert_eq;

use super::common::{Fixture, REVIEW_COUNT};

/// Orchestrator over the fixture store with a scripted model.
fn scripted(fixture: &Fixture, llm: MockLlmClient, gate: GateMode, allow_writes: bool) -> Orchestrator {
    Orchestrator::new(
        Translator::new(Box::new(llm), PromptContext::for_table("output")),
        Box::new(fixture.store.clone()),
        RequestGate::new(gate),
        ExecutionPolicy::new(["output"], allow_writes),
    )
}

#[tokio::test]
async fn test_count_question_returns_single_row() {
    let fixture = Fixture::loaded().await;
    let settings = fixture.settings(SettingsOverrides::default());
    let orchestrator = Orchestrator::from_settings(&settings, create_client(&settings, None).unwrap());

    let answer = orchestrator
        .ask("How many reviews of item X are present?")
        .await
        .unwrap();

    assert_eq!(answer.sql.as_deref(), Some("SELECT COUNT(*) FROM output;"));
    let result = answer.result().expect("executed");
    assert_eq!(result.rows, vec![vec![Value::Int(REVIEW_COUNT)]]);
    assert_eq!(
        render_answer(&answer, OutputFormat::Text).unwrap(),
        "Generated Response: SELECT COUNT(*) FROM output;\nDatabase Query Results:\n(10)"
    );
}

#[tokio::test]
async fn test_invalid_query_is_not_executed() {
    let fixture = Fixture::loaded().await;
    let settings = fixture.settings(SettingsOverrides {
        gate: Some(GateMode::Substring),
        ..Default::default()
    });
    let orchestrator = Orchestrator::from_settings(&settings, create_client(&settings, None).unwrap());

    let answer = orchestrator.ask("Tell me a joke").await.unwrap();

    assert_eq!(answer.outcome, Outcome::NotAQuery);
    assert_eq!(
        render_answer(&answer, OutputFormat::Text).unwrap(),
        "Generated Response: Invalid query."
    );
}

#[tokio::test]
async fn test_fenced_select_is_stripped_and_executed() {
    let fixture = Fixture::loaded().await;
    let settings = fixture.settings(SettingsOverrides::default());
    let orchestrator = Orchestrator::from_settings(&settings, create_client(&settings, None).unwrap());

    let answer = orchestrator
        .ask("Give me all the reviews with a rating of 5.")
        .await
        .unwrap();

    assert_eq!(
        answer.generated,
        "```sql\nSELECT reviewText FROM output WHERE overall = 5;\n```"
    );
    assert_eq!(
        answer.sql.as_deref(),
        Some("SELECT reviewText FROM output WHERE overall = 5;")
    );

    let result = answer.result().expect("executed");
    assert_eq!(result.row_count, 6);
    assert!(result.rows.iter().all(|row| row.len() == 1));
    assert_eq!(
        result.rows[0],
        vec![Value::from(
            "Purchased this for my device, it worked as advertised."
        )]
    );
}

#[tokio::test]
async fn test_repeated_reads_are_identical() {
    let fixture = Fixture::loaded().await;
    let settings = fixture.settings(SettingsOverrides::default());
    let orchestrator = Orchestrator::from_settings(&settings, create_client(&settings, None).unwrap());

    let first = orchestrator
        .ask("Give me all the reviews with a rating of 5.")
        .await
        .unwrap();
    let second = orchestrator
        .ask("Give me all the reviews with a rating of 5.")
        .await
        .unwrap();

    assert_eq!(first.result().unwrap().rows, second.result().unwrap().rows);
}

#[tokio::test]
async fn test_model_delete_is_refused_and_store_untouched() {
    let fixture = Fixture::loaded().await;
    let llm = MockLlmClient::new().with_response(
        "worst",
        "```sql\nDELETE FROM output WHERE overall = (SELECT MIN(overall) FROM output);\n```",
    );
    let orchestrator = scripted(&fixture, llm, GateMode::Substring, false);

    let answer = orchestrator.ask("Drop the worst reviews").await.unwrap();

    match &answer.outcome {
        Outcome::Refused {
            classification,
            reason,
        } => {
            assert_eq!(classification.level, SafetyLevel::Destructive);
            assert!(reason.contains("writes are not allowed"), "{reason}");
        }
        other => panic!("Expected refusal, got {:?}", other),
    }

    assert!(fixture.store.has_table("output").await.unwrap());
    let remaining = scripted(&fixture, MockLlmClient::new(), GateMode::LeadingKeyword, false)
        .ask("How many reviews are there?")
        .await
        .unwrap();
    assert_eq!(
        remaining.result().unwrap().rows,
        vec![vec![Value::Int(REVIEW_COUNT)]]
    );
}

#[tokio::test]
async fn test_allowed_write_is_committed() {
    let fixture = Fixture::loaded().await;
    let llm = MockLlmClient::new().with_response(
        "round up",
        "UPDATE output SET overall = 5 WHERE reviewerID IN (SELECT reviewerID FROM output WHERE overall = 4)",
    );
    let orchestrator = scripted(&fixture, llm, GateMode::Substring, true);

    let answer = orchestrator.ask("round up the four star reviews").await.unwrap();
    assert_eq!(answer.result().unwrap().rows_affected, Some(2));

    let reader = scripted(&fixture, MockLlmClient::new(), GateMode::LeadingKeyword, false);
    let fives = reader
        .ask("Give me all the reviews with a rating of 5.")
        .await
        .unwrap();
    assert_eq!(fives.result().unwrap().row_count, 8);
}

#[tokio::test]
async fn test_several_statements_are_refused() {
    let fixture = Fixture::loaded().await;
    let llm = MockLlmClient::new().with_response(
        "both",
        "SELECT COUNT(*) FROM output; SELECT reviewText FROM output",
    );
    let orchestrator = scripted(&fixture, llm, GateMode::LeadingKeyword, true);

    let answer = orchestrator.ask("count and list both").await.unwrap();

    match &answer.outcome {
        Outcome::Refused {
            classification,
            reason,
        } => {
            assert_eq!(classification.level, SafetyLevel::Safe);
            assert!(reason.contains("more than one statement"), "{reason}");
        }
        other => panic!("Expected refusal, got {:?}", other),
    }
    assert!(answer.result().is_none());
}

#[tokio::test]
async fn test_leading_keyword_gate_skips_prose_with_select() {
    let fixture = Fixture::loaded().await;
    let llm = MockLlmClient::new().with_response("weather", "I cannot SELECT weather data.");

    let keyword = scripted(&fixture, llm, GateMode::LeadingKeyword, false);
    let answer = keyword.ask("weather today?").await.unwrap();
    assert_eq!(answer.outcome, Outcome::NotAQuery);
}

#[tokio::test]
async fn test_model_failure_ends_request() {
    let fixture = Fixture::loaded().await;
    let orchestrator = Orchestrator::new(
        Translator::new(
            Box::new(FailingLlmClient::new("API key not valid")),
            PromptContext::for_table("output"),
        ),
        Box::new(fixture.store.clone()),
        RequestGate::default(),
        ExecutionPolicy::new(["output"], false),
    );

    let err = orchestrator.ask("How many reviews?").await.unwrap_err();

    assert_eq!(err.category(), "LLM Error");
    assert!(err.to_string().contains("API key not valid"));
}

#[tokio::test]
async fn test_bad_sql_is_query_error() {
    let fixture = Fixture::loaded().await;
    let llm = MockLlmClient::new().with_response("typo", "SELECT reviewTxt FROM output;");
    let orchestrator = scripted(&fixture, llm, GateMode::LeadingKeyword, false);

    let err = orchestrator.ask("typo question").await.unwrap_err();

    assert_eq!(err.category(), "Query Error");
    assert!(err.to_string().contains("no such column"));
}

#[tokio::test]
async fn test_missing_database_is_connection_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let orchestrator = Orchestrator::new(
        Translator::new(Box::new(MockLlmClient::new()), PromptContext::for_table("output")),
        Box::new(SqliteStore::new(dir.path().join("output.db"))),
        RequestGate::default(),
        ExecutionPolicy::new(["output"], false),
    );

    let err = orchestrator.ask("How many reviews?").await.unwrap_err();

    assert_eq!(err.category(), "Connection Error");
    assert!(!dir.path().join("output.db").exists());
}
