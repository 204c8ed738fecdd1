use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::tempdir;

#[allow(deprecated)]
fn civic(store: &Path) -> Command {
    let mut cmd = Command::cargo_bin("civic").expect("binary");
    cmd.env_remove("CIVIC_CONFIG")
        .env("CIVIC_BACKEND", "file")
        .env("CIVIC_STORE_PATH", store)
        .env("RUST_LOG", "warn");
    cmd
}

fn run_json(cmd: &mut Command) -> (bool, Value) {
    let output = cmd.output().expect("command run");
    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    (output.status.success(), body)
}

#[test]
fn seed_then_invoke_reads_the_seeded_route() {
    let temp = tempdir().unwrap();
    let store = temp.path().join("civic.json");

    let (ok, report) = run_json(civic(&store).arg("seed"));
    assert!(ok, "{report}");
    assert_eq!(report["garbage_routes"], 20);

    let event = r#"{
        "messageVersion": "1.0",
        "actionGroup": "garbage",
        "function": "get_garbage_pickup_day",
        "parameters": [{"name": "district_id", "type": "string", "value": "C5"}],
        "sessionAttributes": {}
    }"#;
    let (ok, response) = run_json(civic(&store).args(["invoke", "--json", event]));
    assert!(ok, "{response}");
    assert_eq!(response["messageVersion"], "1.0");
    assert_eq!(response["response"]["actionGroup"], "garbage");
    assert_eq!(
        response["response"]["functionResponse"]["responseBody"]["TEXT"]["body"],
        "Garbage pickup route for district ID C5: Green"
    );
}

#[test]
fn call_books_a_park_and_dump_shows_the_row() {
    let temp = tempdir().unwrap();
    let store = temp.path().join("civic.json");

    civic(&store)
        .args([
            "call",
            "book_park",
            "-p",
            "park_id=P3",
            "-p",
            "reservation_date=2025-01-04",
            "-s",
            "citizenID=C77",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Created reservation for customer_id: C77 at park_id: P3 on 2025-01-04",
        ));

    let (ok, rows) = run_json(civic(&store).args(["dump", "PP3#"]));
    assert!(ok);
    assert_eq!(rows[0]["sk"], "R2025-01-04#");
    assert_eq!(rows[0]["data"], "C77");
}

#[test]
fn unknown_function_answers_with_the_fallback_text() {
    let temp = tempdir().unwrap();
    civic(&temp.path().join("civic.json"))
        .args(["call", "order_pizza"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Error, no function was called"));
}

#[test]
fn malformed_event_yields_error_envelope() {
    let temp = tempdir().unwrap();
    let (ok, body) = run_json(
        civic(&temp.path().join("civic.json")).args(["invoke", "--json", "{\"parameters\": 3}"]),
    );
    assert!(!ok);
    assert_eq!(body["code"], "invalid_event");
    assert!(body["hint"].is_string());
}

#[test]
fn ingest_without_analyzer_is_a_config_error() {
    let temp = tempdir().unwrap();
    let event = r#"{"Records": [{"s3": {"bucket": {"name": "b"}, "object": {"key": "form.pdf"}}}]}"#;
    let (ok, body) = run_json(
        civic(&temp.path().join("civic.json"))
            .env_remove("CIVIC_ANALYSIS_DIR")
            .env_remove("CIVIC_ANALYZER")
            .args(["ingest-form", "--json", event]),
    );
    assert!(!ok);
    assert_eq!(body["code"], "config_error");
}

#[test]
fn file_backend_without_path_fails_fast() {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("civic").expect("binary");
    cmd.env_remove("CIVIC_CONFIG")
        .env_remove("CIVIC_STORE_PATH")
        .env("CIVIC_BACKEND", "file")
        .arg("seed")
        .assert()
        .failure()
        .stderr(predicate::str::contains("file backend needs"));
}
