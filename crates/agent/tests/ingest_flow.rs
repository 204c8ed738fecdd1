use anyhow::Result;
use civic_agent::{Agent, AgentError};
use civic_forms::{LocalAnalyzer, PollPolicy};
use civic_protocol::S3Event;
use civic_store::MemoryStore;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn key_value(key_id: &str, value_id: &str, label: &str, answer: &str) -> Vec<serde_json::Value> {
    vec![
        json!({
            "Id": key_id,
            "BlockType": "KEY_VALUE_SET",
            "EntityTypes": ["KEY"],
            "Relationships": [
                {"Type": "VALUE", "Ids": [value_id]},
                {"Type": "CHILD", "Ids": [format!("{key_id}-w")]}
            ]
        }),
        json!({
            "Id": value_id,
            "BlockType": "KEY_VALUE_SET",
            "EntityTypes": ["VALUE"],
            "Relationships": [{"Type": "CHILD", "Ids": [format!("{value_id}-w")]}]
        }),
        json!({"Id": format!("{key_id}-w"), "BlockType": "WORD", "Text": label}),
        json!({"Id": format!("{value_id}-w"), "BlockType": "WORD", "Text": answer}),
    ]
}

fn save_analysis(dir: &Path, key: &str, pairs: &[(&str, &str)]) {
    let mut blocks = Vec::new();
    for (i, (label, answer)) in pairs.iter().enumerate() {
        blocks.extend(key_value(&format!("k{i}"), &format!("v{i}"), label, answer));
    }
    let doc = json!({"JobStatus": "SUCCEEDED", "Blocks": blocks});
    let path = dir.join("forms-bucket").join(format!("{key}.json"));
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, serde_json::to_vec_pretty(&doc).unwrap()).unwrap();
}

fn event(keys: &[&str]) -> S3Event {
    let records: Vec<_> = keys
        .iter()
        .map(|key| json!({"s3": {"bucket": {"name": "upload-bucket"}, "object": {"key": key}}}))
        .collect();
    serde_json::from_value(json!({ "Records": records })).unwrap()
}

fn agent(dir: &Path) -> Agent {
    let policy = PollPolicy {
        interval: Duration::from_millis(10),
        max_attempts: 3,
        deadline: Duration::from_secs(1),
    };
    Agent::new(Arc::new(MemoryStore::new()))
        .with_analyzer(Arc::new(LocalAnalyzer::new(dir)), policy)
        .with_ingest_bucket("forms-bucket")
}

#[tokio::test]
async fn field_ids_run_across_documents() -> Result<()> {
    let dir = TempDir::new()?;
    save_analysis(dir.path(), "permit page 1.pdf", &[("Name", "John"), ("Address", "Main St")]);
    save_analysis(dir.path(), "permit page 2.pdf", &[("Signature", "X"), ("Name", "John")]);
    let agent = agent(dir.path());

    let report = agent
        .ingest(&event(&["permit+page+1.pdf", "permit%20page%202.pdf"]))
        .await?;

    assert_eq!(report.documents.len(), 2);
    assert_eq!(report.field_count(), 4);
    assert_eq!(report.documents[0].location.bucket, "forms-bucket");
    assert_eq!(report.documents[1].location.key, "permit page 2.pdf");

    let fields = agent.records().form_template_fields(&report.template_id).await?;
    let names: Vec<_> = fields
        .iter()
        .map(|f| (f.field_id.as_str(), f.definition.field_name.as_str(), f.definition.is_required))
        .collect();
    assert_eq!(
        names,
        vec![
            ("0", "Name", false),
            ("1", "Address", false),
            ("2", "Signature", false),
            ("3", "Name", false),
        ]
    );

    let template = agent.records().form_template(&report.template_id).await?;
    assert!(template.is_some_and(|data| data.starts_with("Created ")));
    Ok(())
}

#[tokio::test]
async fn ingestion_needs_an_analyzer_and_objects() -> Result<()> {
    let dir = TempDir::new()?;

    let bare = Agent::new(Arc::new(MemoryStore::new()));
    let err = bare.ingest(&event(&["form.pdf"])).await.unwrap_err();
    assert!(matches!(err, AgentError::NotConfigured(_)), "{err}");

    let err = agent(dir.path()).ingest(&S3Event::default()).await.unwrap_err();
    assert!(matches!(err, AgentError::InvalidEvent(_)), "{err}");

    save_analysis(dir.path(), "page 1.pdf", &[("Name", "John")]);
    let store = Arc::new(MemoryStore::new());
    let policy = PollPolicy {
        interval: Duration::from_millis(10),
        max_attempts: 3,
        deadline: Duration::from_secs(1),
    };
    let agent = Agent::new(store.clone())
        .with_analyzer(Arc::new(LocalAnalyzer::new(dir.path())), policy)
        .with_ingest_bucket("forms-bucket");
    let err = agent
        .ingest(&event(&["page+1.pdf", "never-uploaded.pdf"]))
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::Analysis(_)), "{err}");
    // The readable first page must not leave a half-built template behind.
    assert!(store.is_empty().await, "{} rows left", store.len().await);
    Ok(())
}
