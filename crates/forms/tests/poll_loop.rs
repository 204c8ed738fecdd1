use async_trait::async_trait;
use civic_forms::{
    analyze_document, wait_for_analysis, AnalysisError, AnalysisPoll, Block, DocumentAnalyzer,
    DocumentLocation, EntityType, PollPolicy, RelationshipType,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Answers polls from a fixed script, repeating the last answer once it runs out.
struct ScriptedAnalyzer {
    script: Mutex<VecDeque<AnalysisPoll>>,
    polls: AtomicU32,
}

impl ScriptedAnalyzer {
    fn new(script: Vec<AnalysisPoll>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            polls: AtomicU32::new(0),
        }
    }

    fn polls(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentAnalyzer for ScriptedAnalyzer {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn start_analysis(&self, _location: &DocumentLocation) -> civic_forms::Result<String> {
        Ok("job-1".to_string())
    }

    async fn poll_analysis(&self, _job_id: &str) -> civic_forms::Result<AnalysisPoll> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        let next = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };
        Ok(next.unwrap_or_else(AnalysisPoll::in_progress))
    }
}

fn policy() -> PollPolicy {
    PollPolicy {
        interval: Duration::from_secs(2),
        max_attempts: 10,
        deadline: Duration::from_secs(60),
    }
}

fn name_blocks() -> Vec<Block> {
    vec![
        Block::key_value_set("k1", EntityType::Key)
            .with_relationship(RelationshipType::Value, ["v1"])
            .with_relationship(RelationshipType::Child, ["w1"]),
        Block::key_value_set("v1", EntityType::Value)
            .with_relationship(RelationshipType::Child, ["w2"]),
        Block::word("w1", "Name"),
        Block::word("w2", "Jane"),
    ]
}

#[tokio::test(start_paused = true)]
async fn returns_blocks_after_exactly_two_waits() {
    let analyzer = ScriptedAnalyzer::new(vec![
        AnalysisPoll::in_progress(),
        AnalysisPoll::in_progress(),
        AnalysisPoll::finished(name_blocks()),
    ]);
    let started = Instant::now();

    let blocks = wait_for_analysis(&analyzer, "job-1", &policy()).await.unwrap();

    assert_eq!(blocks.len(), 4);
    assert_eq!(analyzer.polls(), 3);
    assert_eq!(started.elapsed(), Duration::from_secs(4));
}

#[tokio::test(start_paused = true)]
async fn failed_job_stops_polling() {
    let analyzer = ScriptedAnalyzer::new(vec![
        AnalysisPoll::in_progress(),
        AnalysisPoll::failed("unsupported document"),
        AnalysisPoll::finished(name_blocks()),
    ]);

    let err = wait_for_analysis(&analyzer, "job-1", &policy())
        .await
        .unwrap_err();

    match err {
        AnalysisError::AnalysisFailed { job_id, message } => {
            assert_eq!(job_id, "job-1");
            assert_eq!(message, "unsupported document");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(analyzer.polls(), 2);
}

#[tokio::test(start_paused = true)]
async fn attempt_bound_yields_timeout() {
    let analyzer = ScriptedAnalyzer::new(vec![AnalysisPoll::in_progress()]);
    let policy = PollPolicy {
        max_attempts: 3,
        ..policy()
    };

    let err = wait_for_analysis(&analyzer, "job-1", &policy)
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::AnalysisTimeout { attempts: 3, .. }));
    assert_eq!(analyzer.polls(), 3);
}

#[tokio::test(start_paused = true)]
async fn deadline_bound_yields_timeout() {
    let analyzer = ScriptedAnalyzer::new(vec![AnalysisPoll::in_progress()]);
    let policy = PollPolicy {
        interval: Duration::from_secs(2),
        max_attempts: 1_000,
        deadline: Duration::from_secs(5),
    };

    let err = wait_for_analysis(&analyzer, "job-1", &policy)
        .await
        .unwrap_err();

    // Polls at t=0, 2s and 4s; a fourth wait would cross the deadline.
    assert!(matches!(err, AnalysisError::AnalysisTimeout { attempts: 3, .. }));
}

#[tokio::test(start_paused = true)]
async fn analyze_document_resolves_labels() {
    let analyzer = ScriptedAnalyzer::new(vec![
        AnalysisPoll::in_progress(),
        AnalysisPoll::finished(name_blocks()),
    ]);

    let form = analyze_document(
        &analyzer,
        &DocumentLocation::new("forms", "permit.pdf"),
        &policy(),
    )
    .await
    .unwrap();

    assert_eq!(form.labels(), vec!["Name"]);
    assert_eq!(form.fields()[0].values, vec!["Jane".to_string()]);
}
