use crate::analyzer::{DocumentAnalyzer, DocumentLocation, JobStatus};
use crate::block::Block;
use crate::error::{AnalysisError, Result};
use crate::graph::{resolve_blocks, ResolvedForm};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// Bounds for waiting on an analysis job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollPolicy {
    /// Pause between two status checks
    pub interval: Duration,

    /// Status checks before giving up
    pub max_attempts: u32,

    /// Wall-clock budget for the whole wait
    pub deadline: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 150,
            deadline: Duration::from_secs(300),
        }
    }
}

/// Poll `job_id` until it leaves `IN_PROGRESS` or the policy runs out.
pub async fn wait_for_analysis(
    analyzer: &dyn DocumentAnalyzer,
    job_id: &str,
    policy: &PollPolicy,
) -> Result<Vec<Block>> {
    let started = Instant::now();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let poll = analyzer.poll_analysis(job_id).await?;
        match poll.status {
            JobStatus::Succeeded => {
                log::debug!("Job {job_id} finished after {attempts} polls");
                return Ok(poll.blocks);
            }
            JobStatus::PartialSuccess => {
                log::warn!(
                    "Job {job_id} partially succeeded: {}",
                    poll.status_message.as_deref().unwrap_or("no status message")
                );
                return Ok(poll.blocks);
            }
            JobStatus::Failed => {
                return Err(AnalysisError::AnalysisFailed {
                    job_id: job_id.to_string(),
                    message: poll
                        .status_message
                        .unwrap_or_else(|| "no status message".to_string()),
                });
            }
            JobStatus::InProgress => {}
        }

        let elapsed = started.elapsed();
        if attempts >= policy.max_attempts || elapsed + policy.interval > policy.deadline {
            return Err(AnalysisError::AnalysisTimeout {
                job_id: job_id.to_string(),
                attempts,
                elapsed,
            });
        }

        log::info!("Waiting for analysis job {job_id}");
        tokio::time::sleep(policy.interval).await;
    }
}

/// Start analysis of `location`, wait for it and resolve the labelled fields.
pub async fn analyze_document(
    analyzer: &dyn DocumentAnalyzer,
    location: &DocumentLocation,
    policy: &PollPolicy,
) -> Result<ResolvedForm> {
    let job_id = analyzer.start_analysis(location).await?;
    log::info!("Started {} analysis job {job_id} for {location}", analyzer.name());
    let blocks = wait_for_analysis(analyzer, &job_id, policy).await?;
    Ok(resolve_blocks(&blocks)?)
}
