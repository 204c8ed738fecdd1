use crate::block::Block;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Object-store location of a document to analyze.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentLocation {
    pub bucket: String,
    pub key: String,
}

impl DocumentLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for DocumentLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    InProgress,
    Succeeded,
    Failed,
    PartialSuccess,
}

impl JobStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::Succeeded => "SUCCEEDED",
            JobStatus::Failed => "FAILED",
            JobStatus::PartialSuccess => "PARTIAL_SUCCESS",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "IN_PROGRESS" => Some(JobStatus::InProgress),
            "SUCCEEDED" => Some(JobStatus::Succeeded),
            "FAILED" => Some(JobStatus::Failed),
            "PARTIAL_SUCCESS" => Some(JobStatus::PartialSuccess),
            _ => None,
        }
    }

    fn completed() -> Self {
        JobStatus::Succeeded
    }
}

/// One status check of an analysis job; `blocks` is only meaningful once it finished.
///
/// Deserializes from a saved `GetDocumentAnalysis` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisPoll {
    #[serde(rename = "JobStatus", default = "JobStatus::completed")]
    pub status: JobStatus,

    #[serde(rename = "Blocks", default)]
    pub blocks: Vec<Block>,

    #[serde(rename = "StatusMessage", default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
}

impl AnalysisPoll {
    pub fn in_progress() -> Self {
        Self {
            status: JobStatus::InProgress,
            blocks: Vec::new(),
            status_message: None,
        }
    }

    pub fn finished(blocks: Vec<Block>) -> Self {
        Self {
            status: JobStatus::Succeeded,
            blocks,
            status_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            blocks: Vec::new(),
            status_message: Some(message.into()),
        }
    }
}

/// Asynchronous form analysis: start a job, then poll it until it finishes.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Start analysis and return the job id.
    async fn start_analysis(&self, location: &DocumentLocation) -> Result<String>;

    async fn poll_analysis(&self, job_id: &str) -> Result<AnalysisPoll>;
}
