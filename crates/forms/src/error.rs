use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Key block {key_id} has {count} VALUE targets, expected one")]
    AmbiguousPairing { key_id: String, count: usize },

    #[error("Block {id} referenced by {referenced_by} is missing or has the wrong type")]
    MissingBlock { id: String, referenced_by: String },
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Analysis job {job_id} failed: {message}")]
    AnalysisFailed { job_id: String, message: String },

    #[error("Analysis job {job_id} still running after {attempts} polls ({elapsed:?})")]
    AnalysisTimeout {
        job_id: String,
        attempts: u32,
        elapsed: Duration,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Analysis provider error: {0}")]
    Provider(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl AnalysisError {
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }
}
