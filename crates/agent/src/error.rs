use civic_aws::AwsError;
use civic_forms::AnalysisError;
use civic_keyspace::KeyError;
use civic_protocol::RequestError;
use civic_store::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AgentError>;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Aws(#[from] AwsError),

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<KeyError> for AgentError {
    fn from(err: KeyError) -> Self {
        AgentError::Store(StoreError::Key(err))
    }
}

impl AgentError {
    pub fn not_configured(what: impl Into<String>) -> Self {
        Self::NotConfigured(what.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Stable machine-readable code for JSON envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            AgentError::Request(err) => err.code(),
            AgentError::Store(StoreError::NotFound(_)) => "not_found",
            AgentError::Store(StoreError::Key(_)) => "invalid_identifier",
            AgentError::Store(_) => "store_error",
            AgentError::Analysis(AnalysisError::AnalysisTimeout { .. }) => "analysis_timeout",
            AgentError::Analysis(AnalysisError::AnalysisFailed { .. }) => "analysis_failed",
            AgentError::Analysis(_) => "analysis_error",
            AgentError::Aws(_) => "aws_error",
            AgentError::NotConfigured(_) | AgentError::InvalidConfig(_) => "config_error",
            AgentError::InvalidEvent(_) => "invalid_event",
            AgentError::IoError(_) => "io_error",
            AgentError::ConfigParse(_) => "config_error",
            AgentError::SerializationError(_) => "serialization_error",
        }
    }
}
