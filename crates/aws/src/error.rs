use civic_forms::AnalysisError;
use civic_store::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AwsError>;

#[derive(Debug, Error)]
pub enum AwsError {
    /// DynamoDB SDK error
    #[error("DynamoDB error: {0}")]
    DynamoDb(String),

    /// Textract SDK error
    #[error("Textract error: {0}")]
    Textract(String),

    /// Response is missing a field the protocol guarantees
    #[error("Malformed response: missing {0}")]
    MissingField(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AwsError {
    pub fn dynamodb(msg: impl Into<String>) -> Self {
        Self::DynamoDb(msg.into())
    }

    pub fn textract(msg: impl Into<String>) -> Self {
        Self::Textract(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

impl From<AwsError> for StoreError {
    fn from(err: AwsError) -> Self {
        StoreError::backend(err.to_string())
    }
}

impl From<AwsError> for AnalysisError {
    fn from(err: AwsError) -> Self {
        AnalysisError::provider(err.to_string())
    }
}
