use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod event;
pub mod function;
pub mod s3;

pub use event::{
    ActionEvent, ActionResponse, AgentInfo, FunctionResponse, FunctionResult, Parameter,
    ResponseBody, TextBody, DEFAULT_MESSAGE_VERSION,
};
pub use function::{
    FunctionCall, FunctionName, RequestError, MAX_AVAILABILITY_WINDOW_DAYS, SESSION_CITIZEN_ID,
    SESSION_DISTRICT_ID,
};
pub use s3::{S3Event, S3ObjectRef};

/// Text returned when an event names no function this backend knows.
pub const NO_FUNCTION_BODY: &str = "Error, no function was called";

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
    pub hint: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            hint: None,
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<&RequestError> for ErrorEnvelope {
    fn from(err: &RequestError) -> Self {
        let envelope = ErrorEnvelope::new(err.code(), err.to_string());
        match err {
            RequestError::MissingParameters { function, .. } => envelope.with_hint(format!(
                "{function} requires: {}",
                FunctionName::parse(function)
                    .map(|f| f.required_parameters().join(", "))
                    .unwrap_or_default()
            )),
            RequestError::InvalidParameter { .. } => {
                envelope.with_hint("dates must be formatted as YYYY-MM-DD")
            }
            RequestError::UnknownFunction(_) => envelope.with_hint(format!(
                "known functions: {}",
                FunctionName::ALL
                    .iter()
                    .map(|f| f.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameter_envelope_lists_required_parameters() {
        let err = RequestError::MissingParameters {
            function: "book_park".to_string(),
            missing: vec!["park_id".to_string()],
        };
        let envelope = ErrorEnvelope::from(&err);
        assert_eq!(envelope.code, "missing_parameters");
        assert_eq!(
            envelope.hint.as_deref(),
            Some("book_park requires: citizen_id, park_id, reservation_date")
        );
    }
}
