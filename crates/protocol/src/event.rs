//! Action-group invocation envelopes.
//!
//! The agent runtime calls the backend with an [`ActionEvent`] naming one function and a
//! flat list of `{name, type, value}` parameters, and expects an [`ActionResponse`] carrying
//! a single text body back.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_MESSAGE_VERSION: &str = "1.0";

fn default_message_version() -> String {
    DEFAULT_MESSAGE_VERSION.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AgentInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub value: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: Some("string".to_string()),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionEvent {
    #[serde(default = "default_message_version")]
    pub message_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<AgentInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub action_group: String,
    pub function: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub session_attributes: HashMap<String, String>,
    #[serde(default)]
    pub prompt_session_attributes: HashMap<String, String>,
}

impl ActionEvent {
    pub fn new(action_group: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            message_version: default_message_version(),
            action_group: action_group.into(),
            function: function.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(Parameter::new(name, value));
        self
    }

    #[must_use]
    pub fn with_session_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.session_attributes.insert(key.into(), value.into());
        self
    }

    /// Value of a named parameter, exactly as sent. Later duplicates win; blank values
    /// count as absent and never hide an earlier non-blank one.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .rev()
            .find(|p| p.name == name && !p.value.trim().is_empty())
            .map(|p| p.value.as_str())
    }

    /// Non-blank session attribute.
    pub fn session_attribute(&self, key: &str) -> Option<&str> {
        self.session_attributes
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TextBody {
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ResponseBody {
    #[serde(rename = "TEXT")]
    pub text: TextBody,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_state: Option<String>,
    pub response_body: ResponseBody,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResult {
    pub action_group: String,
    pub function: String,
    pub function_response: FunctionResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub message_version: String,
    pub response: FunctionResult,
}

impl ActionResponse {
    /// Answer `event` with a plain text body.
    pub fn text(event: &ActionEvent, body: impl Into<String>) -> Self {
        Self {
            message_version: event.message_version.clone(),
            response: FunctionResult {
                action_group: event.action_group.clone(),
                function: event.function.clone(),
                function_response: FunctionResponse {
                    response_state: None,
                    response_body: ResponseBody {
                        text: TextBody { body: body.into() },
                    },
                },
            },
        }
    }

    pub fn body(&self) -> &str {
        &self.response.function_response.response_body.text.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn deserializes_agent_runtime_event() {
        let raw = json!({
            "messageVersion": "1.0",
            "agent": {"name": "city", "id": "A1", "alias": "live", "version": "1"},
            "inputText": "when is my garbage picked up?",
            "sessionId": "s-1",
            "actionGroup": "garbage",
            "function": "get_garbage_pickup_day",
            "parameters": [{"name": "district_id", "type": "string", "value": "A1"}],
            "sessionAttributes": {"citizenID": "C7"},
            "promptSessionAttributes": {}
        });
        let event: ActionEvent = serde_json::from_value(raw).unwrap();
        assert_eq!(event.function, "get_garbage_pickup_day");
        assert_eq!(event.parameter("district_id"), Some("A1"));
        assert_eq!(event.session_attribute("citizenID"), Some("C7"));
        assert_eq!(event.agent.unwrap().alias, "live");
    }

    #[test]
    fn later_parameter_wins_and_blank_is_absent() {
        let event = ActionEvent::new("parks", "book_park")
            .with_parameter("park_id", "P1")
            .with_parameter("park_id", "P2")
            .with_parameter("citizen_id", "  ");
        assert_eq!(event.parameter("park_id"), Some("P2"));
        assert_eq!(event.parameter("citizen_id"), None);
        assert_eq!(event.parameter("reservation_date"), None);
    }

    #[test]
    fn parameter_values_are_returned_verbatim() {
        let event = ActionEvent::new("forms", "update_form_field")
            .with_parameter("form_field_value", "  Jane  ")
            .with_parameter("citizen_id", "C1")
            .with_parameter("citizen_id", " ");
        assert_eq!(event.parameter("form_field_value"), Some("  Jane  "));
        assert_eq!(event.parameter("citizen_id"), Some("C1"));
    }

    #[test]
    fn response_serializes_with_text_body() {
        let event = ActionEvent::new("parks", "book_park");
        let response = ActionResponse::text(&event, "done");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "messageVersion": "1.0",
                "response": {
                    "actionGroup": "parks",
                    "function": "book_park",
                    "functionResponse": {"responseBody": {"TEXT": {"body": "done"}}}
                }
            })
        );
        assert_eq!(response.body(), "done");
    }
}
