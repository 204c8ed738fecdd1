use super::schemas::{
    AvailableParkDaysRequest, BookParkRequest, BulkPickupRequest, FormFieldsRequest,
    FunctionRequest, GarbagePickupDayRequest, IngestFormRequest, SeedRequest, StartFormRequest,
    SubmitFormRequest, UpdateFieldRequest,
};
use civic_agent::{sample_data, Agent, AgentError};
use civic_protocol::{
    serialize_json, ActionEvent, AgentInfo, ErrorEnvelope, RequestError, S3Event,
};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Agent name stamped on events that arrive through MCP.
const MCP_AGENT: &str = "civic-mcp";

/// Civic assistant MCP service
#[derive(Clone)]
pub struct CivicService {
    agent: Arc<Agent>,
    tool_router: ToolRouter<Self>,
}

impl CivicService {
    pub fn new(agent: Arc<Agent>) -> Self {
        Self {
            agent,
            tool_router: Self::tool_router(),
        }
    }

    async fn run<R: FunctionRequest>(&self, request: R) -> Result<CallToolResult, McpError> {
        let function = R::FUNCTION;
        let mut event = ActionEvent::new(function.action_group(), function.as_str());
        event.agent = Some(AgentInfo {
            name: MCP_AGENT.to_string(),
            ..Default::default()
        });
        for (name, value) in request.parameters() {
            event = event.with_parameter(name, value);
        }
        if let Some(session) = request.session() {
            for (key, value) in session.attributes() {
                event = event.with_session_attribute(key, value);
            }
        }

        match self.agent.dispatch(&event).await {
            Ok(body) => Ok(CallToolResult::success(vec![Content::text(body)])),
            Err(err) => {
                log::warn!("{function} failed: {err}");
                Ok(error_result(&err))
            }
        }
    }
}

fn error_result(err: &AgentError) -> CallToolResult {
    let mut envelope = ErrorEnvelope::new(err.code(), err.to_string());
    if let AgentError::Request(RequestError::MissingParameters { .. }) = err {
        envelope = envelope.with_hint("pass the missing values as arguments or in `session`");
    }
    let text = serialize_json(&envelope).unwrap_or_else(|_| err.to_string());
    CallToolResult::error(vec![Content::text(text)])
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {e}"), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

#[tool_router]
impl CivicService {
    #[tool(description = "Look up the garbage route (collection day) serving a district.")]
    pub async fn get_garbage_pickup_day(
        &self,
        Parameters(request): Parameters<GarbagePickupDayRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run(request).await
    }

    #[tool(description = "Request a bulk-waste pickup on a route for a given day.")]
    pub async fn schedule_bulk_pickup(
        &self,
        Parameters(request): Parameters<BulkPickupRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run(request).await
    }

    #[tool(
        description = "List the days in an inclusive window on which a park has no reservation."
    )]
    pub async fn get_available_park_days(
        &self,
        Parameters(request): Parameters<AvailableParkDaysRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run(request).await
    }

    #[tool(description = "Reserve a park for a citizen on one day.")]
    pub async fn book_park(
        &self,
        Parameters(request): Parameters<BookParkRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run(request).await
    }

    #[tool(description = "Start a new version of a form for a citizen; returns the version id.")]
    pub async fn start_new_form(
        &self,
        Parameters(request): Parameters<StartFormRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run(request).await
    }

    #[tool(description = "List the fields of a form template with their ids.")]
    pub async fn get_form_fields(
        &self,
        Parameters(request): Parameters<FormFieldsRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run(request).await
    }

    #[tool(description = "Mark a started form version as submitted.")]
    pub async fn submit_form(
        &self,
        Parameters(request): Parameters<SubmitFormRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run(request).await
    }

    #[tool(description = "Set the value of one field in a started form version.")]
    pub async fn update_form_field(
        &self,
        Parameters(request): Parameters<UpdateFieldRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run(request).await
    }

    #[tool(
        description = "Analyse uploaded blank form pages and register them as one new form template. Requires a configured document analyzer."
    )]
    pub async fn ingest_form(
        &self,
        Parameters(request): Parameters<IngestFormRequest>,
    ) -> Result<CallToolResult, McpError> {
        let records: Vec<_> = request
            .keys
            .iter()
            .map(|key| {
                json!({
                    "eventName": "ObjectCreated:Put",
                    "s3": {
                        "bucket": request.bucket.as_ref().map(|name| json!({ "name": name })),
                        "object": { "key": key }
                    }
                })
            })
            .collect();
        let event: S3Event = serde_json::from_value(json!({ "Records": records }))
            .map_err(|e| McpError::invalid_params(format!("Invalid ingest request: {e}"), None))?;

        match self.agent.ingest(&event).await {
            Ok(report) => json_result(&report),
            Err(err) => {
                log::warn!("ingest_form failed: {err}");
                Ok(error_result(&err))
            }
        }
    }

    #[tool(description = "Load demo garbage routes and park reservations into the store.")]
    pub async fn seed(
        &self,
        Parameters(_request): Parameters<SeedRequest>,
    ) -> Result<CallToolResult, McpError> {
        match sample_data::seed(self.agent.records()).await {
            Ok(report) => json_result(&report),
            Err(err) => Ok(error_result(&err)),
        }
    }
}

#[tool_handler]
impl ServerHandler for CivicService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("Municipal assistant backend. Garbage: 'get_garbage_pickup_day', 'schedule_bulk_pickup'. Parks: 'get_available_park_days', 'book_park'. Forms: 'get_form_fields', then 'start_new_form', 'update_form_field' per field and 'submit_form'. Dates are YYYY-MM-DD.".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}
