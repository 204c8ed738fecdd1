use crate::config::{AgentConfig, AnalyzerKind, Backend};
use crate::error::{AgentError, Result};
use crate::handlers::{forms, garbage, parks};
use civic_aws::{DynamoDbConfig, DynamoDbStore, TextractAnalyzer, TextractConfig};
use civic_forms::{DocumentAnalyzer, LocalAnalyzer, PollPolicy};
use civic_protocol::{ActionEvent, ActionResponse, FunctionCall, RequestError, NO_FUNCTION_BODY};
use civic_store::{JsonFileStore, KvStore, MemoryStore, Records};
use std::sync::Arc;

/// Request handler shared by every entry point.
///
/// Store and analyzer handles are injected, so one process can serve several agents
/// over different backends.
#[derive(Clone)]
pub struct Agent {
    records: Records,
    analyzer: Option<Arc<dyn DocumentAnalyzer>>,
    poll: PollPolicy,
    ingest_bucket: Option<String>,
}

impl Agent {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            records: Records::new(store),
            analyzer: None,
            poll: PollPolicy::default(),
            ingest_bucket: None,
        }
    }

    #[must_use]
    pub fn with_analyzer(mut self, analyzer: Arc<dyn DocumentAnalyzer>, poll: PollPolicy) -> Self {
        self.analyzer = Some(analyzer);
        self.poll = poll;
        self
    }

    #[must_use]
    pub fn with_ingest_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.ingest_bucket = Some(bucket.into());
        self
    }

    /// Build the store and analyzer named by `config`.
    pub async fn from_config(config: &AgentConfig) -> Result<Self> {
        config.validate()?;
        let needs_aws = config.store.backend == Backend::Dynamodb
            || config.forms.analyzer == AnalyzerKind::Textract;
        let sdk_config = if needs_aws {
            Some(civic_aws::load_sdk_config(config.store.region.as_deref()).await)
        } else {
            None
        };

        let store: Arc<dyn KvStore> = match (config.store.backend, &sdk_config) {
            (Backend::Memory, _) => Arc::new(MemoryStore::new()),
            (Backend::File, _) => {
                let path = config
                    .store
                    .path
                    .as_ref()
                    .ok_or_else(|| AgentError::not_configured("store.path"))?;
                Arc::new(JsonFileStore::open(path).await?)
            }
            (Backend::Dynamodb, Some(sdk_config)) => {
                let table = config
                    .store
                    .table
                    .clone()
                    .ok_or_else(|| AgentError::not_configured("store.table"))?;
                Arc::new(DynamoDbStore::new(
                    sdk_config,
                    DynamoDbConfig {
                        table_name: table,
                        region: config.store.region.clone(),
                        endpoint: config.store.endpoint.clone(),
                        timeout_ms: config.store.timeout_ms,
                    },
                )?)
            }
            (Backend::Dynamodb, None) => return Err(AgentError::not_configured("AWS SDK")),
        };
        log::info!("Using {} store", store.backend_name());

        let analyzer: Option<Arc<dyn DocumentAnalyzer>> = match (config.forms.analyzer, &sdk_config) {
            (AnalyzerKind::Local, _) => config
                .forms
                .analysis_dir
                .as_ref()
                .map(|dir| Arc::new(LocalAnalyzer::new(dir)) as Arc<dyn DocumentAnalyzer>),
            (AnalyzerKind::Textract, Some(sdk_config)) => Some(Arc::new(TextractAnalyzer::new(
                sdk_config,
                TextractConfig {
                    region: config.store.region.clone(),
                    ..TextractConfig::default()
                },
            ))),
            (AnalyzerKind::Textract, None) => return Err(AgentError::not_configured("AWS SDK")),
        };

        let mut agent = Agent::new(store);
        if let Some(analyzer) = analyzer {
            agent = agent.with_analyzer(analyzer, config.poll_policy());
        }
        if let Some(bucket) = &config.forms.ingest_bucket {
            agent = agent.with_ingest_bucket(bucket.clone());
        }
        Ok(agent)
    }

    pub fn records(&self) -> &Records {
        &self.records
    }

    pub(crate) fn analyzer(&self) -> Result<&Arc<dyn DocumentAnalyzer>> {
        self.analyzer
            .as_ref()
            .ok_or_else(|| AgentError::not_configured("document analyzer (forms.analysis_dir or CIVIC_ANALYZER=textract)"))
    }

    pub(crate) fn poll_policy(&self) -> &PollPolicy {
        &self.poll
    }

    pub(crate) fn ingest_bucket(&self) -> Option<&str> {
        self.ingest_bucket.as_deref()
    }

    /// Run one typed function call and return its TEXT body.
    pub async fn call(&self, call: &FunctionCall) -> Result<String> {
        let records = &self.records;
        match call {
            FunctionCall::GetGarbagePickupDay { district_id } => {
                garbage::get_garbage_pickup_day(records, district_id).await
            }
            FunctionCall::ScheduleBulkPickup {
                citizen_id,
                pickup_date,
                garbage_route,
            } => garbage::schedule_bulk_pickup(records, citizen_id, *pickup_date, garbage_route).await,
            FunctionCall::GetAvailableParkDays {
                park_id,
                start_date,
                end_date,
            } => parks::get_available_park_days(records, park_id, *start_date, *end_date).await,
            FunctionCall::BookPark {
                citizen_id,
                park_id,
                reservation_date,
            } => parks::book_park(records, citizen_id, park_id, *reservation_date).await,
            FunctionCall::StartNewForm {
                form_template_id,
                citizen_id,
            } => forms::start_new_form(records, form_template_id, citizen_id).await,
            FunctionCall::GetFormFields { form_template_id } => {
                forms::get_form_fields(records, form_template_id).await
            }
            FunctionCall::SubmitForm {
                form_template_id,
                citizen_id,
                version_id,
            } => forms::submit_form(records, form_template_id, citizen_id, version_id).await,
            FunctionCall::UpdateFormField {
                form_template_id,
                citizen_id,
                version_id,
                form_field_id,
                form_field_value,
            } => {
                forms::update_form_field(
                    records,
                    form_template_id,
                    citizen_id,
                    version_id,
                    form_field_id,
                    form_field_value,
                )
                .await
            }
        }
    }

    /// Parse and run an action-group event.
    pub async fn dispatch(&self, event: &ActionEvent) -> Result<String> {
        let call = FunctionCall::from_event(event)?;
        log::debug!("{} via action group {}", call.name(), event.action_group);
        self.call(&call).await
    }

    /// Answer an action-group event. Failures become the TEXT body; this never errors.
    pub async fn handle_event(&self, event: &ActionEvent) -> ActionResponse {
        let body = match self.dispatch(event).await {
            Ok(body) => body,
            Err(AgentError::Request(RequestError::UnknownFunction(name))) => {
                log::warn!("Unknown function {name:?}");
                NO_FUNCTION_BODY.to_string()
            }
            Err(err) => {
                log::error!("{} failed: {err}", event.function);
                format!("Error: {err}")
            }
        };
        ActionResponse::text(event, body)
    }
}
