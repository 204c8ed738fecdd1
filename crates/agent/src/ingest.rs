use crate::agent::Agent;
use crate::error::{AgentError, Result};
use chrono::{SecondsFormat, Utc};
use civic_forms::{analyze_document, DocumentLocation};
use civic_protocol::S3Event;
use civic_store::FieldDefinition;
use serde::Serialize;

/// Outcome of ingesting one batch of uploaded blank forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub template_id: String,
    pub documents: Vec<IngestedDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestedDocument {
    pub location: DocumentLocation,
    /// `(field_id, label)` pairs written for this document
    pub fields: Vec<(String, String)>,
}

impl IngestReport {
    pub fn field_count(&self) -> usize {
        self.documents.iter().map(|d| d.fields.len()).sum()
    }
}

impl Agent {
    /// Turn every object named by `event` into fields of one new form template.
    ///
    /// Field ids run across all documents of the event, starting at 0.
    pub async fn ingest(&self, event: &S3Event) -> Result<IngestReport> {
        let objects = event.objects();
        if objects.is_empty() {
            return Err(AgentError::InvalidEvent("event names no objects".to_string()));
        }
        let analyzer = self.analyzer()?;

        let mut locations = Vec::with_capacity(objects.len());
        for object in objects {
            let bucket = match (self.ingest_bucket(), object.bucket) {
                (Some(configured), _) => configured.to_string(),
                (None, Some(bucket)) => bucket,
                (None, None) => {
                    return Err(AgentError::not_configured(format!(
                        "ingest bucket for {} (FORMS_INGEST_BUCKET)",
                        object.key
                    )))
                }
            };
            locations.push(DocumentLocation::new(bucket, object.key));
        }

        // Analyse everything before writing, so a failed page leaves no partial template.
        let mut analysed = Vec::with_capacity(locations.len());
        for location in locations {
            log::info!("Processing {location}");
            let form = analyze_document(analyzer.as_ref(), &location, self.poll_policy()).await?;
            log::info!("Found {} fields in {location}", form.fields().len());
            let labels: Vec<String> = form.labels().into_iter().map(str::to_string).collect();
            analysed.push((location, labels));
        }

        let template_id = uuid::Uuid::new_v4().simple().to_string();
        let created = format!("Created {}", Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        log::info!("Creating form template {template_id}");
        self.records()
            .write_form_template(&template_id, &created)
            .await?;

        let mut next_field = 0usize;
        let mut documents = Vec::with_capacity(analysed.len());
        for (location, labels) in analysed {
            let mut fields = Vec::with_capacity(labels.len());
            for label in labels {
                let field_id = next_field.to_string();
                next_field += 1;
                let definition = FieldDefinition {
                    field_name: label.clone(),
                    is_required: false,
                };
                self.records()
                    .write_form_template_field(&template_id, &field_id, &definition)
                    .await?;
                fields.push((field_id, label));
            }
            documents.push(IngestedDocument { location, fields });
        }

        Ok(IngestReport {
            template_id,
            documents,
        })
    }
}
