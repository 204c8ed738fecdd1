//! Form analysis on Amazon Textract.

use crate::error::{AwsError, Result};
use async_trait::async_trait;
use aws_sdk_textract::types::{DocumentLocation as SdkLocation, FeatureType, S3Object};
use aws_sdk_textract::Client;
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::timeout::TimeoutConfig;
use civic_forms::{AnalysisPoll, Block, DocumentAnalyzer, DocumentLocation, JobStatus, Relationship};
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct TextractConfig {
    /// AWS region (optional, uses SDK default if not specified)
    pub region: Option<String>,
    /// Optional endpoint override
    pub endpoint: Option<String>,
    /// Timeout in milliseconds for each API call
    pub timeout_ms: Option<u64>,
}

#[derive(Clone)]
pub struct TextractAnalyzer {
    client: Client,
}

impl std::fmt::Debug for TextractAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextractAnalyzer").finish_non_exhaustive()
    }
}

impl TextractAnalyzer {
    pub fn new(sdk_config: &aws_config::SdkConfig, config: TextractConfig) -> Self {
        let mut builder = aws_sdk_textract::config::Builder::from(sdk_config);
        if let Some(region) = config.region {
            builder = builder.region(aws_sdk_textract::config::Region::new(region));
        }
        if let Some(endpoint) = config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        if let Some(timeout_ms) = config.timeout_ms {
            let timeout_config = TimeoutConfig::builder()
                .operation_timeout(Duration::from_millis(timeout_ms))
                .build();
            builder = builder.timeout_config(timeout_config);
        }
        Self {
            client: Client::from_conf(builder.build()),
        }
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

/// Map an SDK enum string onto the matching `civic-forms` enum.
fn provider_enum<T: DeserializeOwned>(raw: &str) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(raw.to_string())).ok()
}

pub(crate) fn convert_block(block: &aws_sdk_textract::types::Block) -> Result<Block> {
    let id = block.id().ok_or(AwsError::MissingField("Block.Id"))?;
    let block_type = block
        .block_type()
        .and_then(|t| provider_enum(t.as_str()))
        .ok_or(AwsError::MissingField("Block.BlockType"))?;

    Ok(Block {
        id: id.to_string(),
        block_type,
        entity_types: block
            .entity_types()
            .iter()
            .filter_map(|e| provider_enum(e.as_str()))
            .collect(),
        text: block.text().map(str::to_string),
        selection_status: block.selection_status().and_then(|s| provider_enum(s.as_str())),
        relationships: block
            .relationships()
            .iter()
            .filter_map(|r| {
                Some(Relationship {
                    kind: provider_enum(r.r#type()?.as_str())?,
                    ids: r.ids().to_vec(),
                })
            })
            .collect(),
    })
}

#[async_trait]
impl DocumentAnalyzer for TextractAnalyzer {
    fn name(&self) -> &'static str {
        "textract"
    }

    async fn start_analysis(&self, location: &DocumentLocation) -> civic_forms::Result<String> {
        let document = SdkLocation::builder()
            .s3_object(
                S3Object::builder()
                    .bucket(&location.bucket)
                    .name(&location.key)
                    .build(),
            )
            .build();

        let response = self
            .client
            .start_document_analysis()
            .document_location(document)
            .feature_types(FeatureType::Forms)
            .send()
            .await
            .map_err(|e| {
                AwsError::textract(format!(
                    "start_document_analysis failed: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        let job_id = response.job_id().ok_or(AwsError::MissingField("JobId"))?;
        Ok(job_id.to_string())
    }

    /// Once the job finished, every result page is fetched so the returned blocks
    /// are complete.
    async fn poll_analysis(&self, job_id: &str) -> civic_forms::Result<AnalysisPoll> {
        let mut next_token: Option<String> = None;
        let mut blocks = Vec::new();
        let mut pages = 0usize;

        loop {
            let response = self
                .client
                .get_document_analysis()
                .job_id(job_id)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| {
                    AwsError::textract(format!(
                        "get_document_analysis failed: {}",
                        DisplayErrorContext(&e)
                    ))
                })?;

            let raw_status = response
                .job_status()
                .map(|s| s.as_str())
                .ok_or(AwsError::MissingField("JobStatus"))?;
            let status = JobStatus::parse(raw_status)
                .ok_or_else(|| AwsError::textract(format!("unknown job status {raw_status}")))?;

            if status == JobStatus::InProgress || status == JobStatus::Failed {
                return Ok(AnalysisPoll {
                    status,
                    blocks: Vec::new(),
                    status_message: response.status_message().map(str::to_string),
                });
            }

            for block in response.blocks() {
                blocks.push(convert_block(block)?);
            }
            pages += 1;

            match response.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => {
                    log::debug!("Job {job_id}: {} blocks over {pages} pages", blocks.len());
                    return Ok(AnalysisPoll {
                        status,
                        blocks,
                        status_message: response.status_message().map(str::to_string),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_textract::types::{
        Block as SdkBlock, BlockType as SdkBlockType, EntityType as SdkEntityType,
        Relationship as SdkRelationship, RelationshipType as SdkRelationshipType,
    };
    use civic_forms::{BlockType, EntityType, RelationshipType};
    use pretty_assertions::assert_eq;

    #[test]
    fn converts_sdk_blocks() {
        let sdk = SdkBlock::builder()
            .id("k1")
            .block_type(SdkBlockType::KeyValueSet)
            .entity_types(SdkEntityType::Key)
            .relationships(
                SdkRelationship::builder()
                    .r#type(SdkRelationshipType::Value)
                    .ids("v1")
                    .build(),
            )
            .relationships(
                SdkRelationship::builder()
                    .r#type(SdkRelationshipType::Child)
                    .ids("w1")
                    .ids("w2")
                    .build(),
            )
            .build();

        let block = convert_block(&sdk).unwrap();
        assert_eq!(block.block_type, BlockType::KeyValueSet);
        assert_eq!(block.entity_types, vec![EntityType::Key]);
        assert_eq!(block.relationships[0].kind, RelationshipType::Value);
        assert_eq!(block.relationships[1].ids, vec!["w1", "w2"]);
        assert!(block.is_key());
    }

    #[test]
    fn block_without_id_is_rejected() {
        let sdk = SdkBlock::builder().block_type(SdkBlockType::Word).build();
        assert!(matches!(
            convert_block(&sdk).unwrap_err(),
            AwsError::MissingField("Block.Id")
        ));
    }
}
