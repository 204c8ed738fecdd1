//! Single-table store on Amazon DynamoDB.
//!
//! The table has a string partition key `pk`, a string sort key `sk` and one string
//! attribute `data`.

use crate::error::{AwsError, Result};
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::timeout::TimeoutConfig;
use civic_store::{Item, KvStore};
use std::collections::HashMap;
use std::time::Duration;

pub const ATTR_PK: &str = "pk";
pub const ATTR_SK: &str = "sk";
pub const ATTR_DATA: &str = "data";

#[derive(Debug, Clone)]
pub struct DynamoDbConfig {
    /// DynamoDB table name
    pub table_name: String,
    /// AWS region (optional, uses SDK default if not specified)
    pub region: Option<String>,
    /// Optional endpoint override (e.g. DynamoDB Local)
    pub endpoint: Option<String>,
    /// Timeout in milliseconds
    pub timeout_ms: Option<u64>,
}

impl DynamoDbConfig {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            region: None,
            endpoint: None,
            timeout_ms: None,
        }
    }
}

#[derive(Clone)]
pub struct DynamoDbStore {
    client: Client,
    table_name: String,
}

impl std::fmt::Debug for DynamoDbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoDbStore")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl DynamoDbStore {
    pub fn new(sdk_config: &aws_config::SdkConfig, config: DynamoDbConfig) -> Result<Self> {
        if config.table_name.trim().is_empty() {
            return Err(AwsError::invalid_config("DynamoDB table name is empty"));
        }

        let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);
        if let Some(region) = config.region {
            builder = builder.region(aws_sdk_dynamodb::config::Region::new(region));
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

        Ok(Self {
            client: Client::from_conf(builder.build()),
            table_name: config.table_name,
        })
    }

    /// Create from a pre-built client
    pub fn from_client(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

fn string_attr(item: &HashMap<String, AttributeValue>, name: &'static str) -> Result<String> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or(AwsError::MissingField(name))
}

/// Convert a DynamoDB item into a table row.
pub(crate) fn item_to_row(item: &HashMap<String, AttributeValue>) -> Result<Item> {
    Ok(Item {
        pk: string_attr(item, ATTR_PK)?,
        sk: string_attr(item, ATTR_SK)?,
        data: item
            .get(ATTR_DATA)
            .and_then(|v| v.as_s().ok())
            .cloned()
            .unwrap_or_default(),
    })
}

#[async_trait]
impl KvStore for DynamoDbStore {
    fn backend_name(&self) -> &'static str {
        "dynamodb"
    }

    async fn put(&self, item: Item) -> civic_store::Result<()> {
        log::debug!("PutItem {} / {}", item.pk, item.sk);
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item(ATTR_PK, AttributeValue::S(item.pk))
            .item(ATTR_SK, AttributeValue::S(item.sk))
            .item(ATTR_DATA, AttributeValue::S(item.data))
            .send()
            .await
            .map_err(|e| AwsError::dynamodb(format!("put_item failed: {}", DisplayErrorContext(&e))))?;
        Ok(())
    }

    async fn get(&self, pk: &str, sk: &str) -> civic_store::Result<Option<Item>> {
        let response = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ATTR_PK, AttributeValue::S(pk.to_string()))
            .key(ATTR_SK, AttributeValue::S(sk.to_string()))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| AwsError::dynamodb(format!("get_item failed: {}", DisplayErrorContext(&e))))?;

        match response.item() {
            Some(item) => Ok(Some(item_to_row(item)?)),
            None => Ok(None),
        }
    }

    async fn query(&self, pk: &str, sk_prefix: &str) -> civic_store::Result<Vec<Item>> {
        let mut rows = Vec::new();
        let mut last_evaluated_key = None;

        loop {
            let mut request = self
                .client
                .query()
                .table_name(&self.table_name)
                .expression_attribute_names("#pk", ATTR_PK)
                .expression_attribute_values(":pk", AttributeValue::S(pk.to_string()));

            // begins_with rejects an empty operand
            request = if sk_prefix.is_empty() {
                request.key_condition_expression("#pk = :pk")
            } else {
                request
                    .key_condition_expression("#pk = :pk AND begins_with(#sk, :sk)")
                    .expression_attribute_names("#sk", ATTR_SK)
                    .expression_attribute_values(":sk", AttributeValue::S(sk_prefix.to_string()))
            };

            if let Some(key) = last_evaluated_key.take() {
                request = request.set_exclusive_start_key(Some(key));
            }

            let response = request
                .send()
                .await
                .map_err(|e| AwsError::dynamodb(format!("query failed: {}", DisplayErrorContext(&e))))?;

            for item in response.items() {
                rows.push(item_to_row(item)?);
            }

            match response.last_evaluated_key() {
                Some(key) if !key.is_empty() => {
                    last_evaluated_key = Some(key.clone());
                }
                _ => break,
            }
        }

        log::debug!("Query {pk} begins_with {sk_prefix:?}: {} rows", rows.len());
        Ok(rows)
    }
}
