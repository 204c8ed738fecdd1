//! Object-created notifications that trigger form ingestion.

use percent_encoding::percent_decode_str;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct S3Event {
    #[serde(rename = "Records", default)]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct S3EventRecord {
    #[serde(rename = "eventName", default)]
    pub event_name: Option<String>,
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct S3Entity {
    #[serde(default)]
    pub bucket: Option<S3Bucket>,
    pub object: S3Object,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct S3Object {
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Bucket/key pair of one uploaded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3ObjectRef {
    pub bucket: Option<String>,
    pub key: String,
}

impl S3Event {
    /// Objects named by the notification. Keys arrive URL-encoded with `+` for spaces.
    pub fn objects(&self) -> Vec<S3ObjectRef> {
        self.records
            .iter()
            .map(|record| S3ObjectRef {
                bucket: record.s3.bucket.as_ref().map(|b| b.name.clone()),
                key: decode_object_key(&record.s3.object.key),
            })
            .collect()
    }
}

fn decode_object_key(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match percent_decode_str(&spaced).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}
