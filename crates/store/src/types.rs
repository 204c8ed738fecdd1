use chrono::NaiveDate;
use civic_keyspace::StorageKey;
use serde::{Deserialize, Serialize};

/// One row of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub pk: String,
    pub sk: String,
    pub data: String,
}

impl Item {
    pub fn new(key: StorageKey, data: impl Into<String>) -> Self {
        Self {
            pk: key.pk,
            sk: key.sk,
            data: data.into(),
        }
    }

    pub fn key(&self) -> StorageKey {
        StorageKey::new(self.pk.clone(), self.sk.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    pub date: NaiveDate,
    pub citizen_id: String,
}

/// Field definition stored on a form template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub field_name: String,
    #[serde(default)]
    pub is_required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateField {
    pub field_id: String,
    #[serde(flatten)]
    pub definition: FieldDefinition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValue {
    pub field_id: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VersionStatus {
    Started,
    Submitted,
}

impl VersionStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            VersionStatus::Started => "STARTED",
            VersionStatus::Submitted => "SUBMITTED",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "STARTED" => Some(VersionStatus::Started),
            "SUBMITTED" => Some(VersionStatus::Submitted),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormVersionRecord {
    pub version_id: String,
    pub status: VersionStatus,
}

/// Numeric field ids sort numerically, everything else after them lexically.
pub(crate) fn field_order(field_id: &str) -> (bool, u64, String) {
    match field_id.parse::<u64>() {
        Ok(n) => (false, n, String::new()),
        Err(_) => (true, 0, field_id.to_string()),
    }
}
