use crate::calendar::format_date;
use crate::error::Result;
use crate::segment::{
    form_partition, segment, TAG_CITIZEN, TAG_FORM, TAG_GARBAGE, TAG_PARK,
    TAG_RESERVATION, TAG_VERSION,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Partition key plus the sort-key prefix of a `begins_with` query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyPrefix {
    pub pk: String,
    pub sk_prefix: String,
}

/// Range scans supported by the key design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanPrefix<'a> {
    /// Every reservation of one park.
    ParkReservations { park_id: &'a str },
    /// Bulk-waste requests on one route for one pickup date.
    BulkWasteRequests {
        garbage_route: &'a str,
        date: NaiveDate,
    },
    /// Every row of a form template partition.
    FormPartition { template_id: &'a str },
    /// Field definitions of a form template.
    TemplateFields { template_id: &'a str },
    /// Versions and answers of one citizen for a template.
    CitizenForms {
        template_id: &'a str,
        citizen_id: &'a str,
    },
    /// Answers stored under one form version.
    VersionFieldValues {
        template_id: &'a str,
        citizen_id: &'a str,
        version_id: &'a str,
    },
}

impl ScanPrefix<'_> {
    pub fn encode(&self) -> Result<KeyPrefix> {
        let (pk, sk_prefix) = match *self {
            ScanPrefix::ParkReservations { park_id } => (
                segment(TAG_PARK, "park_id", park_id)?,
                TAG_RESERVATION.to_string(),
            ),
            ScanPrefix::BulkWasteRequests {
                garbage_route,
                date,
            } => (
                segment(TAG_GARBAGE, "garbage_route", garbage_route)?,
                segment(TAG_RESERVATION, "date", &format_date(date))?,
            ),
            ScanPrefix::FormPartition { template_id } => {
                let pk = form_partition(template_id)?;
                (pk.clone(), pk)
            }
            ScanPrefix::TemplateFields { template_id } => {
                let pk = form_partition(template_id)?;
                let prefix = format!("{pk}{TAG_FORM}");
                (pk, prefix)
            }
            ScanPrefix::CitizenForms {
                template_id,
                citizen_id,
            } => {
                let pk = form_partition(template_id)?;
                let prefix = format!("{pk}{}", segment(TAG_CITIZEN, "citizen_id", citizen_id)?);
                (pk, prefix)
            }
            ScanPrefix::VersionFieldValues {
                template_id,
                citizen_id,
                version_id,
            } => {
                let pk = form_partition(template_id)?;
                let prefix = format!(
                    "{pk}{}{}{TAG_FORM}",
                    segment(TAG_CITIZEN, "citizen_id", citizen_id)?,
                    segment(TAG_VERSION, "version_id", version_id)?
                );
                (pk, prefix)
            }
        };
        Ok(KeyPrefix { pk, sk_prefix })
    }
}
