use crate::error::{Result, StoreError};
use crate::store::KvStore;
use crate::types::{
    field_order, FieldDefinition, FieldValue, FormVersionRecord, Item, Reservation,
    TemplateField, VersionStatus,
};
use chrono::NaiveDate;
use civic_keyspace::{available_days, EntityKey, ScanPrefix};
use std::sync::Arc;

/// Typed reads and writes over the single table.
///
/// Every key goes through `civic-keyspace`, so nothing here formats a key by hand.
#[derive(Clone)]
pub struct Records {
    store: Arc<dyn KvStore>,
}

impl Records {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    async fn put(&self, key: EntityKey<'_>, data: impl Into<String>) -> Result<()> {
        let key = key.encode()?;
        self.store.put(Item::new(key, data)).await
    }

    async fn get(&self, key: EntityKey<'_>) -> Result<Option<Item>> {
        let key = key.encode()?;
        self.store.get(&key.pk, &key.sk).await
    }

    async fn scan(&self, prefix: ScanPrefix<'_>) -> Result<Vec<Item>> {
        let prefix = prefix.encode()?;
        self.store.query(&prefix.pk, &prefix.sk_prefix).await
    }

    // Garbage collection

    pub async fn garbage_route(&self, district_id: &str) -> Result<String> {
        self.get(EntityKey::GarbageRoute { district_id })
            .await?
            .map(|item| item.data)
            .ok_or_else(|| StoreError::not_found(format!("garbage route for district {district_id}")))
    }

    pub async fn put_garbage_route(&self, district_id: &str, route: &str) -> Result<()> {
        self.put(EntityKey::GarbageRoute { district_id }, route).await
    }

    pub async fn write_bulk_waste_request(
        &self,
        garbage_route: &str,
        date: NaiveDate,
        citizen_id: &str,
    ) -> Result<()> {
        let key = EntityKey::BulkWasteRequest {
            garbage_route,
            date,
            citizen_id,
        };
        self.put(key, citizen_id).await
    }

    /// Citizens with a bulk-waste pickup on `route` for `date`.
    pub async fn bulk_waste_requests(&self, garbage_route: &str, date: NaiveDate) -> Result<Vec<String>> {
        let rows = self
            .scan(ScanPrefix::BulkWasteRequests {
                garbage_route,
                date,
            })
            .await?;
        Ok(rows.into_iter().map(|item| item.data).collect())
    }

    // Parks

    pub async fn write_park_reservation(
        &self,
        park_id: &str,
        date: NaiveDate,
        citizen_id: &str,
    ) -> Result<()> {
        self.put(EntityKey::ParkReservation { park_id, date }, citizen_id)
            .await
    }

    pub async fn park_reservations(&self, park_id: &str) -> Result<Vec<Reservation>> {
        let rows = self.scan(ScanPrefix::ParkReservations { park_id }).await?;
        let mut reservations = Vec::with_capacity(rows.len());
        for item in &rows {
            match EntityKey::decode(&item.pk, &item.sk)? {
                EntityKey::ParkReservation { date, .. } => reservations.push(Reservation {
                    date,
                    citizen_id: item.data.clone(),
                }),
                other => log::warn!("Unexpected row under park {park_id}: {other:?}"),
            }
        }
        Ok(reservations)
    }

    pub async fn available_park_days(
        &self,
        park_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>> {
        let reserved = self.park_reservations(park_id).await?;
        Ok(available_days(
            start,
            end,
            reserved.into_iter().map(|r| r.date),
        ))
    }

    // Form templates

    pub async fn write_form_template(&self, template_id: &str, data: &str) -> Result<()> {
        self.put(EntityKey::FormTemplate { template_id }, data).await
    }

    pub async fn form_template(&self, template_id: &str) -> Result<Option<String>> {
        Ok(self
            .get(EntityKey::FormTemplate { template_id })
            .await?
            .map(|item| item.data))
    }

    pub async fn write_form_template_field(
        &self,
        template_id: &str,
        field_id: &str,
        definition: &FieldDefinition,
    ) -> Result<()> {
        let data = serde_json::to_string(definition)?;
        self.put(
            EntityKey::FormTemplateField {
                template_id,
                field_id,
            },
            data,
        )
        .await
    }

    /// Field definitions of a template, in field-id order.
    pub async fn form_template_fields(&self, template_id: &str) -> Result<Vec<TemplateField>> {
        let rows = self.scan(ScanPrefix::TemplateFields { template_id }).await?;
        let mut fields = Vec::with_capacity(rows.len());
        for item in &rows {
            if let EntityKey::FormTemplateField { field_id, .. } =
                EntityKey::decode(&item.pk, &item.sk)?
            {
                let definition = serde_json::from_str(&item.data)?;
                fields.push(TemplateField {
                    field_id: field_id.to_string(),
                    definition,
                });
            }
        }
        fields.sort_by_cached_key(|f| field_order(&f.field_id));
        Ok(fields)
    }

    // Form versions

    /// Start a new version of `template_id` for a citizen and return its id.
    pub async fn start_form_version(&self, template_id: &str, citizen_id: &str) -> Result<String> {
        if self.form_template(template_id).await?.is_none() {
            return Err(StoreError::not_found(format!("form template {template_id}")));
        }
        let version_id = uuid::Uuid::new_v4().simple().to_string();
        self.put(
            EntityKey::FormVersion {
                template_id,
                citizen_id,
                version_id: &version_id,
            },
            VersionStatus::Started.as_str(),
        )
        .await?;
        log::info!("Started version {version_id} of form {template_id} for {citizen_id}");
        Ok(version_id)
    }

    pub async fn form_version(
        &self,
        template_id: &str,
        citizen_id: &str,
        version_id: &str,
    ) -> Result<Option<VersionStatus>> {
        let item = self
            .get(EntityKey::FormVersion {
                template_id,
                citizen_id,
                version_id,
            })
            .await?;
        Ok(item.and_then(|item| VersionStatus::parse(&item.data)))
    }

    async fn require_version(
        &self,
        template_id: &str,
        citizen_id: &str,
        version_id: &str,
    ) -> Result<()> {
        match self.form_version(template_id, citizen_id, version_id).await? {
            Some(_) => Ok(()),
            None => Err(StoreError::not_found(format!(
                "version {version_id} of form {template_id} for {citizen_id}"
            ))),
        }
    }

    pub async fn submit_form_version(
        &self,
        template_id: &str,
        citizen_id: &str,
        version_id: &str,
    ) -> Result<()> {
        self.require_version(template_id, citizen_id, version_id)
            .await?;
        self.put(
            EntityKey::FormVersion {
                template_id,
                citizen_id,
                version_id,
            },
            VersionStatus::Submitted.as_str(),
        )
        .await
    }

    pub async fn write_form_field(
        &self,
        template_id: &str,
        citizen_id: &str,
        version_id: &str,
        field_id: &str,
        value: &str,
    ) -> Result<()> {
        self.require_version(template_id, citizen_id, version_id)
            .await?;
        self.put(
            EntityKey::FormFieldValue {
                template_id,
                citizen_id,
                version_id,
                field_id,
            },
            value,
        )
        .await
    }

    pub async fn form_fields_for_version(
        &self,
        template_id: &str,
        citizen_id: &str,
        version_id: &str,
    ) -> Result<Vec<FieldValue>> {
        let rows = self
            .scan(ScanPrefix::VersionFieldValues {
                template_id,
                citizen_id,
                version_id,
            })
            .await?;
        let mut values = Vec::with_capacity(rows.len());
        for item in &rows {
            if let EntityKey::FormFieldValue { field_id, .. } =
                EntityKey::decode(&item.pk, &item.sk)?
            {
                values.push(FieldValue {
                    field_id: field_id.to_string(),
                    value: item.data.clone(),
                });
            }
        }
        values.sort_by_cached_key(|v| field_order(&v.field_id));
        Ok(values)
    }

    /// Every version a citizen holds for a template.
    pub async fn citizen_forms(
        &self,
        template_id: &str,
        citizen_id: &str,
    ) -> Result<Vec<FormVersionRecord>> {
        let rows = self
            .scan(ScanPrefix::CitizenForms {
                template_id,
                citizen_id,
            })
            .await?;
        let mut versions = Vec::new();
        for item in &rows {
            if let EntityKey::FormVersion { version_id, .. } = EntityKey::decode(&item.pk, &item.sk)? {
                match VersionStatus::parse(&item.data) {
                    Some(status) => versions.push(FormVersionRecord {
                        version_id: version_id.to_string(),
                        status,
                    }),
                    None => log::warn!("Version {version_id} has unknown status {:?}", item.data),
                }
            }
        }
        Ok(versions)
    }
}
