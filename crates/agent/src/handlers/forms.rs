use crate::error::Result;
use civic_store::{Records, StoreError};

pub async fn start_new_form(
    records: &Records,
    form_template_id: &str,
    citizen_id: &str,
) -> Result<String> {
    let version_id = records
        .start_form_version(form_template_id, citizen_id)
        .await?;
    Ok(format!(
        "Created version {version_id} of form {form_template_id} for {citizen_id}"
    ))
}

pub async fn get_form_fields(records: &Records, form_template_id: &str) -> Result<String> {
    if records.form_template(form_template_id).await?.is_none() {
        return Err(StoreError::not_found(format!("form template {form_template_id}")).into());
    }
    let fields = records.form_template_fields(form_template_id).await?;
    if fields.is_empty() {
        return Ok(format!("Form {form_template_id} has no fields"));
    }

    let mut body = format!("Fields of form {form_template_id}:");
    for field in &fields {
        body.push_str(&format!("\n[{}] {}", field.field_id, field.definition.field_name));
        if field.definition.is_required {
            body.push_str(" (required)");
        }
    }
    Ok(body)
}

pub async fn submit_form(
    records: &Records,
    form_template_id: &str,
    citizen_id: &str,
    version_id: &str,
) -> Result<String> {
    records
        .submit_form_version(form_template_id, citizen_id, version_id)
        .await?;
    Ok(format!(
        "Submitted version {version_id} of form {form_template_id} for {citizen_id}"
    ))
}

pub async fn update_form_field(
    records: &Records,
    form_template_id: &str,
    citizen_id: &str,
    version_id: &str,
    form_field_id: &str,
    form_field_value: &str,
) -> Result<String> {
    records
        .write_form_field(
            form_template_id,
            citizen_id,
            version_id,
            form_field_id,
            form_field_value,
        )
        .await?;
    Ok(format!(
        "Updated field {form_field_id} of form {form_template_id} version {version_id} for {citizen_id}"
    ))
}
