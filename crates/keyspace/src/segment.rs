use crate::error::{KeyError, Result};

pub const DELIMITER: char = '#';

pub(crate) const TAG_ROUTE: char = 'T';
pub(crate) const TAG_PARK: char = 'P';
pub(crate) const TAG_RESERVATION: char = 'R';
pub(crate) const TAG_GARBAGE: char = 'G';
pub(crate) const TAG_CITIZEN: char = 'C';
pub(crate) const TAG_VERSION: char = 'V';
pub(crate) const TAG_FORM: char = 'F';

/// Validate an identifier before it is embedded in a key.
pub(crate) fn check(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() || value.contains(DELIMITER) {
        return Err(KeyError::invalid(field, value));
    }
    Ok(())
}

/// `<tag><value>#`
pub(crate) fn segment(tag: char, field: &'static str, value: &str) -> Result<String> {
    check(field, value)?;
    let mut out = String::with_capacity(value.len() + 2);
    out.push(tag);
    out.push_str(value);
    out.push(DELIMITER);
    Ok(out)
}

/// Form partitions carry a leading delimiter: `#F<template>#`.
pub(crate) fn form_partition(template_id: &str) -> Result<String> {
    Ok(format!(
        "{DELIMITER}{}",
        segment(TAG_FORM, "form_template_id", template_id)?
    ))
}

/// Split a stored key into `(tag, value)` segments.
pub(crate) fn split(key: &str) -> Result<Vec<(char, &str)>> {
    let body = key.strip_prefix(DELIMITER).unwrap_or(key);
    let body = body
        .strip_suffix(DELIMITER)
        .ok_or_else(|| KeyError::malformed(key, "missing trailing delimiter"))?;

    body.split(DELIMITER)
        .map(|part| {
            let mut chars = part.chars();
            let tag = chars
                .next()
                .filter(char::is_ascii_uppercase)
                .ok_or_else(|| KeyError::malformed(key, "segment without type tag"))?;
            let value = chars.as_str();
            if value.is_empty() {
                return Err(KeyError::malformed(key, "empty segment value"));
            }
            Ok((tag, value))
        })
        .collect()
}
