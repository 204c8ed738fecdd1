use crate::calendar::{format_date, parse_date};
use crate::error::{KeyError, Result};
use crate::segment::{
    form_partition, segment, split, DELIMITER, TAG_CITIZEN, TAG_FORM, TAG_GARBAGE, TAG_PARK,
    TAG_RESERVATION, TAG_ROUTE, TAG_VERSION,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Partition key + sort key of one row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StorageKey {
    pub pk: String,
    pub sk: String,
}

impl StorageKey {
    pub fn new(pk: impl Into<String>, sk: impl Into<String>) -> Self {
        Self {
            pk: pk.into(),
            sk: sk.into(),
        }
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.pk, self.sk)
    }
}

/// Logical reference to one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKey<'a> {
    GarbageRoute {
        district_id: &'a str,
    },
    ParkReservation {
        park_id: &'a str,
        date: NaiveDate,
    },
    BulkWasteRequest {
        garbage_route: &'a str,
        date: NaiveDate,
        citizen_id: &'a str,
    },
    FormTemplate {
        template_id: &'a str,
    },
    FormTemplateField {
        template_id: &'a str,
        field_id: &'a str,
    },
    /// One citizen's copy of a form. Starting and submitting share this key.
    FormVersion {
        template_id: &'a str,
        citizen_id: &'a str,
        version_id: &'a str,
    },
    FormFieldValue {
        template_id: &'a str,
        citizen_id: &'a str,
        version_id: &'a str,
        field_id: &'a str,
    },
}

impl<'a> EntityKey<'a> {
    pub fn encode(&self) -> Result<StorageKey> {
        match *self {
            EntityKey::GarbageRoute { district_id } => {
                let key = segment(TAG_ROUTE, "district_id", district_id)?;
                Ok(StorageKey::new(key.clone(), key))
            }
            EntityKey::ParkReservation { park_id, date } => Ok(StorageKey::new(
                segment(TAG_PARK, "park_id", park_id)?,
                segment(TAG_RESERVATION, "date", &format_date(date))?,
            )),
            EntityKey::BulkWasteRequest {
                garbage_route,
                date,
                citizen_id,
            } => {
                let mut sk = segment(TAG_RESERVATION, "date", &format_date(date))?;
                sk.push_str(&segment(TAG_CITIZEN, "citizen_id", citizen_id)?);
                Ok(StorageKey::new(
                    segment(TAG_GARBAGE, "garbage_route", garbage_route)?,
                    sk,
                ))
            }
            EntityKey::FormTemplate { template_id } => {
                let pk = form_partition(template_id)?;
                Ok(StorageKey::new(pk.clone(), pk))
            }
            EntityKey::FormTemplateField {
                template_id,
                field_id,
            } => {
                let pk = form_partition(template_id)?;
                let sk = format!("{pk}{}", segment(TAG_FORM, "field_id", field_id)?);
                Ok(StorageKey::new(pk, sk))
            }
            EntityKey::FormVersion {
                template_id,
                citizen_id,
                version_id,
            } => {
                let pk = form_partition(template_id)?;
                let sk = version_sort_key(&pk, citizen_id, version_id)?;
                Ok(StorageKey::new(pk, sk))
            }
            EntityKey::FormFieldValue {
                template_id,
                citizen_id,
                version_id,
                field_id,
            } => {
                let pk = form_partition(template_id)?;
                let mut sk = version_sort_key(&pk, citizen_id, version_id)?;
                sk.push_str(&segment(TAG_FORM, "field_id", field_id)?);
                Ok(StorageKey::new(pk, sk))
            }
        }
    }

    /// Inverse of [`EntityKey::encode`]; borrows identifiers from the stored keys.
    pub fn decode(pk: &'a str, sk: &'a str) -> Result<Self> {
        let form = pk.starts_with(DELIMITER);
        let partition = split(pk)?;
        let sort = split(sk)?;

        let malformed = || KeyError::malformed(format!("{pk} / {sk}"), "unknown key layout");
        let date = |raw: &str| {
            parse_date(raw).ok_or_else(|| KeyError::malformed(sk, "invalid date segment"))
        };

        match (form, partition.as_slice(), sort.as_slice()) {
            (false, [('T', district)], [('T', same)]) if district == same => {
                Ok(EntityKey::GarbageRoute {
                    district_id: *district,
                })
            }
            (false, [('P', park)], [('R', day)]) => Ok(EntityKey::ParkReservation {
                park_id: *park,
                date: date(*day)?,
            }),
            (false, [('G', route)], [('R', day), ('C', citizen)]) => {
                Ok(EntityKey::BulkWasteRequest {
                    garbage_route: *route,
                    date: date(*day)?,
                    citizen_id: *citizen,
                })
            }
            (true, [('F', template)], rest) => match rest {
                [('F', same)] if same == template => Ok(EntityKey::FormTemplate {
                    template_id: *template,
                }),
                [('F', same), ('F', field)] if same == template => {
                    Ok(EntityKey::FormTemplateField {
                        template_id: *template,
                        field_id: *field,
                    })
                }
                [('F', same), ('C', citizen), ('V', version)] if same == template => {
                    Ok(EntityKey::FormVersion {
                        template_id: *template,
                        citizen_id: *citizen,
                        version_id: *version,
                    })
                }
                [('F', same), ('C', citizen), ('V', version), ('F', field)]
                    if same == template =>
                {
                    Ok(EntityKey::FormFieldValue {
                        template_id: *template,
                        citizen_id: *citizen,
                        version_id: *version,
                        field_id: *field,
                    })
                }
                _ => Err(malformed()),
            },
            _ => Err(malformed()),
        }
    }
}

fn version_sort_key(pk: &str, citizen_id: &str, version_id: &str) -> Result<String> {
    Ok(format!(
        "{pk}{}{}",
        segment(TAG_CITIZEN, "citizen_id", citizen_id)?,
        segment(TAG_VERSION, "version_id", version_id)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(raw: &str) -> NaiveDate {
        parse_date(raw).unwrap()
    }

    #[test]
    fn encodes_every_layout() {
        let cases = [
            (EntityKey::GarbageRoute { district_id: "A1" }, "garbage route", "TA1#", "TA1#"),
            (
                EntityKey::ParkReservation {
                    park_id: "P1",
                    date: day("2024-12-03"),
                },
                "park",
                "PP1#",
                "R2024-12-03#",
            ),
            (
                EntityKey::BulkWasteRequest {
                    garbage_route: "Blue",
                    date: day("2024-12-04"),
                    citizen_id: "C2",
                },
                "bulk",
                "GBlue#",
                "R2024-12-04#CC2#",
            ),
            (
                EntityKey::FormTemplate { template_id: "t1" },
                "template",
                "#Ft1#",
                "#Ft1#",
            ),
            (
                EntityKey::FormTemplateField {
                    template_id: "t1",
                    field_id: "0",
                },
                "template field",
                "#Ft1#",
                "#Ft1#F0#",
            ),
            (
                EntityKey::FormVersion {
                    template_id: "t1",
                    citizen_id: "8",
                    version_id: "v9",
                },
                "version",
                "#Ft1#",
                "#Ft1#C8#Vv9#",
            ),
            (
                EntityKey::FormFieldValue {
                    template_id: "t1",
                    citizen_id: "8",
                    version_id: "v9",
                    field_id: "2",
                },
                "field value",
                "#Ft1#",
                "#Ft1#C8#Vv9#F2#",
            ),
        ];

        for (key, label, pk, sk) in cases {
            let encoded = key.encode().unwrap();
            assert_eq!(encoded, StorageKey::new(pk, sk), "{label}");
            assert_eq!(EntityKey::decode(&encoded.pk, &encoded.sk).unwrap(), key, "{label}");
        }
    }

    #[test]
    fn delimiter_in_any_identifier_is_rejected() {
        let err = EntityKey::FormFieldValue {
            template_id: "t1",
            citizen_id: "8",
            version_id: "v#9",
            field_id: "2",
        }
        .encode()
        .unwrap_err();
        assert_eq!(err, KeyError::invalid("version_id", "v#9"));
    }

    #[test]
    fn decode_rejects_unknown_layouts() {
        assert!(EntityKey::decode("PP1#", "X2024#").is_err());
        assert!(EntityKey::decode("PP1#", "Rnot-a-date#").is_err());
        assert!(EntityKey::decode("#Ft1#", "#Ft2#").is_err());
        assert!(EntityKey::decode("TA1#", "TA2#").is_err());
    }
}
