use chrono::{Days, NaiveDate};
use civic_keyspace::{EntityKey, KeyError, StorageKey};
use proptest::prelude::*;

/// Owned mirror of `EntityKey` so proptest can generate and shrink it.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Row {
    Route(String),
    Reservation(String, NaiveDate),
    BulkWaste(String, NaiveDate, String),
    Template(String),
    TemplateField(String, String),
    Version(String, String, String),
    FieldValue(String, String, String, String),
}

impl Row {
    fn key(&self) -> EntityKey<'_> {
        match self {
            Row::Route(d) => EntityKey::GarbageRoute { district_id: d },
            Row::Reservation(p, date) => EntityKey::ParkReservation { park_id: p, date: *date },
            Row::BulkWaste(r, date, c) => EntityKey::BulkWasteRequest {
                garbage_route: r,
                date: *date,
                citizen_id: c,
            },
            Row::Template(t) => EntityKey::FormTemplate { template_id: t },
            Row::TemplateField(t, f) => EntityKey::FormTemplateField {
                template_id: t,
                field_id: f,
            },
            Row::Version(t, c, v) => EntityKey::FormVersion {
                template_id: t,
                citizen_id: c,
                version_id: v,
            },
            Row::FieldValue(t, c, v, f) => EntityKey::FormFieldValue {
                template_id: t,
                citizen_id: c,
                version_id: v,
                field_id: f,
            },
        }
    }

    fn encode(&self) -> StorageKey {
        self.key().encode().expect("generated identifiers are valid")
    }
}

fn ident() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{1,6}"
}

fn date() -> impl Strategy<Value = NaiveDate> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid base date");
    (0u64..800).prop_map(move |offset| base + Days::new(offset))
}

fn row() -> impl Strategy<Value = Row> {
    prop_oneof![
        ident().prop_map(Row::Route),
        (ident(), date()).prop_map(|(p, d)| Row::Reservation(p, d)),
        (ident(), date(), ident()).prop_map(|(r, d, c)| Row::BulkWaste(r, d, c)),
        ident().prop_map(Row::Template),
        (ident(), ident()).prop_map(|(t, f)| Row::TemplateField(t, f)),
        (ident(), ident(), ident()).prop_map(|(t, c, v)| Row::Version(t, c, v)),
        (ident(), ident(), ident(), ident()).prop_map(|(t, c, v, f)| Row::FieldValue(t, c, v, f)),
    ]
}

proptest! {
    #[test]
    fn encoding_is_deterministic(row in row()) {
        prop_assert_eq!(row.encode(), row.encode());
    }

    #[test]
    fn distinct_rows_never_collide(a in row(), b in row()) {
        prop_assume!(a != b);
        prop_assert_ne!(a.encode(), b.encode());
    }

    #[test]
    fn decode_recovers_the_encoded_row(row in row()) {
        let key = row.encode();
        prop_assert_eq!(EntityKey::decode(&key.pk, &key.sk).unwrap(), row.key());
    }

    #[test]
    fn delimiter_anywhere_in_an_identifier_is_rejected(
        left in "[A-Za-z0-9]{0,4}",
        right in "[A-Za-z0-9]{0,4}",
    ) {
        let poisoned = format!("{left}#{right}");
        let err = EntityKey::GarbageRoute { district_id: &poisoned }.encode().unwrap_err();
        prop_assert!(
            matches!(err, KeyError::InvalidIdentifier { field: "district_id", .. }),
            "unexpected error: {:?}",
            err
        );
    }
}
