//! Demo data: garbage routes per district and a month of park reservations.

use crate::error::{AgentError, Result};
use chrono::NaiveDate;
use civic_keyspace::DATE_FORMAT;
use civic_store::Records;
use serde::Serialize;

pub const GARBAGE_ROUTES: &[(&str, &[&str])] = &[
    ("Yellow", &["A1", "A2", "A3", "A4"]),
    ("Blue", &["A5", "A6", "B3", "B4"]),
    ("Orange", &["B1", "B2", "C1", "C2"]),
    ("Green", &["C3", "C4", "C5", "C6"]),
    ("Red", &["D3", "D4", "D5", "D6"]),
];

/// `(park, date, citizen)`
pub const PARK_RESERVATIONS: &[(&str, &str, &str)] = &[
    ("P1", "2024-12-03", "C1"),
    ("P1", "2024-12-04", "C2"),
    ("P1", "2024-12-05", "C3"),
    ("P1", "2024-12-07", "C4"),
    ("P1", "2024-12-08", "C5"),
    ("P1", "2024-12-09", "C1"),
    ("P1", "2024-12-10", "C1"),
    ("P1", "2024-12-11", "C2"),
    ("P1", "2024-12-13", "C4"),
    ("P1", "2024-12-14", "C1"),
    ("P1", "2024-12-18", "C5"),
    ("P1", "2024-12-19", "C5"),
    ("P1", "2024-12-23", "C4"),
    ("P1", "2024-12-24", "C11"),
    ("P1", "2024-12-25", "C111"),
    ("P1", "2024-12-26", "C109"),
    ("P1", "2024-12-29", "C31"),
    ("P2", "2024-12-13", "C201"),
    ("P3", "2024-12-12", "C10"),
    ("P4", "2024-12-09", "C111"),
    ("P5", "2024-12-03", "C1"),
    ("P6", "2024-12-04", "C2"),
    ("P7", "2024-12-05", "C3"),
    ("P7", "2024-12-07", "C4"),
    ("P7", "2024-12-08", "C5"),
    ("P7", "2024-12-09", "C1"),
    ("P7", "2024-12-10", "C1"),
    ("P7", "2024-12-11", "C2"),
    ("P7", "2024-12-13", "C4"),
    ("P7", "2024-12-14", "C1"),
    ("P7", "2024-12-18", "C5"),
    ("P7", "2024-12-19", "C5"),
    ("P7", "2024-12-23", "C4"),
    ("P7", "2024-12-24", "C11"),
    ("P8", "2024-12-25", "C111"),
    ("P8", "2024-12-26", "C109"),
    ("P8", "2024-12-29", "C31"),
    ("P8", "2024-12-13", "C201"),
    ("P8", "2024-12-12", "C10"),
    ("P8", "2024-12-09", "C111"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub garbage_routes: usize,
    pub park_reservations: usize,
}

/// Write the demo rows. Re-seeding overwrites the same keys.
pub async fn seed(records: &Records) -> Result<SeedReport> {
    let mut report = SeedReport {
        garbage_routes: 0,
        park_reservations: 0,
    };

    for (route, districts) in GARBAGE_ROUTES {
        for district in *districts {
            records.put_garbage_route(district, route).await?;
            report.garbage_routes += 1;
        }
    }

    for (park, date, citizen) in PARK_RESERVATIONS {
        let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|e| AgentError::InvalidEvent(format!("sample date {date}: {e}")))?;
        records.write_park_reservation(park, date, citizen).await?;
        report.park_reservations += 1;
    }

    log::info!(
        "Seeded {} garbage routes and {} park reservations into {}",
        report.garbage_routes,
        report.park_reservations,
        records.backend_name()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_store::MemoryStore;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[tokio::test]
    async fn seeds_routes_and_reservations() {
        let records = Records::new(Arc::new(MemoryStore::new()));
        let report = seed(&records).await.unwrap();

        assert_eq!(report.garbage_routes, 20);
        assert_eq!(report.park_reservations, PARK_RESERVATIONS.len());
        assert_eq!(records.garbage_route("B3").await.unwrap(), "Blue");
        assert_eq!(records.park_reservations("P8").await.unwrap().len(), 6);

        // Idempotent: same keys, same row count.
        seed(&records).await.unwrap();
        assert_eq!(records.park_reservations("P1").await.unwrap().len(), 17);
    }
}
