use crate::error::Result;
use chrono::NaiveDate;
use civic_keyspace::format_date;
use civic_store::Records;

pub async fn get_available_park_days(
    records: &Records,
    park_id: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<String> {
    let days: Vec<String> = records
        .available_park_days(park_id, start_date, end_date)
        .await?
        .into_iter()
        .map(format_date)
        .collect();
    Ok(format!(
        "Available days for park ID {park_id} between {} and {}: {}",
        format_date(start_date),
        format_date(end_date),
        serde_json::to_string(&days)?
    ))
}

pub async fn book_park(
    records: &Records,
    citizen_id: &str,
    park_id: &str,
    reservation_date: NaiveDate,
) -> Result<String> {
    records
        .write_park_reservation(park_id, reservation_date, citizen_id)
        .await?;
    log::info!("Reserved park {park_id} for {citizen_id}");
    Ok(format!(
        "Created reservation for customer_id: {citizen_id} at park_id: {park_id} on {}",
        format_date(reservation_date)
    ))
}
