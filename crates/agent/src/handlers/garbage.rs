use crate::error::Result;
use chrono::NaiveDate;
use civic_keyspace::format_date;
use civic_store::Records;

pub async fn get_garbage_pickup_day(records: &Records, district_id: &str) -> Result<String> {
    let route = records.garbage_route(district_id).await?;
    Ok(format!(
        "Garbage pickup route for district ID {district_id}: {route}"
    ))
}

pub async fn schedule_bulk_pickup(
    records: &Records,
    citizen_id: &str,
    pickup_date: NaiveDate,
    garbage_route: &str,
) -> Result<String> {
    records
        .write_bulk_waste_request(garbage_route, pickup_date, citizen_id)
        .await?;
    log::info!("Bulk waste pickup on {garbage_route} for {citizen_id}");
    Ok(format!(
        "Bulk waste pickup requested for {citizen_id} {} {garbage_route}",
        format_date(pickup_date)
    ))
}
