use crate::dispatch::dates::month_bounds;
use crate::error::AppResult;
use crate::model::report::{DrivingLog, DrivingLogEntry};
use crate::model::reservation::Reservation;

/// Monthly driving log from returned and completed records.
///
/// Records without both odometer readings are left out. Mileage of the
/// commute business type counts toward the total but not the business
/// distance.
pub fn monthly_driving_log(
    records: &[Reservation],
    year: i32,
    month: u32,
    commute_business_type: &str,
) -> AppResult<DrivingLog> {
    let (first, last) = month_bounds(year, month)?;

    let mut entries: Vec<DrivingLogEntry> = records
        .iter()
        .filter(|r| r.date >= first && r.date <= last && r.status.is_driven())
        .filter_map(|r| {
            let (start, end) = (r.start_mileage?, r.end_mileage?);
            let distance = end - start;
            let business_distance = if r.business_type_key() == commute_business_type {
                0
            } else {
                distance
            };
            Some(DrivingLogEntry {
                reservation_id: r.id,
                vehicle_id: r.vehicle_id.clone(),
                member_id: r.member_id.clone(),
                date: r.date,
                business_type: r.business_type.clone(),
                start_mileage: start,
                end_mileage: end,
                distance,
                business_distance,
            })
        })
        .collect();

    entries.sort_by(|a, b| {
        a.vehicle_id
            .cmp(&b.vehicle_id)
            .then(a.date.cmp(&b.date))
            .then(a.start_mileage.cmp(&b.start_mileage))
    });

    let total_distance = entries.iter().map(|e| e.distance).sum();
    let business_distance = entries.iter().map(|e| e.business_distance).sum();

    Ok(DrivingLog {
        year,
        month,
        entries,
        total_distance,
        business_distance,
    })
}
