use chrono::{Datelike, NaiveDate};
use tracing::{info, warn};
use uuid::Uuid;

use crate::dispatch::dates::{date_range_days, days_between, month_bounds, parse_local_date};
use crate::dispatch::group::group_consecutive;
use crate::dispatch::mileage::distribute_mileage;
use crate::error::{AppError, AppResult};
use crate::model::reservation::{
    CreateReservation, RegisterRangeRequest, Reservation, ReservationFilter, ReservationPatch,
    ReservationStatus,
};
use crate::repository::ReservationRepository;

/// Longest span a single range registration may cover.
pub const MAX_RANGE_DAYS: i64 = 366;

fn interrupted(completed: usize, total: usize, err: AppError) -> AppError {
    warn!("Batch stopped after {}/{} records: {}", completed, total, err);
    AppError::BatchInterrupted {
        completed,
        total,
        message: err.to_string(),
    }
}

/// Group of the anchor as the month view shows it.
///
/// Candidates come from the anchor's calendar month only, so a run crossing
/// a month boundary is cut there.
pub async fn find_group(repo: &dyn ReservationRepository, anchor_id: Uuid) -> AppResult<Vec<Reservation>> {
    let anchor = repo
        .find_by_id(anchor_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("reservation {}", anchor_id)))?;

    let (first, last) = month_bounds(anchor.date.year(), anchor.date.month())?;
    let filter = ReservationFilter {
        date_from: Some(first),
        date_to: Some(last),
        status: Some(ReservationStatus::Reserved),
        vehicle_id: Some(anchor.vehicle_id.clone()),
        member_id: Some(anchor.member_id.clone()),
    };
    let month = repo.find_reservations(&filter).await?;

    Ok(group_consecutive(&month, &anchor))
}

async fn find_reserved_group(
    repo: &dyn ReservationRepository,
    anchor_id: Uuid,
) -> AppResult<Vec<Reservation>> {
    let group = find_group(repo, anchor_id).await?;
    if let Some(stale) = group.iter().find(|r| r.status != ReservationStatus::Reserved) {
        return Err(AppError::InvalidState(format!(
            "reservation {} is {}",
            stale.id, stale.status
        )));
    }
    Ok(group)
}

/// Cancels every record of the anchor's group, one call per record.
pub async fn cancel_group(
    repo: &dyn ReservationRepository,
    anchor_id: Uuid,
) -> AppResult<Vec<Reservation>> {
    let group = find_reserved_group(repo, anchor_id).await?;
    let total = group.len();
    info!("Canceling group of {} reservation(s) anchored at {}", total, anchor_id);

    let mut canceled = Vec::with_capacity(total);
    for reservation in &group {
        match repo.mutate_reservation(reservation.id, &ReservationPatch::Cancel).await {
            Ok(updated) => canceled.push(updated),
            Err(e) => return Err(interrupted(canceled.len(), total, e)),
        }
    }

    Ok(canceled)
}

/// Returns the anchor's group, splitting one odometer range over its days.
///
/// The range is validated before the first write.
pub async fn return_group(
    repo: &dyn ReservationRepository,
    anchor_id: Uuid,
    start_mileage: i64,
    end_mileage: i64,
    return_date: NaiveDate,
) -> AppResult<Vec<Reservation>> {
    let group = find_reserved_group(repo, anchor_id).await?;
    let total = group.len();
    let daily = distribute_mileage(start_mileage, end_mileage, total)?;
    info!(
        "Returning group of {} reservation(s) anchored at {} ({} -> {})",
        total, anchor_id, start_mileage, end_mileage
    );

    let mut returned = Vec::with_capacity(total);
    for (reservation, day) in group.iter().zip(daily) {
        let patch = ReservationPatch::Return {
            start_mileage: day.start,
            end_mileage: day.end,
            return_date,
        };
        match repo.mutate_reservation(reservation.id, &patch).await {
            Ok(updated) => returned.push(updated),
            Err(e) => return Err(interrupted(returned.len(), total, e)),
        }
    }

    Ok(returned)
}

/// Creates one RESERVED record per day of the requested range.
pub async fn register_range(
    repo: &dyn ReservationRepository,
    request: &RegisterRangeRequest,
) -> AppResult<Vec<Reservation>> {
    if request.vehicle_id.trim().is_empty() || request.member_id.trim().is_empty() {
        return Err(AppError::InvalidInput("vehicleId and memberId are required".to_string()));
    }
    let start = parse_local_date(&request.start_date)?;
    let end = parse_local_date(&request.end_date)?;
    if days_between(start, end) >= MAX_RANGE_DAYS {
        return Err(AppError::InvalidInput(format!(
            "range {} to {} exceeds {} days",
            start, end, MAX_RANGE_DAYS
        )));
    }

    let days = date_range_days(start, end);
    let total = days.len();
    info!(
        "Registering {} day(s) of {} for {} from {}",
        total, request.vehicle_id, request.member_id, request.start_date
    );

    let mut created = Vec::with_capacity(total);
    for date in days {
        let data = CreateReservation {
            vehicle_id: request.vehicle_id.clone(),
            member_id: request.member_id.clone(),
            date,
            period: request.period,
            region: request.region.clone(),
            visit_place: request.visit_place.clone(),
            business_type: request.business_type.clone(),
        };
        match repo.create_reservation(&data).await {
            Ok(reservation) => created.push(reservation),
            Err(e) => return Err(interrupted(created.len(), total, e)),
        }
    }

    Ok(created)
}
