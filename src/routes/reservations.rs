use axum::{
    Router,
    routing::{get, post},
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as RespJson,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::context::AppContext;
use crate::dispatch::{
    batch,
    dates::{month_bounds, parse_local_date, today_local},
    group_all,
    mileage::parse_mileage,
};
use crate::error::AppResult;
use crate::model::reservation::{
    BatchResponse, GroupResponse, GroupedListResponse, MonthQuery, RegisterRangeRequest, ReservationFilter,
    ReservationListResponse, ReservationStatus, ReturnGroupRequest,
};

pub fn reservation_router() -> Router {
    info!("🔧 Registering reservation routes...");
    Router::new()
        .route("/api/reservations", get(list_reservations))
        .route("/api/reservations/grouped", get(list_grouped))
        .route("/api/reservations/batch", post(register_batch))
        .route("/api/reservations/:id/group", get(get_group))
        .route("/api/reservations/:id/cancel", post(cancel_group))
        .route("/api/reservations/:id/return", post(return_group))
}

fn month_filter(params: &MonthQuery) -> AppResult<ReservationFilter> {
    let (first, last) = month_bounds(params.year, params.month)?;
    Ok(ReservationFilter {
        date_from: Some(first),
        date_to: Some(last),
        status: params.status,
        vehicle_id: params.vehicle_id.clone(),
        member_id: params.member_id.clone(),
    })
}

// Month view for the request/status calendars
async fn list_reservations(
    Extension(ctx): Extension<AppContext>,
    Query(params): Query<MonthQuery>,
) -> AppResult<RespJson<ReservationListResponse>> {
    debug!("📋 Listing reservations with params: {:?}", params);
    let filter = month_filter(&params)?;
    let reservations = ctx.repo.find_reservations(&filter).await?;
    let total = reservations.len();

    Ok(RespJson(ReservationListResponse { reservations, total }))
}

// Status page: every open booking of the month as groups
async fn list_grouped(
    Extension(ctx): Extension<AppContext>,
    Query(params): Query<MonthQuery>,
) -> AppResult<RespJson<GroupedListResponse>> {
    let mut filter = month_filter(&params)?;
    filter.status = Some(ReservationStatus::Reserved);
    let reservations = ctx.repo.find_reservations(&filter).await?;
    let groups = group_all(&reservations);
    let total = groups.len();

    Ok(RespJson(GroupedListResponse { groups, total }))
}

async fn get_group(
    Extension(ctx): Extension<AppContext>,
    Path(id): Path<Uuid>,
) -> AppResult<RespJson<GroupResponse>> {
    let reservations = batch::find_group(ctx.repo.as_ref(), id).await?;
    let total = reservations.len();

    Ok(RespJson(GroupResponse {
        anchor_id: id,
        reservations,
        total,
    }))
}

async fn register_batch(
    Extension(ctx): Extension<AppContext>,
    Json(payload): Json<RegisterRangeRequest>,
) -> AppResult<(StatusCode, RespJson<BatchResponse>)> {
    let created = batch::register_range(ctx.repo.as_ref(), &payload).await?;
    let total = created.len();
    info!("✅ Registered {} reservation(s)", total);

    Ok((
        StatusCode::CREATED,
        RespJson(BatchResponse {
            success: true,
            message: format!("{} reservation(s) registered", total),
            reservations: created,
            total,
        }),
    ))
}

async fn cancel_group(
    Extension(ctx): Extension<AppContext>,
    Path(id): Path<Uuid>,
) -> AppResult<RespJson<BatchResponse>> {
    let canceled = batch::cancel_group(ctx.repo.as_ref(), id).await?;
    let total = canceled.len();
    info!("✅ Canceled {} reservation(s)", total);

    Ok(RespJson(BatchResponse {
        success: true,
        message: format!("{} reservation(s) canceled", total),
        reservations: canceled,
        total,
    }))
}

async fn return_group(
    Extension(ctx): Extension<AppContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReturnGroupRequest>,
) -> AppResult<RespJson<BatchResponse>> {
    let start_mileage = parse_mileage(&payload.start_mileage)?;
    let end_mileage = parse_mileage(&payload.end_mileage)?;
    let return_date = match payload.return_date.as_deref() {
        Some(value) => parse_local_date(value)?,
        None => today_local(),
    };

    let returned =
        batch::return_group(ctx.repo.as_ref(), id, start_mileage, end_mileage, return_date).await?;
    let total = returned.len();
    info!("✅ Returned {} reservation(s)", total);

    Ok(RespJson(BatchResponse {
        success: true,
        message: format!("{} reservation(s) returned", total),
        reservations: returned,
        total,
    }))
}
