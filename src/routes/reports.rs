use axum::{
    Router,
    routing::get,
    extract::{Extension, Query},
    response::Json as RespJson,
};
use tracing::info;

use crate::context::AppContext;
use crate::dispatch::{dates::month_bounds, monthly_driving_log};
use crate::error::AppResult;
use crate::model::report::{DrivingLog, DrivingLogQuery};
use crate::model::reservation::ReservationFilter;

pub fn report_router() -> Router {
    info!("🔧 Registering report routes...");
    Router::new().route("/api/reports/driving-log", get(driving_log))
}

// Monthly driving log with business distance
async fn driving_log(
    Extension(ctx): Extension<AppContext>,
    Query(params): Query<DrivingLogQuery>,
) -> AppResult<RespJson<DrivingLog>> {
    let (first, last) = month_bounds(params.year, params.month)?;
    let filter = ReservationFilter {
        date_from: Some(first),
        date_to: Some(last),
        vehicle_id: params.vehicle_id.clone(),
        ..Default::default()
    };
    let records = ctx.repo.find_reservations(&filter).await?;
    let log = monthly_driving_log(
        &records,
        params.year,
        params.month,
        &ctx.config.commute_business_type,
    )?;

    Ok(RespJson(log))
}
