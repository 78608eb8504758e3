use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrivingLogEntry {
    pub reservation_id: Uuid,
    pub vehicle_id: String,
    pub member_id: String,
    pub date: NaiveDate,
    pub business_type: Option<String>,
    pub start_mileage: i64,
    pub end_mileage: i64,
    pub distance: i64,
    pub business_distance: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrivingLog {
    pub year: i32,
    pub month: u32,
    pub entries: Vec<DrivingLogEntry>,
    pub total_distance: i64,
    pub business_distance: i64,
}

#[derive(Debug, Deserialize)]
pub struct DrivingLogQuery {
    pub year: i32,
    pub month: u32,
    pub vehicle_id: Option<String>,
}
