use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

// Rental slot within the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Period {
    AllDay,
    Morning,
    Afternoon,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::AllDay => "ALL_DAY",
            Period::Morning => "MORNING",
            Period::Afternoon => "AFTERNOON",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL_DAY" => Ok(Period::AllDay),
            "MORNING" => Ok(Period::Morning),
            "AFTERNOON" => Ok(Period::Afternoon),
            other => Err(AppError::InvalidInput(format!("Unknown period: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Reserved,
    Returned,
    Canceled,
    // Set by the month-end closing job, never by this service
    Completed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Reserved => "RESERVED",
            ReservationStatus::Returned => "RETURNED",
            ReservationStatus::Canceled => "CANCELED",
            ReservationStatus::Completed => "COMPLETED",
        }
    }

    /// Whether the record carries a usable mileage log.
    pub fn is_driven(&self) -> bool {
        matches!(self, ReservationStatus::Returned | ReservationStatus::Completed)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RESERVED" => Ok(ReservationStatus::Reserved),
            "RETURNED" => Ok(ReservationStatus::Returned),
            "CANCELED" => Ok(ReservationStatus::Canceled),
            "COMPLETED" => Ok(ReservationStatus::Completed),
            other => Err(AppError::InvalidInput(format!("Unknown status: {}", other))),
        }
    }
}

// One vehicle-day booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,
    pub vehicle_id: String,
    pub member_id: String,
    pub date: NaiveDate,
    pub period: Period,
    pub region: Option<String>,
    pub visit_place: Option<String>,
    pub business_type: Option<String>,
    pub status: ReservationStatus,
    pub start_mileage: Option<i64>,
    pub end_mileage: Option<i64>,
    pub return_date: Option<NaiveDate>,
}

impl Reservation {
    pub fn region_key(&self) -> &str {
        self.region.as_deref().unwrap_or("")
    }

    pub fn visit_place_key(&self) -> &str {
        self.visit_place.as_deref().unwrap_or("")
    }

    pub fn business_type_key(&self) -> &str {
        self.business_type.as_deref().unwrap_or("")
    }
}

// Data for a single creation call
#[derive(Debug, Clone)]
pub struct CreateReservation {
    pub vehicle_id: String,
    pub member_id: String,
    pub date: NaiveDate,
    pub period: Period,
    pub region: Option<String>,
    pub visit_place: Option<String>,
    pub business_type: Option<String>,
}

// Mutation applied to one record
#[derive(Debug, Clone, PartialEq)]
pub enum ReservationPatch {
    Cancel,
    Return {
        start_mileage: i64,
        end_mileage: i64,
        return_date: NaiveDate,
    },
}

impl ReservationPatch {
    pub fn target_status(&self) -> ReservationStatus {
        match self {
            ReservationPatch::Cancel => ReservationStatus::Canceled,
            ReservationPatch::Return { .. } => ReservationStatus::Returned,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<ReservationStatus>,
    pub vehicle_id: Option<String>,
    pub member_id: Option<String>,
}

impl ReservationFilter {
    pub fn matches(&self, reservation: &Reservation) -> bool {
        self.date_from.map_or(true, |d| reservation.date >= d)
            && self.date_to.map_or(true, |d| reservation.date <= d)
            && self.status.map_or(true, |s| reservation.status == s)
            && self.vehicle_id.as_ref().map_or(true, |v| &reservation.vehicle_id == v)
            && self.member_id.as_ref().map_or(true, |m| &reservation.member_id == m)
    }
}

// Query string of the month views
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
    pub status: Option<ReservationStatus>,
    pub vehicle_id: Option<String>,
    pub member_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRangeRequest {
    pub vehicle_id: String,
    pub member_id: String,
    pub start_date: String,
    pub end_date: String,
    pub period: Period,
    pub region: Option<String>,
    pub visit_place: Option<String>,
    pub business_type: Option<String>,
}

// Mileage arrives as text from the form, validated before any mutation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnGroupRequest {
    pub start_mileage: serde_json::Value,
    pub end_mileage: serde_json::Value,
    pub return_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReservationListResponse {
    pub reservations: Vec<Reservation>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct GroupedListResponse {
    pub groups: Vec<Vec<Reservation>>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub anchor_id: Uuid,
    pub reservations: Vec<Reservation>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub success: bool,
    pub message: String,
    pub reservations: Vec<Reservation>,
    pub total: usize,
}
