use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::model::reservation::{
    CreateReservation, Reservation, ReservationFilter, ReservationPatch, ReservationStatus,
};
use crate::repository::ReservationRepository;

const COLUMNS: &str = "id, vehicle_id, member_id, reservation_date, period, region, visit_place, \
                       business_type, status, start_mileage, end_mileage, return_date";

// Row as stored, enums kept as TEXT
#[derive(Debug, FromRow)]
struct ReservationRow {
    id: Uuid,
    vehicle_id: String,
    member_id: String,
    reservation_date: NaiveDate,
    period: String,
    region: Option<String>,
    visit_place: Option<String>,
    business_type: Option<String>,
    status: String,
    start_mileage: Option<i64>,
    end_mileage: Option<i64>,
    return_date: Option<NaiveDate>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = AppError;

    fn try_from(row: ReservationRow) -> Result<Self, Self::Error> {
        Ok(Reservation {
            id: row.id,
            vehicle_id: row.vehicle_id,
            member_id: row.member_id,
            date: row.reservation_date,
            period: row.period.parse()?,
            region: row.region,
            visit_place: row.visit_place,
            business_type: row.business_type,
            status: row.status.parse()?,
            start_mileage: row.start_mileage,
            end_mileage: row.end_mileage,
            return_date: row.return_date,
        })
    }
}

#[derive(Clone)]
pub struct PgReservationRepository {
    pool: PgPool,
}

impl PgReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn init_schema(&self) -> AppResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS reservations (
                id UUID PRIMARY KEY,
                vehicle_id TEXT NOT NULL,
                member_id TEXT NOT NULL,
                reservation_date DATE NOT NULL,
                period TEXT NOT NULL,
                region TEXT,
                visit_place TEXT,
                business_type TEXT,
                status TEXT NOT NULL,
                start_mileage BIGINT,
                end_mileage BIGINT,
                return_date DATE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_reservations_date_status
             ON reservations (reservation_date, status)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn into_reservations(rows: Vec<ReservationRow>) -> AppResult<Vec<Reservation>> {
    rows.into_iter().map(Reservation::try_from).collect()
}

#[async_trait]
impl ReservationRepository for PgReservationRepository {
    async fn find_reservations(&self, filter: &ReservationFilter) -> AppResult<Vec<Reservation>> {
        // Build where clause in bind order
        let mut where_clauses: Vec<String> = Vec::new();
        if filter.date_from.is_some() {
            where_clauses.push(format!("reservation_date >= ${}", where_clauses.len() + 1));
        }
        if filter.date_to.is_some() {
            where_clauses.push(format!("reservation_date <= ${}", where_clauses.len() + 1));
        }
        if filter.status.is_some() {
            where_clauses.push(format!("status = ${}", where_clauses.len() + 1));
        }
        if filter.vehicle_id.is_some() {
            where_clauses.push(format!("vehicle_id = ${}", where_clauses.len() + 1));
        }
        if filter.member_id.is_some() {
            where_clauses.push(format!("member_id = ${}", where_clauses.len() + 1));
        }

        let where_clause = if where_clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", where_clauses.join(" AND "))
        };
        let query_str = format!(
            "SELECT {} FROM reservations {} ORDER BY reservation_date ASC, id ASC",
            COLUMNS, where_clause
        );
        debug!("find_reservations: {}", query_str);

        let mut query = sqlx::query_as::<_, ReservationRow>(&query_str);
        if let Some(date_from) = filter.date_from {
            query = query.bind(date_from);
        }
        if let Some(date_to) = filter.date_to {
            query = query.bind(date_to);
        }
        if let Some(status) = filter.status {
            query = query.bind(status.as_str());
        }
        if let Some(vehicle_id) = &filter.vehicle_id {
            query = query.bind(vehicle_id);
        }
        if let Some(member_id) = &filter.member_id {
            query = query.bind(member_id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        into_reservations(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Reservation>> {
        let query_str = format!("SELECT {} FROM reservations WHERE id = $1", COLUMNS);
        let row = sqlx::query_as::<_, ReservationRow>(&query_str)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Reservation::try_from).transpose()
    }

    async fn mutate_reservation(&self, id: Uuid, patch: &ReservationPatch) -> AppResult<Reservation> {
        let row = match patch {
            ReservationPatch::Cancel => {
                let query_str = format!(
                    "UPDATE reservations SET status = $1, updated_at = NOW()
                     WHERE id = $2 AND status = $3
                     RETURNING {}",
                    COLUMNS
                );
                sqlx::query_as::<_, ReservationRow>(&query_str)
                    .bind(ReservationStatus::Canceled.as_str())
                    .bind(id)
                    .bind(ReservationStatus::Reserved.as_str())
                    .fetch_optional(&self.pool)
                    .await?
            }
            ReservationPatch::Return {
                start_mileage,
                end_mileage,
                return_date,
            } => {
                let query_str = format!(
                    "UPDATE reservations
                     SET status = $1, start_mileage = $2, end_mileage = $3, return_date = $4,
                         updated_at = NOW()
                     WHERE id = $5 AND status = $6
                     RETURNING {}",
                    COLUMNS
                );
                sqlx::query_as::<_, ReservationRow>(&query_str)
                    .bind(ReservationStatus::Returned.as_str())
                    .bind(*start_mileage)
                    .bind(*end_mileage)
                    .bind(*return_date)
                    .bind(id)
                    .bind(ReservationStatus::Reserved.as_str())
                    .fetch_optional(&self.pool)
                    .await?
            }
        };

        match row {
            Some(row) => row.try_into(),
            // Nothing updated: either missing or no longer RESERVED
            None => match self.find_by_id(id).await? {
                Some(existing) => Err(AppError::InvalidState(format!(
                    "reservation {} is {}, cannot become {}",
                    id,
                    existing.status,
                    patch.target_status()
                ))),
                None => Err(AppError::NotFound(format!("reservation {}", id))),
            },
        }
    }

    async fn create_reservation(&self, data: &CreateReservation) -> AppResult<Reservation> {
        let query_str = format!(
            "INSERT INTO reservations
             (id, vehicle_id, member_id, reservation_date, period, region, visit_place,
              business_type, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query_as::<_, ReservationRow>(&query_str)
            .bind(Uuid::new_v4())
            .bind(&data.vehicle_id)
            .bind(&data.member_id)
            .bind(data.date)
            .bind(data.period.as_str())
            .bind(&data.region)
            .bind(&data.visit_place)
            .bind(&data.business_type)
            .bind(ReservationStatus::Reserved.as_str())
            .fetch_one(&self.pool)
            .await?;

        row.try_into()
    }
}
