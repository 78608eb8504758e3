use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::model::reservation::{
    CreateReservation, Reservation, ReservationFilter, ReservationPatch, ReservationStatus,
};
use crate::repository::ReservationRepository;

/// In-memory store for service and route tests.
///
/// `fail_after(n)` makes every write after the first `n` fail, to exercise
/// partially applied batches.
#[derive(Default)]
pub struct MemoryReservationRepository {
    records: Mutex<Vec<Reservation>>,
    writes: Mutex<usize>,
    fail_after: Option<usize>,
}

impl MemoryReservationRepository {
    pub fn with_records(records: Vec<Reservation>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    pub fn fail_after(mut self, writes: usize) -> Self {
        self.fail_after = Some(writes);
        self
    }

    pub fn snapshot(&self) -> Vec<Reservation> {
        self.records.lock().unwrap().clone()
    }

    fn count_write(&self) -> AppResult<()> {
        let mut writes = self.writes.lock().unwrap();
        if self.fail_after.map_or(false, |limit| *writes >= limit) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        *writes += 1;
        Ok(())
    }
}

#[async_trait]
impl ReservationRepository for MemoryReservationRepository {
    async fn find_reservations(&self, filter: &ReservationFilter) -> AppResult<Vec<Reservation>> {
        let mut found: Vec<Reservation> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Reservation>> {
        Ok(self.records.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn mutate_reservation(&self, id: Uuid, patch: &ReservationPatch) -> AppResult<Reservation> {
        self.count_write()?;
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("reservation {}", id)))?;

        if record.status != ReservationStatus::Reserved {
            return Err(AppError::InvalidState(format!(
                "reservation {} is {}, cannot become {}",
                id,
                record.status,
                patch.target_status()
            )));
        }

        record.status = patch.target_status();
        if let ReservationPatch::Return {
            start_mileage,
            end_mileage,
            return_date,
        } = patch
        {
            record.start_mileage = Some(*start_mileage);
            record.end_mileage = Some(*end_mileage);
            record.return_date = Some(*return_date);
        }
        Ok(record.clone())
    }

    async fn create_reservation(&self, data: &CreateReservation) -> AppResult<Reservation> {
        self.count_write()?;
        let reservation = Reservation {
            id: Uuid::new_v4(),
            vehicle_id: data.vehicle_id.clone(),
            member_id: data.member_id.clone(),
            date: data.date,
            period: data.period,
            region: data.region.clone(),
            visit_place: data.visit_place.clone(),
            business_type: data.business_type.clone(),
            status: ReservationStatus::Reserved,
            start_mileage: None,
            end_mileage: None,
            return_date: None,
        };
        self.records.lock().unwrap().push(reservation.clone());
        Ok(reservation)
    }
}
