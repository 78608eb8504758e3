use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::model::reservation::{CreateReservation, Reservation, ReservationFilter, ReservationPatch};

pub mod postgres;
#[cfg(test)]
pub mod memory;

pub use postgres::PgReservationRepository;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    // Reservations matching every set field of the filter, ascending by date
    async fn find_reservations(&self, filter: &ReservationFilter) -> AppResult<Vec<Reservation>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Reservation>>;

    // Cancel or return one RESERVED record; anything else is InvalidState
    async fn mutate_reservation(&self, id: Uuid, patch: &ReservationPatch) -> AppResult<Reservation>;

    // New RESERVED record
    async fn create_reservation(&self, data: &CreateReservation) -> AppResult<Reservation>;
}
