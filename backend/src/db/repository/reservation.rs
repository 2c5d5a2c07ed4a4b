//! Reservation repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::RepositoryResult;
use crate::api::{NewReservation, Reservation, ReservationFilter, ReservationId, UserId};

/// Repository trait for reservation records.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Number of reservations held by `user_id` across all restaurants.
    async fn count_reservations_by_user(&self, user_id: UserId) -> RepositoryResult<usize>;

    /// Persist an admitted reservation.
    async fn insert_reservation(&self, reservation: &NewReservation)
        -> RepositoryResult<Reservation>;

    /// Look up a reservation by id. `Ok(None)` when it does not exist.
    async fn find_reservation(&self, id: ReservationId) -> RepositoryResult<Option<Reservation>>;

    /// All reservations matching `filter`, ordered by id.
    async fn list_reservations(
        &self,
        filter: ReservationFilter,
    ) -> RepositoryResult<Vec<Reservation>>;

    /// Move a reservation to a new date. `Ok(None)` when it does not exist.
    async fn update_reservation_date(
        &self,
        id: ReservationId,
        reserved_date: DateTime<Utc>,
    ) -> RepositoryResult<Option<Reservation>>;

    /// Delete a reservation. `Ok(false)` when there was nothing to delete.
    async fn delete_reservation(&self, id: ReservationId) -> RepositoryResult<bool>;
}
