//! Service layer for business logic and orchestration.
//!
//! Services sit between the HTTP handlers and the repositories. They work with
//! any [`FullRepository`] and own the reservation rules:
//!
//! - [`availability`]: reservation-time and weekly-schedule checks
//! - [`quota`]: the per-user reservation cap
//! - [`reservations`]: the creation flow plus list/get/update/delete
//! - [`restaurants`]: validated restaurant maintenance

pub mod availability;
pub mod error;
pub mod quota;
pub mod reservations;
pub mod restaurants;

pub use availability::{is_reservation_time_allowed, is_valid_weekly_schedule};
pub use error::{ServiceError, ServiceResult};
pub use quota::{is_under_quota, RESERVATION_QUOTA};
pub use reservations::{
    create_reservation, delete_reservation, get_reservation, list_reservations,
    update_reservation,
};
pub use restaurants::{
    create_restaurant, delete_restaurant, get_restaurant, list_restaurants, update_restaurant,
    RestaurantDraft, RestaurantPatch,
};

use crate::db::repository::{FullRepository, RepositoryResult};

/// Check if the repository is reachable.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}
