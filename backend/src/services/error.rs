//! Errors returned by the service layer.

use chrono::{DateTime, Utc};

use crate::api::{ReservationId, RestaurantId, UserId, Weekday};
use crate::db::repository::RepositoryError;
use crate::models::ScheduleError;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Why a service operation was refused or failed.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("No restaurant with the id of {0}")]
    RestaurantNotFound(RestaurantId),

    #[error("No reservation with the id of {0}")]
    ReservationNotFound(ReservationId),

    #[error("The user with ID {user_id} has already made {limit} reservations")]
    QuotaExceeded { user_id: UserId, limit: usize },

    #[error("Restaurant {restaurant_id} does not accept reservations at {reserved_date} ({weekday})")]
    OutsideAvailability {
        restaurant_id: RestaurantId,
        reserved_date: DateTime<Utc>,
        weekday: Weekday,
    },

    #[error("Invalid available_time: {0}")]
    InvalidSchedule(#[from] ScheduleError),

    #[error("Invalid restaurant: {0}")]
    InvalidRestaurant(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ConflictError { message, .. } => ServiceError::Conflict(message),
            other => ServiceError::Repository(other),
        }
    }
}
