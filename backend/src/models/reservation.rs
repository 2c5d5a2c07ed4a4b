//! Reservation records and request types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identity::Identity;
use super::restaurant::RestaurantSummary;
use crate::api::{RestaurantId, ReservationId, UserId};

/// A stored reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    pub reserved_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// An admitted reservation waiting to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    pub reserved_date: DateTime<Utc>,
}

impl NewReservation {
    pub fn into_reservation(self, id: ReservationId, created_at: DateTime<Utc>) -> Reservation {
        Reservation {
            id,
            user_id: self.user_id,
            restaurant_id: self.restaurant_id,
            reserved_date: self.reserved_date,
            created_at,
        }
    }
}

/// A caller asking to book a restaurant at a given instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRequest {
    pub identity: Identity,
    pub restaurant_id: RestaurantId,
    pub reserved_date: DateTime<Utc>,
}

/// Selects reservations by owner and/or restaurant. Empty filter matches everything.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ReservationFilter {
    pub user_id: Option<UserId>,
    pub restaurant_id: Option<RestaurantId>,
}

impl ReservationFilter {
    pub fn by_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            restaurant_id: None,
        }
    }

    pub fn by_restaurant(restaurant_id: RestaurantId) -> Self {
        Self {
            user_id: None,
            restaurant_id: Some(restaurant_id),
        }
    }

    pub fn matches(&self, reservation: &Reservation) -> bool {
        self.user_id.map_or(true, |u| u == reservation.user_id)
            && self
                .restaurant_id
                .map_or(true, |r| r == reservation.restaurant_id)
    }
}

/// A reservation together with a summary of its restaurant.
///
/// `restaurant` is `None` when the restaurant no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDetails {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub restaurant: Option<RestaurantSummary>,
}
