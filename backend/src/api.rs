//! Public API surface for the backend.
//!
//! This file consolidates the identifier newtypes and re-exports the domain types
//! exchanged between the HTTP layer, the services and the repositories.

pub use crate::models::{
    Identity, Interval, NewReservation, NewRestaurant, Page, PageLink, PageRequest, Pagination,
    RawWeeklySchedule, Reservation, ReservationDetails, ReservationFilter, ReservationRequest,
    Restaurant, RestaurantSummary, RestaurantUpdate, Role, TimeOfDay, Weekday, WeeklySchedule,
};

crate::define_id_type!(i64, RestaurantId);
crate::define_id_type!(i64, ReservationId);
crate::define_id_type!(i64, UserId);
