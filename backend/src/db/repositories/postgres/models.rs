use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

use super::schema::{reservations, restaurants};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = restaurants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RestaurantRow {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub district: String,
    pub province: String,
    pub postal_code: String,
    pub tel: Option<String>,
    pub available_time: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = restaurants)]
pub struct NewRestaurantRow {
    pub name: String,
    pub address: String,
    pub district: String,
    pub province: String,
    pub postal_code: String,
    pub tel: Option<String>,
    pub available_time: Value,
}

/// Partial update; `None` fields are left out of the `SET` clause.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = restaurants)]
pub struct RestaurantChangeset {
    pub name: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub tel: Option<String>,
    pub available_time: Option<Value>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reservations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReservationRow {
    pub id: i64,
    pub user_id: i64,
    pub restaurant_id: i64,
    pub reserved_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reservations)]
pub struct NewReservationRow {
    pub user_id: i64,
    pub restaurant_id: i64,
    pub reserved_date: DateTime<Utc>,
}
