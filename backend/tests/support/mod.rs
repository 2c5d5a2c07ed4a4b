#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Mutex;

use dinebook::api::{
    Interval, NewReservation, NewRestaurant, Page, PageRequest, RawWeeklySchedule, Reservation,
    ReservationFilter, ReservationId, Restaurant, RestaurantId, RestaurantUpdate, TimeOfDay,
    UserId, Weekday, WeeklySchedule,
};
use dinebook::db::repositories::LocalRepository;
use dinebook::db::repository::{RepositoryResult, ReservationRepository, RestaurantRepository};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the previous values on unwind and serializes access to the process
/// environment across tests running in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// ==================== Fixtures ====================

pub fn interval(open: &str, close: &str) -> Interval {
    Interval::open(
        TimeOfDay::parse(open).unwrap(),
        TimeOfDay::parse(close).unwrap(),
    )
}

/// Open 09:00:00-17:00:00 on Mondays, closed otherwise.
pub fn monday_nine_to_five() -> WeeklySchedule {
    WeeklySchedule::closed().with_day(Weekday::Monday, interval("09:00:00", "17:00:00"))
}

/// Wire form of a week with the given open days; every other day is closed.
pub fn raw_week(open_days: &[(Weekday, &str, &str)]) -> RawWeeklySchedule {
    Weekday::ALL
        .into_iter()
        .map(|day| {
            let hours = open_days
                .iter()
                .find(|(d, _, _)| *d == day)
                .map(|(_, open, close)| vec![open.to_string(), close.to_string()])
                .unwrap_or_default();
            (day.name().to_string(), hours)
        })
        .collect()
}

pub fn new_restaurant(name: &str, schedule: WeeklySchedule) -> NewRestaurant {
    NewRestaurant {
        name: name.to_string(),
        address: "1 Silom Rd".to_string(),
        district: "Bang Rak".to_string(),
        province: "Bangkok".to_string(),
        postal_code: "10500".to_string(),
        tel: Some("02-234-5678".to_string()),
        available_time: schedule,
    }
}

/// 2024-01-01 is a Monday.
pub fn monday_at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    use chrono::TimeZone;
    Utc.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap()
}

// ==================== Recording repository ====================

/// Local repository that records the name of every repository call.
#[derive(Clone, Default)]
pub struct RecordingRepository {
    pub inner: LocalRepository,
    calls: std::sync::Arc<parking_lot::Mutex<Vec<&'static str>>>,
}

impl RecordingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().push(name);
    }
}

#[async_trait]
impl RestaurantRepository for RecordingRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.record("health_check");
        self.inner.health_check().await
    }

    async fn create_restaurant(&self, restaurant: &NewRestaurant) -> RepositoryResult<Restaurant> {
        self.record("create_restaurant");
        self.inner.create_restaurant(restaurant).await
    }

    async fn find_restaurant(&self, id: RestaurantId) -> RepositoryResult<Option<Restaurant>> {
        self.record("find_restaurant");
        self.inner.find_restaurant(id).await
    }

    async fn list_restaurants(&self, page: PageRequest) -> RepositoryResult<Page<Restaurant>> {
        self.record("list_restaurants");
        self.inner.list_restaurants(page).await
    }

    async fn update_restaurant(
        &self,
        id: RestaurantId,
        update: &RestaurantUpdate,
    ) -> RepositoryResult<Option<Restaurant>> {
        self.record("update_restaurant");
        self.inner.update_restaurant(id, update).await
    }

    async fn delete_restaurant(&self, id: RestaurantId) -> RepositoryResult<bool> {
        self.record("delete_restaurant");
        self.inner.delete_restaurant(id).await
    }
}

#[async_trait]
impl ReservationRepository for RecordingRepository {
    async fn count_reservations_by_user(&self, user_id: UserId) -> RepositoryResult<usize> {
        self.record("count_reservations_by_user");
        self.inner.count_reservations_by_user(user_id).await
    }

    async fn insert_reservation(
        &self,
        reservation: &NewReservation,
    ) -> RepositoryResult<Reservation> {
        self.record("insert_reservation");
        self.inner.insert_reservation(reservation).await
    }

    async fn find_reservation(&self, id: ReservationId) -> RepositoryResult<Option<Reservation>> {
        self.record("find_reservation");
        self.inner.find_reservation(id).await
    }

    async fn list_reservations(
        &self,
        filter: ReservationFilter,
    ) -> RepositoryResult<Vec<Reservation>> {
        self.record("list_reservations");
        self.inner.list_reservations(filter).await
    }

    async fn update_reservation_date(
        &self,
        id: ReservationId,
        reserved_date: DateTime<Utc>,
    ) -> RepositoryResult<Option<Reservation>> {
        self.record("update_reservation_date");
        self.inner.update_reservation_date(id, reserved_date).await
    }

    async fn delete_reservation(&self, id: ReservationId) -> RepositoryResult<bool> {
        self.record("delete_reservation");
        self.inner.delete_reservation(id).await
    }
}
