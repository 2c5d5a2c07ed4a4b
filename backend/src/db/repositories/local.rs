//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in memory
//! using `BTreeMap`s, providing fast, deterministic, and isolated execution.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::*;
use crate::db::repository::*;

/// In-memory local repository.
///
/// Cloning shares the underlying storage, so a clone handed to the HTTP layer and
/// one kept by a test observe the same data.
///
/// # Example
/// ```
/// use dinebook::db::repositories::LocalRepository;
/// use dinebook::db::repository::ReservationRepository;
/// use dinebook::api::UserId;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let repo = LocalRepository::new();
/// assert_eq!(repo.count_reservations_by_user(UserId::new(1)).await.unwrap(), 0);
/// # });
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    restaurants: BTreeMap<RestaurantId, Restaurant>,
    reservations: BTreeMap<ReservationId, Reservation>,

    // ID counters
    next_restaurant_id: i64,
    next_reservation_id: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            restaurants: BTreeMap::new(),
            reservations: BTreeMap::new(),
            next_restaurant_id: 1,
            next_reservation_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalData {
    fn name_taken(&self, name: &str, except: Option<RestaurantId>) -> bool {
        self.restaurants
            .values()
            .any(|r| r.name == name && Some(r.id) != except)
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Get the number of restaurants stored.
    pub fn restaurant_count(&self) -> usize {
        self.data.read().restaurants.len()
    }

    /// Get the number of reservations stored.
    pub fn reservation_count(&self) -> usize {
        self.data.read().reservations.len()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Database is not healthy",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

// ==================== Restaurant Repository ====================

#[async_trait]
impl RestaurantRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn create_restaurant(&self, restaurant: &NewRestaurant) -> RepositoryResult<Restaurant> {
        self.check_health("create_restaurant")?;

        let mut data = self.data.write();
        if data.name_taken(&restaurant.name, None) {
            return Err(RepositoryError::duplicate_restaurant_name(
                &restaurant.name,
                "create_restaurant",
            ));
        }

        let id = RestaurantId::new(data.next_restaurant_id);
        data.next_restaurant_id += 1;

        let stored = restaurant.clone().into_restaurant(id, Utc::now());
        data.restaurants.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_restaurant(&self, id: RestaurantId) -> RepositoryResult<Option<Restaurant>> {
        self.check_health("find_restaurant")?;
        Ok(self.data.read().restaurants.get(&id).cloned())
    }

    async fn list_restaurants(&self, page: PageRequest) -> RepositoryResult<Page<Restaurant>> {
        self.check_health("list_restaurants")?;

        let data = self.data.read();
        let mut all: Vec<&Restaurant> = data.restaurants.values().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let items = all
            .into_iter()
            .skip(page.offset())
            .take(page.limit as usize)
            .cloned()
            .collect();

        Ok(Page {
            items,
            total: data.restaurants.len(),
        })
    }

    async fn update_restaurant(
        &self,
        id: RestaurantId,
        update: &RestaurantUpdate,
    ) -> RepositoryResult<Option<Restaurant>> {
        self.check_health("update_restaurant")?;

        let mut data = self.data.write();
        if let Some(name) = &update.name {
            if data.name_taken(name, Some(id)) {
                return Err(RepositoryError::duplicate_restaurant_name(name, "update_restaurant"));
            }
        }

        Ok(data.restaurants.get_mut(&id).map(|restaurant| {
            update.apply_to(restaurant);
            restaurant.clone()
        }))
    }

    async fn delete_restaurant(&self, id: RestaurantId) -> RepositoryResult<bool> {
        self.check_health("delete_restaurant")?;

        let mut data = self.data.write();
        if data.restaurants.remove(&id).is_none() {
            return Ok(false);
        }
        data.reservations.retain(|_, r| r.restaurant_id != id);
        Ok(true)
    }
}

// ==================== Reservation Repository ====================

#[async_trait]
impl ReservationRepository for LocalRepository {
    async fn count_reservations_by_user(&self, user_id: UserId) -> RepositoryResult<usize> {
        self.check_health("count_reservations_by_user")?;

        Ok(self
            .data
            .read()
            .reservations
            .values()
            .filter(|r| r.user_id == user_id)
            .count())
    }

    async fn insert_reservation(
        &self,
        reservation: &NewReservation,
    ) -> RepositoryResult<Reservation> {
        self.check_health("insert_reservation")?;

        let mut data = self.data.write();
        if !data.restaurants.contains_key(&reservation.restaurant_id) {
            return Err(RepositoryError::unknown_restaurant(
                reservation.restaurant_id,
                "insert_reservation",
            ));
        }

        let id = ReservationId::new(data.next_reservation_id);
        data.next_reservation_id += 1;

        let stored = reservation.clone().into_reservation(id, Utc::now());
        data.reservations.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_reservation(&self, id: ReservationId) -> RepositoryResult<Option<Reservation>> {
        self.check_health("find_reservation")?;
        Ok(self.data.read().reservations.get(&id).cloned())
    }

    async fn list_reservations(
        &self,
        filter: ReservationFilter,
    ) -> RepositoryResult<Vec<Reservation>> {
        self.check_health("list_reservations")?;

        Ok(self
            .data
            .read()
            .reservations
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn update_reservation_date(
        &self,
        id: ReservationId,
        reserved_date: DateTime<Utc>,
    ) -> RepositoryResult<Option<Reservation>> {
        self.check_health("update_reservation_date")?;

        Ok(self.data.write().reservations.get_mut(&id).map(|r| {
            r.reserved_date = reserved_date;
            r.clone()
        }))
    }

    async fn delete_reservation(&self, id: ReservationId) -> RepositoryResult<bool> {
        self.check_health("delete_reservation")?;
        Ok(self.data.write().reservations.remove(&id).is_some())
    }
}
