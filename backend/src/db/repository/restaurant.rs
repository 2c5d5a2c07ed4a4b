//! Restaurant repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{NewRestaurant, Page, PageRequest, Restaurant, RestaurantId, RestaurantUpdate};

/// Repository trait for restaurant records.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Check if the database connection is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Store a new restaurant and return it with its assigned id and creation time.
    ///
    /// # Returns
    /// * `Err(RepositoryError::ConflictError)` - If the name is already taken
    async fn create_restaurant(&self, restaurant: &NewRestaurant) -> RepositoryResult<Restaurant>;

    /// Look up a restaurant by id. `Ok(None)` when it does not exist.
    async fn find_restaurant(&self, id: RestaurantId) -> RepositoryResult<Option<Restaurant>>;

    /// One page of restaurants, newest first, plus the total count.
    async fn list_restaurants(&self, page: PageRequest) -> RepositoryResult<Page<Restaurant>>;

    /// Apply a partial update. `Ok(None)` when the restaurant does not exist.
    ///
    /// # Returns
    /// * `Err(RepositoryError::ConflictError)` - If a rename collides with another restaurant
    async fn update_restaurant(
        &self,
        id: RestaurantId,
        update: &RestaurantUpdate,
    ) -> RepositoryResult<Option<Restaurant>>;

    /// Delete a restaurant together with all of its reservations.
    ///
    /// # Returns
    /// * `Ok(true)` if the restaurant existed and was removed
    /// * `Ok(false)` if there was nothing to delete
    async fn delete_restaurant(&self, id: RestaurantId) -> RepositoryResult<bool>;
}
