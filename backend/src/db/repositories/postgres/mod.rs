//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry with exponential backoff for transient failures
//! - Embedded schema migrations, run once at construction
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;
use tokio::task;

use crate::api::{
    NewReservation, NewRestaurant, Page, PageRequest, Reservation, ReservationFilter,
    ReservationId, Restaurant, RestaurantId, RestaurantUpdate, UserId, WeeklySchedule,
};
use crate::db::repository::{
    ErrorContext, RepositoryError, RepositoryResult, ReservationRepository, RestaurantRepository,
};

mod models;
mod schema;

use models::*;
use schema::{reservations, restaurants};

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Create configuration from environment variables (see module docs).
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
            max_retries: env_or("PG_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("PG_RETRY_DELAY_MS", defaults.retry_delay_ms),
        })
    }
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        let mut conn = pool.get().map_err(|e| {
            RepositoryError::connection_with_context(
                e.to_string(),
                ErrorContext::new("get_connection_for_migrations"),
            )
        })?;
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;
        drop(conn);

        log::info!(
            "Postgres repository ready (pool max={}, min={})",
            config.max_pool_size,
            config.min_pool_size
        );

        Ok(Self { pool, config })
    }

    /// Run `f` on a pooled connection inside `spawn_blocking`, retrying
    /// retryable failures up to `max_retries` times with doubling delay.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);

        task::spawn_blocking(move || {
            let mut attempt = 0;
            loop {
                let result = pool
                    .get()
                    .map_err(|e| {
                        RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new(operation)
                                .with_details(format!("attempt={}", attempt + 1)),
                        )
                    })
                    .and_then(|mut conn| f.clone()(&mut conn));

                match result {
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        log::warn!("{} failed (attempt {}), retrying: {}", operation, attempt + 1, e);
                        std::thread::sleep(delay);
                        delay *= 2;
                        attempt += 1;
                    }
                    Err(e) => return Err(e.with_operation(operation)),
                    Ok(value) => return Ok(value),
                }
            }
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

fn schedule_to_json(schedule: &WeeklySchedule) -> RepositoryResult<Value> {
    serde_json::to_value(schedule).map_err(|e| {
        RepositoryError::internal_with_context(
            format!("Failed to encode schedule: {}", e),
            ErrorContext::new("encode_schedule").with_entity("restaurant"),
        )
    })
}

fn row_to_restaurant(row: RestaurantRow) -> RepositoryResult<Restaurant> {
    let id = row.id;
    let available_time: WeeklySchedule =
        serde_json::from_value(row.available_time).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Stored schedule is invalid: {}", e),
                ErrorContext::restaurant("decode_restaurant", id),
            )
        })?;

    Ok(Restaurant {
        id: RestaurantId::new(row.id),
        name: row.name,
        address: row.address,
        district: row.district,
        province: row.province,
        postal_code: row.postal_code,
        tel: row.tel,
        available_time,
        created_at: row.created_at,
    })
}

fn row_to_reservation(row: ReservationRow) -> Reservation {
    Reservation {
        id: ReservationId::new(row.id),
        user_id: UserId::new(row.user_id),
        restaurant_id: RestaurantId::new(row.restaurant_id),
        reserved_date: row.reserved_date,
        created_at: row.created_at,
    }
}

fn to_usize(value: i64, operation: &str) -> RepositoryResult<usize> {
    usize::try_from(value).map_err(|_| {
        RepositoryError::internal_with_context(
            format!("Negative count {}", value),
            ErrorContext::new(operation),
        )
    })
}

// ==================== Restaurant Repository ====================

#[async_trait]
impl RestaurantRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn("health_check", |conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn create_restaurant(&self, restaurant: &NewRestaurant) -> RepositoryResult<Restaurant> {
        let row = NewRestaurantRow {
            name: restaurant.name.clone(),
            address: restaurant.address.clone(),
            district: restaurant.district.clone(),
            province: restaurant.province.clone(),
            postal_code: restaurant.postal_code.clone(),
            tel: restaurant.tel.clone(),
            available_time: schedule_to_json(&restaurant.available_time)?,
        };

        self.with_conn("create_restaurant", move |conn| {
            let inserted = diesel::insert_into(restaurants::table)
                .values(&row)
                .returning(RestaurantRow::as_returning())
                .get_result(conn)
                .map_err(map_diesel_error)?;
            row_to_restaurant(inserted)
        })
        .await
    }

    async fn find_restaurant(&self, id: RestaurantId) -> RepositoryResult<Option<Restaurant>> {
        self.with_conn("find_restaurant", move |conn| {
            restaurants::table
                .find(id.value())
                .select(RestaurantRow::as_select())
                .first(conn)
                .optional()
                .map_err(map_diesel_error)?
                .map(row_to_restaurant)
                .transpose()
        })
        .await
    }

    async fn list_restaurants(&self, page: PageRequest) -> RepositoryResult<Page<Restaurant>> {
        self.with_conn("list_restaurants", move |conn| {
            let total: i64 = restaurants::table
                .count()
                .get_result(conn)
                .map_err(map_diesel_error)?;

            let rows = restaurants::table
                .select(RestaurantRow::as_select())
                .order((restaurants::created_at.desc(), restaurants::id.desc()))
                .limit(i64::from(page.limit))
                .offset(page.offset() as i64)
                .load::<RestaurantRow>(conn)
                .map_err(map_diesel_error)?;

            Ok(Page {
                items: rows
                    .into_iter()
                    .map(row_to_restaurant)
                    .collect::<RepositoryResult<Vec<_>>>()?,
                total: to_usize(total, "list_restaurants")?,
            })
        })
        .await
    }

    async fn update_restaurant(
        &self,
        id: RestaurantId,
        update: &RestaurantUpdate,
    ) -> RepositoryResult<Option<Restaurant>> {
        if update.is_empty() {
            return self.find_restaurant(id).await;
        }

        let changeset = RestaurantChangeset {
            name: update.name.clone(),
            address: update.address.clone(),
            district: update.district.clone(),
            province: update.province.clone(),
            postal_code: update.postal_code.clone(),
            tel: update.tel.clone(),
            available_time: update
                .available_time
                .as_ref()
                .map(schedule_to_json)
                .transpose()?,
        };

        self.with_conn("update_restaurant", move |conn| {
            diesel::update(restaurants::table.find(id.value()))
                .set(&changeset)
                .returning(RestaurantRow::as_returning())
                .get_result(conn)
                .optional()
                .map_err(map_diesel_error)?
                .map(row_to_restaurant)
                .transpose()
        })
        .await
    }

    async fn delete_restaurant(&self, id: RestaurantId) -> RepositoryResult<bool> {
        // Reservations go with it through ON DELETE CASCADE.
        self.with_conn("delete_restaurant", move |conn| {
            diesel::delete(restaurants::table.find(id.value()))
                .execute(conn)
                .map(|n| n > 0)
                .map_err(map_diesel_error)
        })
        .await
    }
}

// ==================== Reservation Repository ====================

#[async_trait]
impl ReservationRepository for PostgresRepository {
    async fn count_reservations_by_user(&self, user_id: UserId) -> RepositoryResult<usize> {
        self.with_conn("count_reservations_by_user", move |conn| {
            let count: i64 = reservations::table
                .filter(reservations::user_id.eq(user_id.value()))
                .count()
                .get_result(conn)
                .map_err(map_diesel_error)?;
            to_usize(count, "count_reservations_by_user")
        })
        .await
    }

    async fn insert_reservation(
        &self,
        reservation: &NewReservation,
    ) -> RepositoryResult<Reservation> {
        let row = NewReservationRow {
            user_id: reservation.user_id.value(),
            restaurant_id: reservation.restaurant_id.value(),
            reserved_date: reservation.reserved_date,
        };

        self.with_conn("insert_reservation", move |conn| {
            diesel::insert_into(reservations::table)
                .values(&row)
                .returning(ReservationRow::as_returning())
                .get_result(conn)
                .map(row_to_reservation)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn find_reservation(&self, id: ReservationId) -> RepositoryResult<Option<Reservation>> {
        self.with_conn("find_reservation", move |conn| {
            reservations::table
                .find(id.value())
                .select(ReservationRow::as_select())
                .first(conn)
                .optional()
                .map(|row| row.map(row_to_reservation))
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn list_reservations(
        &self,
        filter: ReservationFilter,
    ) -> RepositoryResult<Vec<Reservation>> {
        self.with_conn("list_reservations", move |conn| {
            let mut query = reservations::table.into_boxed();
            if let Some(user_id) = filter.user_id {
                query = query.filter(reservations::user_id.eq(user_id.value()));
            }
            if let Some(restaurant_id) = filter.restaurant_id {
                query = query.filter(reservations::restaurant_id.eq(restaurant_id.value()));
            }

            query
                .select(ReservationRow::as_select())
                .order(reservations::id.asc())
                .load::<ReservationRow>(conn)
                .map(|rows| rows.into_iter().map(row_to_reservation).collect())
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn update_reservation_date(
        &self,
        id: ReservationId,
        reserved_date: DateTime<Utc>,
    ) -> RepositoryResult<Option<Reservation>> {
        self.with_conn("update_reservation_date", move |conn| {
            diesel::update(reservations::table.find(id.value()))
                .set(reservations::reserved_date.eq(reserved_date))
                .returning(ReservationRow::as_returning())
                .get_result(conn)
                .optional()
                .map(|row| row.map(row_to_reservation))
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn delete_reservation(&self, id: ReservationId) -> RepositoryResult<bool> {
        self.with_conn("delete_reservation", move |conn| {
            diesel::delete(reservations::table.find(id.value()))
                .execute(conn)
                .map(|n| n > 0)
                .map_err(map_diesel_error)
        })
        .await
    }
}
