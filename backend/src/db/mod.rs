//! Persistence for restaurants and reservations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP layer (http/) - routing, identity, envelopes      │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service layer (services/) - availability, quota,       │
//! │  reservation flow, restaurant validation                │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository traits (repository/)                        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴───────────────┐
//!     │                               │
//! ┌───▼──────────────┐   ┌────────────▼─────────┐
//! │ LocalRepository  │   │ PostgresRepository   │
//! │ (in-memory)      │   │ (diesel + r2d2)      │
//! └──────────────────┘   └──────────────────────┘
//! ```
//!
//! - `repository`: Trait definitions and [`RepositoryError`]
//! - `repositories::local`: In-memory implementation for tests and local development
//! - `repositories::postgres`: Postgres implementation (feature `postgres-repo`)
//! - `factory`: Builds an `Arc<dyn FullRepository>` from env or `repository.toml`

// At least one backend must be compiled in; the factory picks between them at runtime.
#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;

// Postgres config is colocated with the repository implementation.
#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::PostgresConfig;
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    _private: (),
}

pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    ErrorContext, FullRepository, RepositoryError, RepositoryResult, ReservationRepository,
    RestaurantRepository,
};

use std::sync::Arc;

/// Build the repository selected by the environment.
///
/// A `repository.toml` in a standard location wins; otherwise `REPOSITORY_TYPE`
/// and `DATABASE_URL` decide (see [`RepositoryType::from_env`]).
pub async fn create_repository() -> RepositoryResult<Arc<dyn FullRepository>> {
    match RepositoryConfig::default_path() {
        Some(path) => {
            log::info!("Loading repository configuration from {}", path.display());
            RepositoryFactory::from_config_file(path).await
        }
        None => RepositoryFactory::from_env().await,
    }
}
