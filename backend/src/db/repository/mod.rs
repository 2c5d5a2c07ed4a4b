//! Repository trait definitions for database operations.
//!
//! Persistence is split into two focused traits so that implementations and
//! test doubles can be written per concern.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`restaurant`]: Restaurant CRUD and listing
//! - [`reservation`]: Reservation counting, insertion and maintenance
//!
//! # Convenience Trait Bound
//!
//! For functions that need both capabilities, use the [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn book<R: FullRepository + ?Sized>(repo: &R, id: RestaurantId) -> RepositoryResult<()> {
//!     let restaurant = repo.find_restaurant(id).await?;
//!     let count = repo.count_reservations_by_user(user_id).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod reservation;
pub mod restaurant;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use reservation::ReservationRepository;
pub use restaurant::RestaurantRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements both repository traits.
pub trait FullRepository: RestaurantRepository + ReservationRepository {}

impl<T> FullRepository for T where T: RestaurantRepository + ReservationRepository {}
