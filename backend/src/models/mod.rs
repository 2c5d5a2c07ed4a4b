//! Domain models.

pub mod identity;
pub mod macros;
pub mod pagination;
pub mod reservation;
pub mod restaurant;
pub mod schedule;
pub mod weekday;

pub use identity::*;
pub use pagination::*;
pub use reservation::*;
pub use restaurant::*;
pub use schedule::*;
pub use weekday::*;
