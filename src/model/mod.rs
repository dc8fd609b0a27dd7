//! Types that represent the core data model: `Boat`, `Fleet` and the `Amount` money type.
mod amount;
mod boat;
mod fleet;

pub use amount::{Amount, AmountError};
pub use boat::{Boat, BoatType};
pub use fleet::{Expense, Fleet, Removal};
