//! Domain layer: cost model, entries, store, ledger and XP sync
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod input;
pub mod ledger;
pub mod rules;
pub mod store;
pub mod sync;

pub use entities::*;
pub use error::DomainError;
pub use ledger::{available_points, Ledger};
pub use rules::{CostTable, Rules};
pub use store::AllocationStore;
pub use sync::XpSync;
