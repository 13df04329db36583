//! Application layer: the calculator service and its intents
//!
//! This layer drives the domain model and owns the session state.

pub mod error;
pub mod intent;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use intent::Intent;
