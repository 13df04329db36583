//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.

mod calculator;

pub use calculator::{CalculatorService, CalculatorView, EntryView, LedgerView};
