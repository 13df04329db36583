//! Point-allocation calculator
//!
//! Spend a pool of experience points on a fixed list of stats and a
//! growable list of perks. Each level has an incremental cost taken from a
//! per-kind table; the engine keeps every entry in range and refuses any
//! purchase the remaining points cannot cover.
//!
//! Layers:
//! - [`domain`]: cost model, entries, store, ledger, level/XP sync
//! - [`application`]: the calculator service and its intents
//! - [`config`]: layered settings
//! - [`cli`]: terminal presentation layer

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use application::services::{CalculatorService, CalculatorView};
pub use application::Intent;
pub use domain::{EntryId, Kind, Rules};
