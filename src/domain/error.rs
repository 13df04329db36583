//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::Kind;

/// Domain errors represent rule violations.
/// Allocation operations never fail; only rule construction does.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{kind} cost table is empty")]
    EmptyCostTable { kind: Kind },

    #[error("{kind} cost table must start with 0, found {first}")]
    NonZeroBaseCost { kind: Kind, first: u32 },

    #[error("cost tables must cover the same levels: stat has {stat}, perk has {perk} entries")]
    MismatchedCostTables { stat: usize, perk: usize },

    #[error("cost tables need at least one purchasable level")]
    NoPurchasableLevels,

    #[error("max character level must be at least 1")]
    InvalidCharacterLevel,

    #[error("invalid stat name: {0:?}")]
    InvalidStatName(String),

    #[error("stat name {0:?} reads as an entry reference (sN/pN)")]
    ReservedStatName(String),

    #[error("duplicate stat name: {0}")]
    DuplicateStatName(String),
}
