//! Domain entities: allocation entries and their identities

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which cost table an entry is charged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Stat,
    Perk,
}

impl Kind {
    /// Lowest base level an entry of this kind may have.
    pub fn min_base(self) -> u32 {
        match self {
            Kind::Stat => 1,
            Kind::Perk => 0,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Stat => f.write_str("stat"),
            Kind::Perk => f.write_str("perk"),
        }
    }
}

/// Display category of a perk. Has no effect on cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerkType {
    #[default]
    Trait,
    Ability,
}

impl fmt::Display for PerkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerkType::Trait => f.write_str("trait"),
            PerkType::Ability => f.write_str("ability"),
        }
    }
}

impl FromStr for PerkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trait" | "t" => Ok(PerkType::Trait),
            "ability" | "a" => Ok(PerkType::Ability),
            other => Err(format!("unknown perk type: {other}")),
        }
    }
}

/// Stable handle of a perk entry.
///
/// Handles are assigned in creation order and never reused, so removing one
/// perk does not change the identity of the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PerkId(pub u32);

/// Identity of an entry in the allocation store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryId {
    /// Position in the fixed stat list.
    Stat(usize),
    Perk(PerkId),
}

impl EntryId {
    pub fn kind(self) -> Kind {
        match self {
            EntryId::Stat(_) => Kind::Stat,
            EntryId::Perk(_) => Kind::Perk,
        }
    }
}

/// Split a positional reference (`s3`, `P1`) into its kind and 1-based
/// number. Anything else, including stat names, yields `None`.
pub fn positional_ref(reference: &str) -> Option<(Kind, usize)> {
    let mut chars = reference.chars();
    let kind = match chars.next()?.to_ascii_lowercase() {
        's' => Kind::Stat,
        'p' => Kind::Perk,
        _ => return None,
    };
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // all digits but too large still reads as a reference
    Some((kind, digits.parse().unwrap_or(usize::MAX)))
}

/// Case folding used for stat name comparisons.
pub fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

/// A single attribute's allocation record.
///
/// Invariant: `kind.min_base() <= base <= current <= max_level`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: EntryId,
    pub name: String,
    /// Only set for perks.
    pub perk_type: Option<PerkType>,
    pub(crate) base: u32,
    pub(crate) current: u32,
}

impl Entry {
    pub(crate) fn stat(index: usize, name: impl Into<String>) -> Self {
        let base = Kind::Stat.min_base();
        Self {
            id: EntryId::Stat(index),
            name: name.into(),
            perk_type: None,
            base,
            current: base,
        }
    }

    pub(crate) fn perk(id: PerkId, name: impl Into<String>) -> Self {
        let base = Kind::Perk.min_base();
        Self {
            id: EntryId::Perk(id),
            name: name.into(),
            perk_type: Some(PerkType::default()),
            base,
            current: base,
        }
    }

    pub fn kind(&self) -> Kind {
        self.id.kind()
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    /// Levels bought on top of the base.
    pub fn allocated(&self) -> u32 {
        self.current - self.base
    }
}
