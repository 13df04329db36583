//! Cost model and calculator rules
//!
//! A cost table is indexed by level: `table[n]` is the incremental cost of
//! going from level `n - 1` to level `n`. `table[0]` is always `0`.

use std::collections::HashSet;

use crate::domain::{fold_name, positional_ref, DomainError, Kind};

pub const DEFAULT_STAT_COSTS: [u32; 7] = [0, 0, 3, 6, 9, 12, 15];
pub const DEFAULT_PERK_COSTS: [u32; 7] = [0, 1, 2, 4, 6, 8, 10];
pub const DEFAULT_LEVEL_BASE_XP: u32 = 30;
pub const DEFAULT_XP_PER_LEVEL: u32 = 6;
pub const DEFAULT_XP_CEILING: u32 = 9999;
pub const DEFAULT_MAX_CHARACTER_LEVEL: u32 = 99;
pub const DEFAULT_STAT_NAMES: [&str; 7] = [
    "Strength",
    "Perception",
    "Endurance",
    "Charisma",
    "Intelligence",
    "Agility",
    "Luck",
];

/// Per-kind incremental cost table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostTable(Vec<u32>);

impl CostTable {
    pub fn new(kind: Kind, costs: Vec<u32>) -> Result<Self, DomainError> {
        match costs.first() {
            None => Err(DomainError::EmptyCostTable { kind }),
            Some(&first) if first != 0 => Err(DomainError::NonZeroBaseCost { kind, first }),
            Some(_) => Ok(Self(costs)),
        }
    }

    /// Highest level the table prices.
    pub fn max_level(&self) -> u32 {
        (self.0.len() - 1) as u32
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// Cost of reaching `level` from `level - 1`.
    ///
    /// Levels past the end of the table reuse the last entry; callers keep
    /// levels bounded by `max_level`, so that branch is only a clamp.
    pub fn incremental(&self, level: u32) -> u32 {
        if level == 0 {
            return 0;
        }
        match self.0.get(level as usize) {
            Some(&cost) => cost,
            None => self.0.last().copied().unwrap_or(0),
        }
    }

    /// Sum of incremental costs for levels `base + 1 ..= current`.
    pub fn cumulative(&self, base: u32, current: u32) -> u64 {
        if current <= base {
            return 0;
        }
        (base + 1..=current)
            .map(|level| u64::from(self.incremental(level)))
            .sum()
    }
}

/// Everything the engine needs to price allocations and derive the budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    stat_costs: CostTable,
    perk_costs: CostTable,
    level_base_xp: u32,
    xp_per_level: u32,
    xp_ceiling: u32,
    max_character_level: u32,
    stat_names: Vec<String>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            stat_costs: CostTable(DEFAULT_STAT_COSTS.to_vec()),
            perk_costs: CostTable(DEFAULT_PERK_COSTS.to_vec()),
            level_base_xp: DEFAULT_LEVEL_BASE_XP,
            xp_per_level: DEFAULT_XP_PER_LEVEL,
            xp_ceiling: DEFAULT_XP_CEILING,
            max_character_level: DEFAULT_MAX_CHARACTER_LEVEL,
            stat_names: DEFAULT_STAT_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Rules {
    /// Build validated rules.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        stat_costs: Vec<u32>,
        perk_costs: Vec<u32>,
        level_base_xp: u32,
        xp_per_level: u32,
        xp_ceiling: u32,
        max_character_level: u32,
        stat_names: Vec<String>,
    ) -> Result<Self, DomainError> {
        let stat_costs = CostTable::new(Kind::Stat, stat_costs)?;
        let perk_costs = CostTable::new(Kind::Perk, perk_costs)?;
        if stat_costs.0.len() != perk_costs.0.len() {
            return Err(DomainError::MismatchedCostTables {
                stat: stat_costs.0.len(),
                perk: perk_costs.0.len(),
            });
        }
        if stat_costs.max_level() < 1 {
            return Err(DomainError::NoPurchasableLevels);
        }
        if max_character_level < 1 {
            return Err(DomainError::InvalidCharacterLevel);
        }
        validate_stat_names(&stat_names)?;

        Ok(Self {
            stat_costs,
            perk_costs,
            level_base_xp,
            xp_per_level,
            xp_ceiling,
            max_character_level,
            stat_names,
        })
    }

    pub fn costs(&self, kind: Kind) -> &CostTable {
        match kind {
            Kind::Stat => &self.stat_costs,
            Kind::Perk => &self.perk_costs,
        }
    }

    /// Highest level any entry may reach.
    pub fn max_level(&self) -> u32 {
        self.stat_costs.max_level()
    }

    pub fn level_base_xp(&self) -> u32 {
        self.level_base_xp
    }

    pub fn xp_per_level(&self) -> u32 {
        self.xp_per_level
    }

    /// Upper bound of the XP pool.
    pub fn xp_ceiling(&self) -> u32 {
        self.xp_ceiling
    }

    /// Upper bound of the character level; at least 1.
    pub fn max_character_level(&self) -> u32 {
        self.max_character_level
    }

    /// Stat names in display order.
    pub fn stat_names(&self) -> &[String] {
        &self.stat_names
    }

    pub fn incremental_cost(&self, kind: Kind, level: u32) -> u32 {
        self.costs(kind).incremental(level)
    }

    pub fn cumulative_cost(&self, kind: Kind, base: u32, current: u32) -> u64 {
        self.costs(kind).cumulative(base, current)
    }

    /// Points granted by a character level.
    pub fn xp_for_level(&self, level: u32) -> u32 {
        let xp = u64::from(self.level_base_xp) + u64::from(level) * u64::from(self.xp_per_level);
        xp.min(u64::from(self.xp_ceiling)) as u32
    }
}

/// Names must be resolvable by the text front end: one word, not shaped
/// like a positional reference, unique under case folding.
fn validate_stat_names(names: &[String]) -> Result<(), DomainError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(DomainError::InvalidStatName(name.clone()));
        }
        if positional_ref(name).is_some() {
            return Err(DomainError::ReservedStatName(name.clone()));
        }
        if !seen.insert(fold_name(name)) {
            return Err(DomainError::DuplicateStatName(name.clone()));
        }
    }
    Ok(())
}
