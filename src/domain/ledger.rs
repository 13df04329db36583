//! Budget ledger: spent points per kind and what is left over

use serde::Serialize;
use tracing::trace;

use crate::domain::input::clamp_raw;
use crate::domain::{Entry, Kind, Rules};

/// Totals derived from the live entries. Never stored, always recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ledger {
    pub available: u32,
    pub spent_stats: u64,
    pub spent_perks: u64,
    pub remaining: i64,
}

impl Ledger {
    /// Sum every entry's cumulative cost by kind and subtract from `available`.
    pub fn recompute<'a>(
        entries: impl IntoIterator<Item = &'a Entry>,
        available: u32,
        rules: &Rules,
    ) -> Self {
        let mut spent_stats = 0u64;
        let mut spent_perks = 0u64;
        for entry in entries {
            let cost = rules.cumulative_cost(entry.kind(), entry.base(), entry.current());
            match entry.kind() {
                Kind::Stat => spent_stats += cost,
                Kind::Perk => spent_perks += cost,
            }
        }
        let remaining = i64::from(available) - (spent_stats + spent_perks) as i64;
        trace!(
            "recompute: available={} stats={} perks={} remaining={}",
            available,
            spent_stats,
            spent_perks,
            remaining
        );
        Self {
            available,
            spent_stats,
            spent_perks,
            remaining,
        }
    }

    pub fn spent(&self, kind: Kind) -> u64 {
        match kind {
            Kind::Stat => self.spent_stats,
            Kind::Perk => self.spent_perks,
        }
    }

    pub fn total_spent(&self) -> u64 {
        self.spent_stats + self.spent_perks
    }

    /// Alert state: base edits pushed costs past the available points.
    pub fn is_overspent(&self) -> bool {
        self.remaining < 0
    }

    /// Whether the next level of an entry is affordable and in range.
    pub fn can_increment(&self, entry: &Entry, rules: &Rules) -> bool {
        entry.current() < rules.max_level()
            && self.remaining >= i64::from(rules.incremental_cost(entry.kind(), entry.current() + 1))
    }
}

/// Points in the pool from a raw XP field, clamped to `[0, ceiling]`.
pub fn available_points(raw: &str, ceiling: u32) -> u32 {
    clamp_raw(raw, 0, ceiling)
}
