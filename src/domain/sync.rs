//! Level to XP synchroniser
//!
//! While sync is on the XP field mirrors the level formula and manual XP
//! edits are ignored. While it is off, the XP field is the source of truth
//! and the level is only remembered.

use serde::Serialize;

use crate::domain::input::clamp_raw;
use crate::domain::ledger::available_points;
use crate::domain::Rules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct XpSync {
    pub level: u32,
    /// Value of the XP field, manual or derived.
    pub xp: u32,
    pub sync_enabled: bool,
}

impl XpSync {
    pub fn new(rules: &Rules) -> Self {
        Self {
            level: 1,
            xp: rules.xp_for_level(1),
            sync_enabled: true,
        }
    }

    pub fn available(&self, rules: &Rules) -> u32 {
        if self.sync_enabled {
            rules.xp_for_level(self.level)
        } else {
            self.xp
        }
    }

    pub fn set_level(&mut self, raw: &str, rules: &Rules) -> bool {
        let before = *self;
        self.level = clamp_raw(raw, 1, rules.max_character_level());
        self.refresh(rules);
        before != *self
    }

    /// Set the XP field. Ignored while sync is enabled.
    pub fn set_xp(&mut self, raw: &str, rules: &Rules) -> bool {
        if self.sync_enabled {
            return false;
        }
        let xp = available_points(raw, rules.xp_ceiling());
        let changed = xp != self.xp;
        self.xp = xp;
        changed
    }

    pub fn toggle(&mut self, enabled: bool, rules: &Rules) -> bool {
        let before = *self;
        self.sync_enabled = enabled;
        self.refresh(rules);
        before != *self
    }

    fn refresh(&mut self, rules: &Rules) {
        if self.sync_enabled {
            self.xp = rules.xp_for_level(self.level);
        }
    }
}
