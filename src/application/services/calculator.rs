//! Calculator service
//!
//! Owns the allocation store and the XP synchroniser and handles every
//! inbound intent. The ledger is never cached: each affordability check and
//! each view recomputes it from the live entries.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::application::Intent;
use crate::domain::{
    AllocationStore, Entry, EntryId, Kind, Ledger, PerkType, Rules, XpSync,
};

/// Per-entry state the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryView {
    #[serde(skip)]
    pub id: EntryId,
    /// Positional reference: `s1..sN` for stats, `p1..pN` for perks.
    pub label: String,
    pub kind: Kind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perk_type: Option<PerkType>,
    pub base: u32,
    pub current: u32,
    pub cost: u64,
    pub can_increment: bool,
    pub can_decrement: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerView {
    pub available: u32,
    pub spent_stats: u64,
    pub spent_perks: u64,
    pub remaining: i64,
    pub remaining_is_negative: bool,
}

impl From<Ledger> for LedgerView {
    fn from(ledger: Ledger) -> Self {
        Self {
            available: ledger.available,
            spent_stats: ledger.spent_stats,
            spent_perks: ledger.spent_perks,
            remaining: ledger.remaining,
            remaining_is_negative: ledger.is_overspent(),
        }
    }
}

/// Complete outbound view, recomputed on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculatorView {
    pub sync: XpSync,
    pub ledger: LedgerView,
    pub entries: Vec<EntryView>,
}

impl CalculatorView {
    pub fn entry(&self, id: EntryId) -> Option<&EntryView> {
        self.entries.iter().find(|e| e.id == id)
    }
}

/// Service for allocating points across stats and perks.
#[derive(Debug, Clone)]
pub struct CalculatorService {
    rules: Arc<Rules>,
    store: AllocationStore,
    sync: XpSync,
}

impl CalculatorService {
    /// Create a session with every stat at its minimum and no perks.
    pub fn new(rules: Rules) -> Self {
        let rules = Arc::new(rules);
        let store = AllocationStore::new(rules.stat_names(), rules.max_level());
        let sync = XpSync::new(&rules);
        Self { rules, store, sync }
    }

    /// Seed `count` empty perks.
    pub fn with_initial_perks(mut self, count: u32) -> Self {
        for _ in 0..count {
            self.store.add_perk("");
        }
        self
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn store(&self) -> &AllocationStore {
        &self.store
    }

    pub fn sync_state(&self) -> XpSync {
        self.sync
    }

    pub fn available(&self) -> u32 {
        self.sync.available(&self.rules)
    }

    pub fn ledger(&self) -> Ledger {
        Ledger::recompute(self.store.entries(), self.available(), &self.rules)
    }

    pub fn can_decrement(&self, id: EntryId) -> bool {
        self.store
            .get(id)
            .is_some_and(|entry| entry.current() > entry.base())
    }

    pub fn can_increment(&self, id: EntryId) -> bool {
        self.store
            .get(id)
            .is_some_and(|entry| self.ledger().can_increment(entry, &self.rules))
    }

    /// Buy one level if it is in range and affordable; otherwise no-op.
    pub fn increment(&mut self, id: EntryId) -> bool {
        let Some(entry) = self.store.get(id) else {
            return false;
        };
        if !self.ledger().can_increment(entry, &self.rules) {
            return false;
        }
        let next = i64::from(entry.current()) + 1;
        self.store.set_current_direct(id, next)
    }

    /// Refund one level unless already at base.
    pub fn decrement(&mut self, id: EntryId) -> bool {
        if !self.can_decrement(id) {
            return false;
        }
        let Some(entry) = self.store.get(id) else {
            return false;
        };
        let previous = i64::from(entry.current()) - 1;
        self.store.set_current_direct(id, previous)
    }

    pub fn set_base(&mut self, id: EntryId, raw: &str) -> bool {
        self.store.set_base(id, raw)
    }

    pub fn add_perk(&mut self, name: impl Into<String>) -> EntryId {
        self.store.add_perk(name).id
    }

    pub fn remove_perk(&mut self, id: EntryId) -> bool {
        self.store.remove_perk(id)
    }

    pub fn rename_perk(&mut self, id: EntryId, name: &str) -> bool {
        self.store.rename_perk(id, name)
    }

    pub fn set_perk_type(&mut self, id: EntryId, perk_type: PerkType) -> bool {
        self.store.set_perk_type(id, perk_type)
    }

    pub fn set_level(&mut self, raw: &str) -> bool {
        self.sync.set_level(raw, &self.rules)
    }

    /// Manual XP entry; ignored while sync is on.
    pub fn set_xp(&mut self, raw: &str) -> bool {
        self.sync.set_xp(raw, &self.rules)
    }

    pub fn toggle_sync(&mut self, enabled: bool) -> bool {
        self.sync.toggle(enabled, &self.rules)
    }

    /// Back to level 1 with sync on and every entry at its kind's minimum.
    /// Perks stay in the list.
    pub fn reset_all(&mut self) {
        self.sync = XpSync::new(&self.rules);
        self.store.reset_values();
    }

    /// Refund every spent point, keeping bases and perks.
    pub fn reset_allocated(&mut self) -> bool {
        self.store.reset_allocated()
    }

    /// Dispatch an intent. Returns whether state changed.
    pub fn apply(&mut self, intent: &Intent) -> bool {
        let changed = match intent {
            Intent::Increment(id) => self.increment(*id),
            Intent::Decrement(id) => self.decrement(*id),
            Intent::SetBase(id, raw) => self.set_base(*id, raw),
            Intent::AddPerk { name } => {
                self.add_perk(name.as_str());
                true
            }
            Intent::RemovePerk(id) => self.remove_perk(*id),
            Intent::RenamePerk(id, name) => self.rename_perk(*id, name),
            Intent::SetPerkType(id, perk_type) => self.set_perk_type(*id, *perk_type),
            Intent::SetLevel(raw) => self.set_level(raw),
            Intent::SetXp(raw) => self.set_xp(raw),
            Intent::ToggleSync(enabled) => self.toggle_sync(*enabled),
            Intent::ResetAll => {
                self.reset_all();
                true
            }
            Intent::ResetAllocated => self.reset_allocated(),
        };
        debug!("apply: {} {:?}, changed={}", intent.name(), intent, changed);
        changed
    }

    pub fn view(&self) -> CalculatorView {
        let ledger = self.ledger();
        let stats = self
            .store
            .stats()
            .iter()
            .enumerate()
            .map(|(i, entry)| self.entry_view(entry, format!("s{}", i + 1), &ledger));
        let perks = self
            .store
            .perks()
            .iter()
            .enumerate()
            .map(|(i, entry)| self.entry_view(entry, format!("p{}", i + 1), &ledger));
        let entries = stats.chain(perks).collect();

        CalculatorView {
            sync: self.sync,
            ledger: ledger.into(),
            entries,
        }
    }

    fn entry_view(&self, entry: &Entry, label: String, ledger: &Ledger) -> EntryView {
        EntryView {
            id: entry.id,
            label,
            kind: entry.kind(),
            name: entry.name.clone(),
            perk_type: entry.perk_type,
            base: entry.base(),
            current: entry.current(),
            cost: self
                .rules
                .cumulative_cost(entry.kind(), entry.base(), entry.current()),
            can_increment: ledger.can_increment(entry, &self.rules),
            can_decrement: entry.current() > entry.base(),
        }
    }
}

impl Default for CalculatorService {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}
