//! Allocation store: the fixed stat entries plus the growable perk list

use tracing::debug;

use crate::domain::input::{clamp, clamp_raw};
use crate::domain::{fold_name, Entry, EntryId, Kind, PerkId, PerkType};

/// Ordered collection of entries, stats first then perks in insertion order.
#[derive(Debug, Clone)]
pub struct AllocationStore {
    stats: Vec<Entry>,
    perks: Vec<Entry>,
    next_perk_id: u32,
    max_level: u32,
}

impl AllocationStore {
    /// Create a store with one stat entry per name and no perks.
    pub fn new<I, S>(stat_names: I, max_level: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stats = stat_names
            .into_iter()
            .enumerate()
            .map(|(index, name)| Entry::stat(index, name))
            .collect();
        Self {
            stats,
            perks: Vec::new(),
            next_perk_id: 1,
            max_level,
        }
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    /// All entries: stats in fixed order, then perks in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.stats.iter().chain(self.perks.iter())
    }

    pub fn stats(&self) -> &[Entry] {
        &self.stats
    }

    pub fn perks(&self) -> &[Entry] {
        &self.perks
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        match id {
            EntryId::Stat(index) => self.stats.get(index),
            EntryId::Perk(perk) => self.perks.iter().find(|e| e.id == EntryId::Perk(perk)),
        }
    }

    fn get_mut(&mut self, id: EntryId) -> Option<&mut Entry> {
        match id {
            EntryId::Stat(index) => self.stats.get_mut(index),
            EntryId::Perk(perk) => self
                .perks
                .iter_mut()
                .find(|e| e.id == EntryId::Perk(perk)),
        }
    }

    /// Handle of the perk at a zero-based display position.
    pub fn perk_at(&self, position: usize) -> Option<EntryId> {
        self.perks.get(position).map(|e| e.id)
    }

    /// Index of the stat with the given name (case-insensitive).
    pub fn stat_named(&self, name: &str) -> Option<EntryId> {
        let wanted = fold_name(name);
        self.stats
            .iter()
            .find(|e| fold_name(&e.name) == wanted)
            .map(|e| e.id)
    }

    /// Append a new perk at base 0, current 0.
    pub fn add_perk(&mut self, name: impl Into<String>) -> &Entry {
        let id = PerkId(self.next_perk_id);
        self.next_perk_id += 1;
        self.perks.push(Entry::perk(id, name));
        debug!("add_perk: id={:?}, count={}", id, self.perks.len());
        &self.perks[self.perks.len() - 1]
    }

    /// Remove a perk. Unknown ids and stat ids are ignored.
    pub fn remove_perk(&mut self, id: EntryId) -> bool {
        let EntryId::Perk(_) = id else {
            return false;
        };
        let before = self.perks.len();
        self.perks.retain(|e| e.id != id);
        before != self.perks.len()
    }

    /// Set the base level from raw input, raising current to match if needed.
    ///
    /// Lowering the base leaves current untouched.
    pub fn set_base(&mut self, id: EntryId, raw: &str) -> bool {
        let max_level = self.max_level;
        let Some(entry) = self.get_mut(id) else {
            return false;
        };
        let base = clamp_raw(raw, entry.kind().min_base(), max_level);
        let changed = base != entry.base;
        entry.base = base;
        if entry.current < base {
            entry.current = base;
            return true;
        }
        changed
    }

    /// Overwrite current, clamped to `[0, max_level]` and never below base.
    pub(crate) fn set_current_direct(&mut self, id: EntryId, value: i64) -> bool {
        let max_level = self.max_level;
        let Some(entry) = self.get_mut(id) else {
            return false;
        };
        let current = clamp(value, 0, max_level).max(entry.base);
        let changed = current != entry.current;
        entry.current = current;
        changed
    }

    pub fn rename_perk(&mut self, id: EntryId, name: &str) -> bool {
        match id {
            EntryId::Perk(_) => match self.get_mut(id) {
                Some(entry) if entry.name != name => {
                    entry.name = name.to_string();
                    true
                }
                _ => false,
            },
            EntryId::Stat(_) => false,
        }
    }

    pub fn set_perk_type(&mut self, id: EntryId, perk_type: PerkType) -> bool {
        match self.get_mut(id) {
            Some(entry) if entry.kind() == Kind::Perk && entry.perk_type != Some(perk_type) => {
                entry.perk_type = Some(perk_type);
                true
            }
            _ => false,
        }
    }

    /// Put every entry back at its kind's minimum base, keeping the perk list.
    pub fn reset_values(&mut self) {
        for entry in self.stats.iter_mut().chain(self.perks.iter_mut()) {
            let base = entry.kind().min_base();
            entry.base = base;
            entry.current = base;
        }
    }

    /// Refund all spent points: `current = base` everywhere.
    pub fn reset_allocated(&mut self) -> bool {
        let mut changed = false;
        for entry in self.stats.iter_mut().chain(self.perks.iter_mut()) {
            changed |= entry.current != entry.base;
            entry.current = entry.base;
        }
        changed
    }
}
