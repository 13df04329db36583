//! Inbound intents from the presentation layer

use crate::domain::{EntryId, PerkType};

/// One user action. Raw values are passed through unparsed; the engine
/// clamps them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Increment(EntryId),
    Decrement(EntryId),
    SetBase(EntryId, String),
    AddPerk { name: String },
    RemovePerk(EntryId),
    RenamePerk(EntryId, String),
    SetPerkType(EntryId, PerkType),
    SetLevel(String),
    SetXp(String),
    ToggleSync(bool),
    ResetAll,
    ResetAllocated,
}

impl Intent {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Increment(_) => "increment",
            Intent::Decrement(_) => "decrement",
            Intent::SetBase(..) => "set_base",
            Intent::AddPerk { .. } => "add_perk",
            Intent::RemovePerk(_) => "remove_perk",
            Intent::RenamePerk(..) => "rename_perk",
            Intent::SetPerkType(..) => "set_perk_type",
            Intent::SetLevel(_) => "set_level",
            Intent::SetXp(_) => "set_xp",
            Intent::ToggleSync(_) => "toggle_sync",
            Intent::ResetAll => "reset_all",
            Intent::ResetAllocated => "reset_allocated",
        }
    }
}
