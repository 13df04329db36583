//! Text commands for the interactive session and `eval`
//!
//! One command per line. Entry references are `sN` / `pN` (1-based display
//! positions) or a stat name.

use crate::application::services::CalculatorService;
use crate::application::Intent;
use crate::cli::{CliError, CliResult};
use crate::domain::{positional_ref, EntryId, Kind, PerkType};

pub const HELP: &str = "\
commands:
  inc|+ <ref>            buy one level
  dec|- <ref>            refund one level
  base <ref> <value>     set base level
  add [name]             add a perk
  rm <ref>               remove a perk
  name <ref> <text>      rename a perk
  type <ref> trait|ability
  level <value>          set character level
  xp <value>             set XP (only while sync is off)
  sync on|off            derive XP from level
  reset                  reset everything, keep perks
  reset-alloc            refund all spent points
  show | costs | help | quit
refs: s1..sN (stats), p1..pN (perks) or a stat name";

/// A parsed line: an engine intent or a session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Intent(Intent),
    Show,
    Costs,
    Help,
    Quit,
}

/// Parse one line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str, service: &CalculatorService) -> CliResult<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (keyword, rest) = split_word(line);

    let command = match keyword.to_ascii_lowercase().as_str() {
        "inc" | "+" | "increment" => Command::Intent(Intent::Increment(entry_arg(rest, service)?)),
        "dec" | "-" | "decrement" => Command::Intent(Intent::Decrement(entry_arg(rest, service)?)),
        "base" => {
            let (reference, value) = split_word(rest);
            let id = resolve(reference, service)?;
            Command::Intent(Intent::SetBase(id, required(value, "base")?.to_string()))
        }
        "add" => Command::Intent(Intent::AddPerk {
            name: rest.to_string(),
        }),
        "rm" | "remove" => Command::Intent(Intent::RemovePerk(entry_arg(rest, service)?)),
        "name" => {
            let (reference, name) = split_word(rest);
            let id = resolve(reference, service)?;
            Command::Intent(Intent::RenamePerk(id, name.to_string()))
        }
        "type" => {
            let (reference, value) = split_word(rest);
            let id = resolve(reference, service)?;
            let perk_type = required(value, "type")?
                .parse::<PerkType>()
                .map_err(CliError::InvalidArgs)?;
            Command::Intent(Intent::SetPerkType(id, perk_type))
        }
        "level" => Command::Intent(Intent::SetLevel(required(rest, "level")?.to_string())),
        "xp" => Command::Intent(Intent::SetXp(required(rest, "xp")?.to_string())),
        "sync" => Command::Intent(Intent::ToggleSync(parse_switch(rest)?)),
        "reset" => Command::Intent(Intent::ResetAll),
        "reset-alloc" | "reset-allocated" => Command::Intent(Intent::ResetAllocated),
        "show" | "view" => Command::Show,
        "costs" => Command::Costs,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CliError::Usage(format!("unknown command: {other}"))),
    };
    Ok(Some(command))
}

/// Resolve an entry reference against the live store.
pub fn resolve(reference: &str, service: &CalculatorService) -> CliResult<EntryId> {
    let store = service.store();
    let found = match positional_ref(reference) {
        Some((Kind::Stat, n)) => n
            .checked_sub(1)
            .filter(|&index| index < store.stats().len())
            .map(EntryId::Stat),
        Some((Kind::Perk, n)) => n.checked_sub(1).and_then(|index| store.perk_at(index)),
        None => store.stat_named(reference),
    };

    found.ok_or_else(|| CliError::InvalidArgs(format!("unknown entry: {reference:?}")))
}

fn entry_arg(rest: &str, service: &CalculatorService) -> CliResult<EntryId> {
    let (reference, extra) = split_word(rest);
    if !extra.is_empty() {
        return Err(CliError::InvalidArgs(format!("unexpected argument: {extra}")));
    }
    resolve(reference, service)
}

fn required<'a>(value: &'a str, what: &str) -> CliResult<&'a str> {
    if value.is_empty() {
        Err(CliError::InvalidArgs(format!("{what}: missing value")))
    } else {
        Ok(value)
    }
}

fn parse_switch(value: &str) -> CliResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(CliError::InvalidArgs(format!("sync: expected on|off, got {other:?}"))),
    }
}

/// Split off the first whitespace-delimited word.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (s, ""),
    }
}
