//! Text rendering of the calculator view

use colored::Colorize;

use crate::application::services::{CalculatorView, EntryView, LedgerView};
use crate::domain::{Kind, Rules};

/// Render entries, sync state and totals as a table.
pub fn render_view(view: &CalculatorView) -> String {
    let sync = &view.sync;
    let mode = if sync.sync_enabled { "sync on" } else { "sync off" };
    let title = format!("Level {} ({mode}), XP {}", sync.level, sync.xp);

    let name_width = view
        .entries
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    let mut lines = vec![
        title.cyan().bold().to_string(),
        format!(
            "  {:<4} {:<name_width$} {:<7} {:>4} {:>4} {:>5}  {}",
            "id", "name", "type", "base", "cur", "cost", "-/+"
        ),
    ];
    for entry in &view.entries {
        if entry.label == "p1" {
            lines.push(format!("  {}", "perks".dimmed()));
        }
        lines.push(entry_row(entry, name_width));
    }
    if !view.entries.iter().any(|e| e.kind == Kind::Perk) {
        lines.push(format!("  {}", "no perks".dimmed()));
    }
    lines.push(ledger_line(&view.ledger));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn entry_row(entry: &EntryView, name_width: usize) -> String {
    let perk_type = entry.perk_type.map(|t| t.to_string()).unwrap_or_default();
    let dec = if entry.can_decrement { "-".normal() } else { ".".dimmed() };
    let inc = if entry.can_increment { "+".green() } else { ".".dimmed() };
    format!(
        "  {:<4} {:<name_width$} {:<7} {:>4} {:>4} {:>5}  {dec}{inc}",
        entry.label, entry.name, perk_type, entry.base, entry.current, entry.cost
    )
}

fn ledger_line(ledger: &LedgerView) -> String {
    let remaining = format!("remaining {}", ledger.remaining);
    let remaining = if ledger.remaining_is_negative {
        remaining.red().bold()
    } else {
        remaining.green()
    };
    format!(
        "available {} | stats {} | perks {} | {}",
        ledger.available, ledger.spent_stats, ledger.spent_perks, remaining
    )
}

/// Render both cost tables with running totals.
pub fn render_costs(rules: &Rules) -> String {
    let cell = |kind: Kind, level: u32| {
        let base = kind.min_base().min(level - 1);
        format!(
            "{}/{}",
            rules.incremental_cost(kind, level),
            rules.cumulative_cost(kind, base, level)
        )
    };

    let mut out = format!("{:>5}  {:>9} {:>9}\n", "level", "stat", "perk");
    for level in 1..=rules.max_level() {
        out.push_str(&format!(
            "{:>5}  {:>9} {:>9}\n",
            level,
            cell(Kind::Stat, level),
            cell(Kind::Perk, level)
        ));
    }
    out.push_str(&format!(
        "{}\n",
        "cells: step cost / total from minimum base".dimmed()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::CalculatorService;

    #[test]
    fn given_default_rules_when_rendering_costs_then_lists_every_level() {
        colored::control::set_override(false);
        let text = render_costs(&Rules::default());
        let row: Vec<Vec<&str>> = text
            .lines()
            .map(|line| line.split_whitespace().collect())
            .collect();
        assert!(row.contains(&vec!["3", "6/9", "4/7"]), "{text}");
        assert!(row.contains(&vec!["6", "15/45", "10/31"]), "{text}");
        assert_eq!(text.lines().count(), 8);
    }

    #[test]
    fn given_overspent_session_when_rendering_then_shows_negative_remaining() {
        colored::control::set_override(false);
        let mut service = CalculatorService::default().with_initial_perks(1);
        let id = crate::domain::EntryId::Stat(0);
        service.set_base(id, "6");
        service.set_base(id, "1");

        let text = render_view(&service.view());

        assert!(text.contains("remaining -9"), "{text}");
        assert!(text.contains("p1"), "{text}");
        assert!(text.contains("Level 1 (sync on), XP 36"), "{text}");
    }
}
