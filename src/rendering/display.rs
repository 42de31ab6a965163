//! # Display
//!
//! Plain-text views of encounters, items and power breakdowns.

use super::{health_bar, paint, HpBand, HEALTH_BAR_WIDTH};
use crate::{verdict_range, BalanceVerdict, Creature, Encounter, MagicItem, PowerDetails, Rarity};
use std::fmt::Write;

/// Text renderer for terminal output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer {
    /// Emit ANSI colors for hit-point bands
    pub color: bool,
}

impl TextRenderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// One line per creature: marker, index, name, HP bar, AC, initiative, status.
    pub fn creature_line(&self, index: usize, creature: &Creature, is_current: bool) -> String {
        let marker = if is_current { ">" } else { " " };
        let band = HpBand::for_creature(creature);
        let mut line = format!(
            "{} {:>2}. {}{} {} AC {} Init {}",
            marker,
            index,
            creature.name,
            if creature.is_player { " (PC)" } else { "" },
            paint(&health_bar(creature, HEALTH_BAR_WIDTH), band, self.color),
            creature.armor_class(),
            creature.initiative,
        );

        if creature.is_unconscious() {
            line.push_str(" [Unconscious]");
        } else if creature.is_bloodied() {
            line.push_str(" [Bloodied]");
        }
        if !creature.conditions.is_empty() {
            let _ = write!(line, " {{{}}}", creature.conditions.join(", "));
        }
        if let Some(notes) = creature.notes.as_deref().filter(|n| !n.is_empty()) {
            let _ = write!(line, " - {}", notes);
        }
        line
    }

    /// Header plus roster in turn order.
    pub fn encounter(&self, encounter: &Encounter) -> String {
        let mut out = format!(
            "== {} == Round {}{}\n",
            encounter.name,
            encounter.round_number(),
            if encounter.is_active() { " (in combat)" } else { "" }
        );

        if encounter.is_empty() {
            out.push_str("  (no creatures)\n");
            return out;
        }

        for (i, creature) in encounter.creatures().iter().enumerate() {
            let current = encounter.is_active() && i == encounter.current_turn_index();
            out.push_str(&self.creature_line(i, creature, current));
            out.push('\n');
        }

        if let Some(current) = encounter.current_creature().filter(|_| encounter.is_active()) {
            let _ = writeln!(out, "Current turn: {}", current.name);
        }
        out
    }

    /// Full item card.
    pub fn item(&self, item: &MagicItem) -> String {
        let mut out = format!("{}\n", item.name);
        let _ = write!(out, "{}", item.item_type);
        if !item.subtype.is_empty() {
            let _ = write!(out, " ({})", item.subtype);
        }
        let _ = write!(out, ", {}", item.rarity);
        if item.requires_attunement {
            match item.attunement_requirement.as_deref() {
                Some(req) if !req.is_empty() => {
                    let _ = write!(out, " (requires attunement {})", req);
                }
                _ => out.push_str(" (requires attunement)"),
            }
        }
        out.push_str("\n\n");
        out.push_str(&item.description);
        out.push('\n');

        if !item.properties.is_empty() {
            out.push_str("\nProperties:\n");
            for property in &item.properties {
                let _ = writeln!(out, "  - {}", property);
            }
        }
        if let Some(curse) = item.curse.as_deref().filter(|c| !c.is_empty()) {
            let _ = writeln!(out, "\nCurse: {}", curse);
        }
        if let Some(lore) = item.lore.as_deref().filter(|l| !l.is_empty()) {
            let _ = writeln!(out, "\n{}", lore);
        }
        out
    }

    /// Numbered one-line summaries.
    pub fn item_list(&self, items: &[MagicItem]) -> String {
        if items.is_empty() {
            return "(no saved items)\n".to_string();
        }
        items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{:>3}. {} [{}] {}\n", i, item.name, item.rarity, item.item_type))
            .collect()
    }

    /// Component table, score, suggested rarity and the verdict for the selected rarity.
    pub fn power_details(
        &self,
        details: &PowerDetails,
        selected: Rarity,
        verdict: BalanceVerdict,
    ) -> String {
        let rows = [
            ("Damage per round (dDPR)", details.dpr),
            ("Action economy (A)", details.action_economy),
            ("Usage (U)", details.usage),
            ("Defensive (D)", details.defensive),
            ("Control/utility (C)", details.control_utility),
            ("Reliability (R)", details.reliability),
            ("Constraints (Ka)", details.constraints),
            ("Negative effects (Kn)", details.negative_effects),
        ];

        let mut out = String::new();
        for (label, value) in rows {
            let _ = writeln!(out, "{:<24}{:>8.2}", label, value);
        }
        let _ = writeln!(out, "{:<24}{:>8.2}", "Power score", details.power_score);
        let _ = writeln!(out, "Suggested rarity: {}", details.suggested_rarity);

        let (min, max) = verdict_range(selected);
        let range = format!("{}-{}", min, max);
        let _ = writeln!(out, "Selected rarity: {} ({}) -> {}", selected, range, verdict);
        out
    }
}
