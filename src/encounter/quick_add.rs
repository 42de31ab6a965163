//! # Quick Add
//!
//! Bulk creature entry from plain text, one creature per line:
//! `name, hp, ac[, init_mod]`.

use super::Creature;

/// Creatures parsed from a quick-add block plus the lines that were rejected.
#[derive(Debug, Clone, Default)]
pub struct QuickAddOutcome {
    /// Parsed creatures in line order, all non-players at full HP
    pub creatures: Vec<Creature>,
    /// Non-blank lines that could not be parsed, trimmed
    pub rejected: Vec<String>,
}

/// Parses a quick-add block.
///
/// Blank lines are skipped. A line is rejected when it has fewer than three
/// fields, a non-integer number, or numbers that do not make a valid creature.
///
/// # Examples
///
/// ```
/// use encounter_forge::parse_quick_add;
///
/// let outcome = parse_quick_add("Goblin, 7, 15, 2\nOrc, 15, 13\nnonsense");
/// assert_eq!(outcome.creatures.len(), 2);
/// assert_eq!(outcome.creatures[1].initiative_modifier, 0);
/// assert_eq!(outcome.rejected, vec!["nonsense"]);
/// ```
pub fn parse_quick_add(text: &str) -> QuickAddOutcome {
    let mut outcome = QuickAddOutcome::default();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match parse_line(line) {
            Some(creature) => outcome.creatures.push(creature),
            None => {
                log::warn!("Could not parse quick-add line: {}", line);
                outcome.rejected.push(line.to_string());
            }
        }
    }

    outcome
}

fn parse_line(line: &str) -> Option<Creature> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() < 3 {
        return None;
    }

    let hp: i32 = parts[1].parse().ok()?;
    let ac: i32 = parts[2].parse().ok()?;
    let init_mod: i32 = match parts.get(3) {
        Some(raw) => raw.parse().ok()?,
        None => 0,
    };

    Creature::at_full_health(parts[0], hp, ac)
        .ok()
        .map(|c| c.with_initiative_modifier(init_mod))
}
