//! # Encounter State
//!
//! The encounter roster and its turn/round state machine.
//!
//! An encounter is either in setup (`is_active == false`) or in combat. Rolling
//! initiative for everyone moves it into combat; [`Encounter::reset_combat`] moves
//! it back. Turn navigation on an empty roster does nothing.

use super::{roll_initiative, sort_by_initiative, Creature, DiceRoller};
use crate::{config, ForgeError, ForgeResult};
use log::debug;
use serde::{Deserialize, Serialize};

/// An encounter with its creatures in turn order.
///
/// # Examples
///
/// ```
/// use encounter_forge::{Creature, Encounter};
///
/// let mut encounter = Encounter::new("Goblin Ambush");
/// encounter.add_creature(Creature::at_full_health("Goblin", 7, 15).unwrap());
/// encounter.add_creature(Creature::at_full_health("Wolf", 11, 13).unwrap());
///
/// encounter.next_turn();
/// encounter.next_turn();
/// assert_eq!(encounter.current_turn_index(), 0);
/// assert_eq!(encounter.round_number(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EncounterRecord")]
pub struct Encounter {
    /// Name, also used as the save key
    pub name: String,
    creatures: Vec<Creature>,
    current_turn_index: usize,
    round_number: u32,
    is_active: bool,
}

/// Serialized shape of an encounter; missing keys fall back to defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct EncounterRecord {
    name: String,
    creatures: Vec<Creature>,
    current_turn_index: usize,
    round_number: u32,
    is_active: bool,
}

impl Default for EncounterRecord {
    fn default() -> Self {
        Self {
            name: config::DEFAULT_ENCOUNTER_NAME.to_string(),
            creatures: Vec::new(),
            current_turn_index: 0,
            round_number: 1,
            is_active: false,
        }
    }
}

impl TryFrom<EncounterRecord> for Encounter {
    type Error = ForgeError;

    fn try_from(record: EncounterRecord) -> ForgeResult<Self> {
        if record.round_number < 1 {
            return Err(ForgeError::validation("round_number", "must be at least 1"));
        }
        if !record.creatures.is_empty() && record.current_turn_index >= record.creatures.len() {
            return Err(ForgeError::validation(
                "current_turn_index",
                format!(
                    "{} is out of range for {} creatures",
                    record.current_turn_index,
                    record.creatures.len()
                ),
            ));
        }

        let current_turn_index = if record.creatures.is_empty() {
            0
        } else {
            record.current_turn_index
        };

        Ok(Self {
            name: record.name,
            creatures: record.creatures,
            current_turn_index,
            round_number: record.round_number,
            is_active: record.is_active,
        })
    }
}

impl Default for Encounter {
    fn default() -> Self {
        Self::new(config::DEFAULT_ENCOUNTER_NAME)
    }
}

impl Encounter {
    /// Creates an empty encounter at round 1, out of combat.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            creatures: Vec::new(),
            current_turn_index: 0,
            round_number: 1,
            is_active: false,
        }
    }

    /// Creatures in turn order.
    pub fn creatures(&self) -> &[Creature] {
        &self.creatures
    }

    pub fn creature(&self, index: usize) -> Option<&Creature> {
        self.creatures.get(index)
    }

    /// Mutable access to one creature for HP and condition changes.
    pub fn creature_mut(&mut self, index: usize) -> Option<&mut Creature> {
        self.creatures.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    pub fn current_turn_index(&self) -> usize {
        self.current_turn_index
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    /// Whether initiative has been rolled since the last reset.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// The creature whose turn it currently is.
    pub fn current_creature(&self) -> Option<&Creature> {
        self.creatures.get(self.current_turn_index)
    }

    /// Appends a creature to the end of the roster.
    pub fn add_creature(&mut self, creature: Creature) {
        debug!("Adding {} to {}", creature.name, self.name);
        self.creatures.push(creature);
    }

    /// Removes the creature at `index`, shifting later creatures down.
    ///
    /// Out-of-range indices are ignored. If the turn pointer ends up past the
    /// end of the roster it is clamped to the last creature (or 0 when empty).
    pub fn remove_creature(&mut self, index: usize) -> Option<Creature> {
        if index >= self.creatures.len() {
            return None;
        }

        let removed = self.creatures.remove(index);
        if self.current_turn_index >= self.creatures.len() {
            self.current_turn_index = self.creatures.len().saturating_sub(1);
        }
        debug!("Removed {} from {}", removed.name, self.name);
        Some(removed)
    }

    /// Advances to the next turn, starting a new round after the last creature.
    pub fn next_turn(&mut self) {
        if self.creatures.is_empty() {
            return;
        }

        self.current_turn_index += 1;
        if self.current_turn_index >= self.creatures.len() {
            self.current_turn_index = 0;
            self.round_number = self.round_number.saturating_add(1);
        }
        debug!(
            "Round {}, turn {}",
            self.round_number, self.current_turn_index
        );
    }

    /// Goes back one turn. The round number never drops below 1.
    pub fn prev_turn(&mut self) {
        if self.creatures.is_empty() {
            return;
        }

        if self.current_turn_index == 0 {
            self.current_turn_index = self.creatures.len() - 1;
            self.round_number = self.round_number.saturating_sub(1).max(1);
        } else {
            self.current_turn_index -= 1;
        }
        debug!(
            "Round {}, turn {}",
            self.round_number, self.current_turn_index
        );
    }

    /// Returns to round 1, turn 1, out of combat.
    ///
    /// Creatures, their HP and their conditions are left alone.
    pub fn reset_combat(&mut self) {
        self.current_turn_index = 0;
        self.round_number = 1;
        self.is_active = false;
    }

    /// Rolls initiative for every creature, re-sorts the roster and enters combat.
    ///
    /// The turn pointer goes back to the first creature. The round number is kept,
    /// so re-rolling mid-combat continues the same fight with a fresh order; pair
    /// this with [`Encounter::reset_combat`] for a new fight.
    pub fn roll_all_initiative<D: DiceRoller + ?Sized>(&mut self, dice: &mut D) {
        for creature in &mut self.creatures {
            creature.initiative = roll_initiative(creature, dice);
            debug!("{} rolled {} for initiative", creature.name, creature.initiative);
        }

        let creatures = std::mem::take(&mut self.creatures);
        self.creatures = sort_by_initiative(creatures, dice);
        self.current_turn_index = 0;
        self.is_active = true;
    }

    /// Saves the encounter to JSON.
    pub fn save_to_json(&self) -> ForgeResult<String> {
        serde_json::to_string_pretty(self).map_err(ForgeError::from)
    }

    /// Loads an encounter from JSON.
    pub fn load_from_json(json: &str) -> ForgeResult<Self> {
        serde_json::from_str(json).map_err(ForgeError::from)
    }
}
