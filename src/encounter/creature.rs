//! # Creatures
//!
//! Players, monsters and NPCs taking part in an encounter.
//!
//! Hit points and armor class are guarded: a creature can only be built in a
//! valid state, and every mutator keeps `0 <= current_hp <= max_hp`.

use crate::{config, ForgeError, ForgeResult};
use serde::{Deserialize, Serialize};

/// A creature in an encounter (player, enemy, or NPC).
///
/// # Examples
///
/// ```
/// use encounter_forge::Creature;
///
/// let mut goblin = Creature::at_full_health("Goblin", 7, 15).unwrap();
/// goblin.apply_damage(4);
/// assert_eq!(goblin.current_hp(), 3);
/// assert!(goblin.is_bloodied());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CreatureRecord")]
pub struct Creature {
    /// Display name
    pub name: String,
    /// Last rolled initiative
    pub initiative: i32,
    /// Bonus added to every initiative roll
    pub initiative_modifier: i32,
    current_hp: i32,
    max_hp: i32,
    armor_class: i32,
    /// Player-controlled creatures win initiative ties against non-players
    pub is_player: bool,
    /// Status effects in display order, duplicates allowed
    pub conditions: Vec<String>,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Serialized shape of a creature; older saves may omit the optional keys.
#[derive(Debug, Deserialize)]
struct CreatureRecord {
    name: String,
    #[serde(default)]
    initiative: i32,
    #[serde(default)]
    initiative_modifier: i32,
    current_hp: i32,
    max_hp: i32,
    #[serde(default = "default_armor_class")]
    armor_class: i32,
    #[serde(default)]
    is_player: bool,
    #[serde(default)]
    conditions: Vec<String>,
    #[serde(default)]
    notes: Option<String>,
}

fn default_armor_class() -> i32 {
    config::DEFAULT_ARMOR_CLASS
}

impl TryFrom<CreatureRecord> for Creature {
    type Error = ForgeError;

    fn try_from(record: CreatureRecord) -> ForgeResult<Self> {
        let mut creature = Creature::new(
            record.name,
            record.current_hp,
            record.max_hp,
            record.armor_class,
        )?;
        creature.initiative = record.initiative;
        creature.initiative_modifier = record.initiative_modifier;
        creature.is_player = record.is_player;
        creature.conditions = record.conditions;
        creature.notes = record.notes;
        Ok(creature)
    }
}

impl Creature {
    /// Creates a creature, rejecting hit points or armor class outside their ranges.
    ///
    /// # Examples
    ///
    /// ```
    /// use encounter_forge::{Creature, ForgeError};
    ///
    /// let err = Creature::new("Ogre", 60, 59, 11).unwrap_err();
    /// assert!(matches!(err, ForgeError::Validation { ref field, .. } if field == "current_hp"));
    /// ```
    pub fn new(
        name: impl Into<String>,
        current_hp: i32,
        max_hp: i32,
        armor_class: i32,
    ) -> ForgeResult<Self> {
        if max_hp < 1 {
            return Err(ForgeError::validation(
                "max_hp",
                format!("must be at least 1, got {}", max_hp),
            ));
        }
        if current_hp < 0 {
            return Err(ForgeError::validation(
                "current_hp",
                format!("must not be negative, got {}", current_hp),
            ));
        }
        if current_hp > max_hp {
            return Err(ForgeError::validation(
                "current_hp",
                format!("{} exceeds max_hp {}", current_hp, max_hp),
            ));
        }
        if armor_class < 0 {
            return Err(ForgeError::validation(
                "armor_class",
                format!("must not be negative, got {}", armor_class),
            ));
        }

        Ok(Self {
            name: name.into(),
            initiative: 0,
            initiative_modifier: 0,
            current_hp,
            max_hp,
            armor_class,
            is_player: false,
            conditions: Vec::new(),
            notes: None,
        })
    }

    /// Creates a creature with `current_hp == max_hp`.
    pub fn at_full_health(
        name: impl Into<String>,
        max_hp: i32,
        armor_class: i32,
    ) -> ForgeResult<Self> {
        Self::new(name, max_hp, max_hp, armor_class)
    }

    /// Sets the initiative modifier.
    pub fn with_initiative_modifier(mut self, modifier: i32) -> Self {
        self.initiative_modifier = modifier;
        self
    }

    /// Marks the creature as player-controlled.
    pub fn as_player(mut self) -> Self {
        self.is_player = true;
        self
    }

    /// Attaches notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn current_hp(&self) -> i32 {
        self.current_hp
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn armor_class(&self) -> i32 {
        self.armor_class
    }

    /// Changes armor class, rejecting negative values.
    pub fn set_armor_class(&mut self, armor_class: i32) -> ForgeResult<()> {
        if armor_class < 0 {
            return Err(ForgeError::validation(
                "armor_class",
                format!("must not be negative, got {}", armor_class),
            ));
        }
        self.armor_class = armor_class;
        Ok(())
    }

    /// HP as a percentage of max HP.
    pub fn hp_percentage(&self) -> f64 {
        f64::from(self.current_hp) / f64::from(self.max_hp) * 100.0
    }

    /// At or below half of max HP.
    pub fn is_bloodied(&self) -> bool {
        f64::from(self.current_hp) <= f64::from(self.max_hp) / 2.0
    }

    /// At 0 HP.
    pub fn is_unconscious(&self) -> bool {
        self.current_hp == 0
    }

    /// Applies damage, flooring HP at 0. Negative amounts count as 0.
    ///
    /// Returns the new HP.
    pub fn apply_damage(&mut self, damage: i32) -> i32 {
        self.current_hp = self.current_hp.saturating_sub(damage.max(0)).max(0);
        self.current_hp
    }

    /// Applies healing, capping HP at max HP. Negative amounts count as 0.
    ///
    /// Returns the new HP.
    pub fn apply_healing(&mut self, healing: i32) -> i32 {
        self.current_hp = self
            .current_hp
            .saturating_add(healing.max(0))
            .min(self.max_hp);
        self.current_hp
    }

    /// Restores HP to max.
    pub fn full_heal(&mut self) {
        self.current_hp = self.max_hp;
    }

    /// Appends a condition label.
    pub fn add_condition(&mut self, condition: impl Into<String>) {
        self.conditions.push(condition.into());
    }

    /// Removes the first occurrence of a condition label.
    pub fn remove_condition(&mut self, condition: &str) -> bool {
        match self.conditions.iter().position(|c| c == condition) {
            Some(index) => {
                self.conditions.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replaces the whole condition list.
    pub fn set_conditions(&mut self, conditions: Vec<String>) {
        self.conditions = conditions;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn creature(current_hp: i32, max_hp: i32) -> Creature {
        Creature::new("Test", current_hp, max_hp, 12).unwrap()
    }

    #[test]
    fn test_creature_defaults() {
        let c = Creature::at_full_health("Wolf", 11, 13).unwrap();
        assert_eq!(c.current_hp(), 11);
        assert_eq!(c.max_hp(), 11);
        assert_eq!(c.armor_class(), 13);
        assert_eq!(c.initiative, 0);
        assert!(!c.is_player);
        assert!(c.conditions.is_empty());
        assert!(c.notes.is_none());
    }

    #[test]
    fn test_construction_rejects_bad_fields() {
        let field_of = |r: ForgeResult<Creature>| match r {
            Err(ForgeError::Validation { field, .. }) => field,
            other => panic!("expected validation error, got {:?}", other),
        };

        assert_eq!(field_of(Creature::new("A", 0, 0, 10)), "max_hp");
        assert_eq!(field_of(Creature::new("A", -1, 10, 10)), "current_hp");
        assert_eq!(field_of(Creature::new("A", 11, 10, 10)), "current_hp");
        assert_eq!(field_of(Creature::new("A", 5, 10, -1)), "armor_class");
    }

    #[test]
    fn test_overkill_damage_knocks_unconscious() {
        let mut c = creature(20, 20);
        assert_eq!(c.apply_damage(25), 0);
        assert!(c.is_unconscious());
        assert!(c.is_bloodied());
    }

    #[test]
    fn test_healing_caps_at_max() {
        let mut c = creature(3, 20);
        assert_eq!(c.apply_healing(100), 20);
        assert!(!c.is_bloodied());
    }

    #[test]
    fn test_negative_amounts_do_nothing() {
        let mut c = creature(10, 20);
        assert_eq!(c.apply_damage(-5), 10);
        assert_eq!(c.apply_healing(-5), 10);
    }

    #[test]
    fn test_derived_status() {
        let c = creature(10, 20);
        assert_eq!(c.hp_percentage(), 50.0);
        assert!(c.is_bloodied());

        // Half of an odd maximum is not rounded down
        let c = creature(6, 11);
        assert!(!c.is_bloodied());
        let c = creature(5, 11);
        assert!(c.is_bloodied());
    }

    #[test]
    fn test_full_heal() {
        let mut c = creature(1, 9);
        c.full_heal();
        assert_eq!(c.current_hp(), 9);
    }

    #[test]
    fn test_conditions_keep_order_and_duplicates() {
        let mut c = creature(5, 5);
        c.add_condition("Prone");
        c.add_condition("Poisoned");
        c.add_condition("Prone");
        assert_eq!(c.conditions, vec!["Prone", "Poisoned", "Prone"]);

        assert!(c.remove_condition("Prone"));
        assert_eq!(c.conditions, vec!["Poisoned", "Prone"]);
        assert!(!c.remove_condition("Stunned"));
    }

    #[test]
    fn test_set_armor_class() {
        let mut c = creature(5, 5);
        assert!(c.set_armor_class(-2).is_err());
        assert_eq!(c.armor_class(), 12);
        c.set_armor_class(18).unwrap();
        assert_eq!(c.armor_class(), 18);
    }

    #[test]
    fn test_deserialization_fills_defaults() {
        let json = r#"{"name": "Orc", "current_hp": 15, "max_hp": 15}"#;
        let c: Creature = serde_json::from_str(json).unwrap();
        assert_eq!(c.armor_class(), config::DEFAULT_ARMOR_CLASS);
        assert_eq!(c.initiative_modifier, 0);
        assert!(c.conditions.is_empty());
    }

    #[test]
    fn test_deserialization_validates() {
        let json = r#"{"name": "Orc", "current_hp": 16, "max_hp": 15}"#;
        assert!(serde_json::from_str::<Creature>(json).is_err());
    }

    proptest! {
        #[test]
        fn prop_damage_stays_in_bounds(max_hp in 1i32..500, start in 0i32..500, dmg in any::<i32>()) {
            let mut c = creature(start.min(max_hp), max_hp);
            let hp = c.apply_damage(dmg);
            prop_assert!(hp >= 0 && hp <= max_hp);
        }

        #[test]
        fn prop_healing_stays_in_bounds(max_hp in 1i32..500, start in 0i32..500, heal in any::<i32>()) {
            let mut c = creature(start.min(max_hp), max_hp);
            let hp = c.apply_healing(heal);
            prop_assert!(hp >= 0 && hp <= max_hp);
        }
    }
}
