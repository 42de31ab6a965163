//! # Bestiary
//!
//! Monster templates that can be spawned into an encounter.

use super::Creature;
use crate::{config, ForgeResult, JsonStore};
use serde::{Deserialize, Serialize};

/// Stat block for a monster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterTemplate {
    pub name: String,
    pub hp: i32,
    pub ac: i32,
    #[serde(default)]
    pub initiative_modifier: i32,
}

impl MonsterTemplate {
    /// Creates a full-health, non-player creature from this template.
    pub fn spawn(&self) -> ForgeResult<Creature> {
        Ok(Creature::at_full_health(self.name.clone(), self.hp, self.ac)?
            .with_initiative_modifier(self.initiative_modifier))
    }
}

/// A searchable list of monster templates.
#[derive(Debug, Clone, Default)]
pub struct Bestiary {
    monsters: Vec<MonsterTemplate>,
}

impl Bestiary {
    pub fn new(monsters: Vec<MonsterTemplate>) -> Self {
        Self { monsters }
    }

    /// Loads the bestiary from the store; a missing file gives an empty bestiary.
    pub fn load(store: &JsonStore) -> Self {
        Self::new(store.load(config::SRD_MONSTERS_KEY))
    }

    pub fn monsters(&self) -> &[MonsterTemplate] {
        &self.monsters
    }

    /// Finds a template by name, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<&MonsterTemplate> {
        self.monsters
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bestiary() -> Bestiary {
        Bestiary::new(vec![
            MonsterTemplate {
                name: "Goblin".to_string(),
                hp: 7,
                ac: 15,
                initiative_modifier: 2,
            },
            MonsterTemplate {
                name: "Ogre".to_string(),
                hp: 59,
                ac: 11,
                initiative_modifier: -1,
            },
        ])
    }

    #[test]
    fn test_find_ignores_case() {
        let b = bestiary();
        assert_eq!(b.find("ogre").unwrap().hp, 59);
        assert!(b.find("Dragon").is_none());
    }

    #[test]
    fn test_spawn_full_health() {
        let goblin = bestiary().find("Goblin").unwrap().spawn().unwrap();
        assert_eq!(goblin.current_hp(), 7);
        assert_eq!(goblin.armor_class(), 15);
        assert_eq!(goblin.initiative_modifier, 2);
        assert!(!goblin.is_player);
    }

    #[test]
    fn test_spawn_rejects_broken_template() {
        let broken = MonsterTemplate {
            name: "Wisp".to_string(),
            hp: 0,
            ac: 19,
            initiative_modifier: 0,
        };
        assert!(broken.spawn().is_err());
    }

    #[test]
    fn test_template_initiative_defaults_to_zero() {
        let t: MonsterTemplate =
            serde_json::from_str(r#"{"name": "Rat", "hp": 1, "ac": 10}"#).unwrap();
        assert_eq!(t.initiative_modifier, 0);
    }
}
