//! Integration tests for the JSON snapshot store.

use encounter_forge::{
    config, Bestiary, Creature, Encounter, EncounterLibrary, ForgeResult, ItemCollection,
    JsonStore, MagicItem,
};
use rand::{rngs::StdRng, SeedableRng};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_encounter_survives_save_and_load() -> ForgeResult<()> {
    let dir = TempDir::new()?;
    let library = EncounterLibrary::new(JsonStore::new(dir.path()));

    let mut encounter = Encounter::new("Crypt");
    encounter.add_creature(Creature::at_full_health("Aria", 28, 16)?.as_player());
    encounter.add_creature(
        Creature::at_full_health("Ghoul", 22, 12)?
            .with_initiative_modifier(2)
            .with_notes("paralyzing claws"),
    );
    encounter.roll_all_initiative(&mut StdRng::seed_from_u64(5));
    for _ in 0..3 {
        encounter.next_turn();
    }
    if let Some(ghoul) = encounter.creature_mut(1) {
        ghoul.apply_damage(9);
        ghoul.add_condition("Frightened");
    }

    library.save(&encounter)?;
    let loaded = library.load("Crypt").expect("saved encounter");

    assert_eq!(loaded, encounter);
    assert_eq!(loaded.round_number(), 2);
    assert_eq!(loaded.current_turn_index(), 1);
    assert!(loaded.is_active());
    Ok(())
}

#[test]
fn test_fresh_store_is_empty() -> ForgeResult<()> {
    let dir = TempDir::new()?;
    let store = JsonStore::new(dir.path().join("missing"));

    assert!(EncounterLibrary::new(store.clone()).names().is_empty());
    assert!(ItemCollection::new(store.clone()).list().is_empty());
    assert!(Bestiary::load(&store).monsters().is_empty());
    Ok(())
}

#[test]
fn test_old_encounter_files_load_with_defaults() -> ForgeResult<()> {
    let dir = TempDir::new()?;
    let store = JsonStore::new(dir.path());
    fs::write(
        store.path_for(config::SAVED_ENCOUNTERS_KEY),
        r#"[
            {"name": "Legacy", "creatures": [{"name": "Kobold", "current_hp": 5, "max_hp": 5}]},
            {"name": "Broken", "round_number": 0},
            {"name": "Other"}
        ]"#,
    )?;

    let library = EncounterLibrary::new(store);
    assert_eq!(library.names(), vec!["Legacy", "Other"]);

    let legacy = library.load("Legacy").expect("legacy encounter");
    assert_eq!(legacy.round_number(), 1);
    assert!(!legacy.is_active());
    let kobold = legacy.creature(0).expect("kobold");
    assert_eq!(kobold.armor_class(), config::DEFAULT_ARMOR_CLASS);
    assert!(kobold.conditions.is_empty());
    Ok(())
}

#[test]
fn test_bestiary_file() -> ForgeResult<()> {
    let dir = TempDir::new()?;
    let store = JsonStore::new(dir.path());
    fs::write(
        store.path_for(config::SRD_MONSTERS_KEY),
        r#"[
            {"name": "Goblin", "hp": 7, "ac": 15, "initiative_modifier": 2},
            {"name": "Zombie", "hp": 22, "ac": 8}
        ]"#,
    )?;

    let bestiary = Bestiary::load(&store);
    let zombie = bestiary.find("zombie").expect("zombie template").spawn()?;
    assert_eq!(zombie.initiative_modifier, 0);
    assert_eq!(zombie.max_hp(), 22);
    Ok(())
}

#[test]
fn test_items_append_and_delete_by_index() -> ForgeResult<()> {
    let dir = TempDir::new()?;
    let items = ItemCollection::new(JsonStore::new(dir.path()));
    for name in ["Cloak of Embers", "Ring of Hush"] {
        let item: MagicItem = serde_json::from_value(serde_json::json!({
            "name": name,
            "rarity": "Rare",
            "properties": ["glows"]
        }))?;
        items.add(&item)?;
    }

    let saved = items.list();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[1].properties, vec!["glows"]);

    let removed = items.delete(0)?.expect("first item");
    assert_eq!(removed.name, "Cloak of Embers");
    assert_eq!(items.list()[0].name, "Ring of Hush");
    Ok(())
}
