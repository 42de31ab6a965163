//! # Storage Module
//!
//! Whole-file JSON snapshots under a data directory.
//!
//! Each key maps to `<data_dir>/<key>.json` holding a JSON array of records.
//! Loading never fails: a missing or corrupt file reads as empty, and single
//! records that no longer deserialize are skipped. Saving rewrites the whole file.
//!
//! Libraries edit the raw JSON array, so a record this build cannot read is
//! written back untouched when its neighbours change.

use crate::{config, Encounter, ForgeResult, MagicItem};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// A directory of keyed JSON snapshot files.
#[derive(Debug, Clone)]
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file backing a key.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }

    /// Loads the raw records stored under a key.
    pub fn load_raw(&self, key: &str) -> Vec<Value> {
        let path = self.path_for(key);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                log::debug!("No snapshot at {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&text) {
            Ok(records) => records,
            Err(e) => {
                log::warn!("Ignoring corrupt snapshot {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    /// Loads every readable record stored under a key.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.load_raw(key)
            .into_iter()
            .enumerate()
            .filter_map(|(i, record)| match serde_json::from_value(record) {
                Ok(value) => Some(value),
                Err(e) => {
                    log::warn!("Skipping record {} under {}: {}", i, key, e);
                    None
                }
            })
            .collect()
    }

    /// Replaces the snapshot stored under a key.
    pub fn save<T: Serialize>(&self, key: &str, records: &[T]) -> ForgeResult<()> {
        fs::create_dir_all(&self.data_dir)?;
        let json = serde_json::to_string_pretty(records)?;
        let path = self.path_for(key);
        fs::write(&path, json)?;
        log::info!("Saved {} record(s) to {}", records.len(), path.display());
        Ok(())
    }
}

fn record_name(record: &Value) -> Option<&str> {
    record.get("name").and_then(Value::as_str)
}

/// Saved encounters, keyed by exact name.
#[derive(Debug, Clone)]
pub struct EncounterLibrary {
    store: JsonStore,
}

impl EncounterLibrary {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    fn all(&self) -> Vec<Encounter> {
        self.store.load(config::SAVED_ENCOUNTERS_KEY)
    }

    /// Saves an encounter, replacing any saved one with the same name in place.
    pub fn save(&self, encounter: &Encounter) -> ForgeResult<()> {
        let mut saved = self.store.load_raw(config::SAVED_ENCOUNTERS_KEY);
        let record = serde_json::to_value(encounter)?;
        match saved
            .iter_mut()
            .find(|r| record_name(r) == Some(encounter.name.as_str()))
        {
            Some(existing) => *existing = record,
            None => saved.push(record),
        }
        self.store.save(config::SAVED_ENCOUNTERS_KEY, &saved)
    }

    pub fn load(&self, name: &str) -> Option<Encounter> {
        self.all().into_iter().find(|e| e.name == name)
    }

    /// Saved names in storage order.
    pub fn names(&self) -> Vec<String> {
        self.all().into_iter().map(|e| e.name).collect()
    }

    /// Removes the named encounter. Returns whether one was removed.
    pub fn delete(&self, name: &str) -> ForgeResult<bool> {
        let mut saved = self.store.load_raw(config::SAVED_ENCOUNTERS_KEY);
        let before = saved.len();
        saved.retain(|r| record_name(r) != Some(name));
        if saved.len() == before {
            return Ok(false);
        }
        self.store.save(config::SAVED_ENCOUNTERS_KEY, &saved)?;
        Ok(true)
    }
}

/// Saved magic items, in the order they were added.
#[derive(Debug, Clone)]
pub struct ItemCollection {
    store: JsonStore,
}

impl ItemCollection {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    pub fn add(&self, item: &MagicItem) -> ForgeResult<()> {
        let mut items = self.store.load_raw(config::SAVED_ITEMS_KEY);
        items.push(serde_json::to_value(item)?);
        self.store.save(config::SAVED_ITEMS_KEY, &items)
    }

    pub fn list(&self) -> Vec<MagicItem> {
        self.store.load(config::SAVED_ITEMS_KEY)
    }

    /// Removes the item at `index` of [`list`](Self::list), returning it.
    /// Out of range is a no-op.
    pub fn delete(&self, index: usize) -> ForgeResult<Option<MagicItem>> {
        let mut items = self.store.load_raw(config::SAVED_ITEMS_KEY);
        let found = items
            .iter()
            .enumerate()
            .filter_map(|(raw, record)| {
                serde_json::from_value::<MagicItem>(record.clone())
                    .ok()
                    .map(|item| (raw, item))
            })
            .nth(index);

        let Some((raw, removed)) = found else {
            return Ok(None);
        };
        items.remove(raw);
        self.store.save(config::SAVED_ITEMS_KEY, &items)?;
        Ok(Some(removed))
    }
}
