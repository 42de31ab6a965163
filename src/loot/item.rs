//! # Magic Items
//!
//! The generated item record and its typed ingestion from generator output.
//!
//! Generator replies are untyped JSON. [`MagicItem::from_generated`] maps them onto the
//! record with explicit per-field default-fill rules, and rejects data that cannot be an
//! item at all (no name, or a field holding the wrong kind of value).

use super::{LootParameters, QuickLootParameters};
use crate::{ForgeError, ForgeResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Description used when the generator omits one.
pub const DEFAULT_DESCRIPTION: &str = "No description provided.";

/// A generated magic item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagicItem {
    pub name: String,
    #[serde(default)]
    pub item_type: String,
    #[serde(default)]
    pub subtype: String,
    #[serde(default)]
    pub rarity: String,
    #[serde(default)]
    pub requires_attunement: bool,
    #[serde(default)]
    pub attunement_requirement: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub curse: Option<String>,
    #[serde(default)]
    pub lore: Option<String>,
}

/// Values used for fields the generator leaves out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDefaults {
    pub item_type: String,
    pub subtype: String,
    pub rarity: String,
    pub requires_attunement: bool,
}

impl ItemDefaults {
    /// Falls back to what was requested.
    pub fn for_params(params: &LootParameters) -> Self {
        Self {
            item_type: params.item_type.label().to_string(),
            subtype: params.item_subtype.label().to_string(),
            rarity: params.rarity.label().to_string(),
            requires_attunement: params.requires_attunement,
        }
    }

    /// Quick mode only fixes the rarity.
    pub fn for_quick(params: &QuickLootParameters) -> Self {
        Self {
            item_type: "Wondrous Item".to_string(),
            subtype: "Unknown".to_string(),
            rarity: params.rarity.label().to_string(),
            requires_attunement: false,
        }
    }
}

impl MagicItem {
    /// Builds an item from a generator's JSON object.
    ///
    /// Missing or `null` fields take their default. A missing or blank `name`, or any
    /// present field of the wrong JSON type, is a validation error naming the field.
    ///
    /// # Examples
    ///
    /// ```
    /// use encounter_forge::{ItemDefaults, LootParameters, MagicItem};
    ///
    /// let reply = serde_json::json!({"name": "Emberfang", "properties": ["+1 to attack"]});
    /// let defaults = ItemDefaults::for_params(&LootParameters::default());
    /// let item = MagicItem::from_generated(reply.as_object().unwrap(), &defaults).unwrap();
    /// assert_eq!(item.item_type, "Weapon");
    /// assert_eq!(item.rarity, "Uncommon");
    /// ```
    pub fn from_generated(data: &Map<String, Value>, defaults: &ItemDefaults) -> ForgeResult<Self> {
        let name = optional_string(data, "name")?
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| ForgeError::validation("name", "generated item has no name"))?;

        Ok(Self {
            name,
            item_type: optional_string(data, "item_type")?
                .unwrap_or_else(|| defaults.item_type.clone()),
            subtype: optional_string(data, "subtype")?
                .unwrap_or_else(|| defaults.subtype.clone()),
            rarity: optional_string(data, "rarity")?.unwrap_or_else(|| defaults.rarity.clone()),
            requires_attunement: optional_bool(data, "requires_attunement")?
                .unwrap_or(defaults.requires_attunement),
            attunement_requirement: optional_string(data, "attunement_requirement")?,
            description: optional_string(data, "description")?
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            properties: optional_string_list(data, "properties")?.unwrap_or_default(),
            curse: optional_string(data, "curse")?,
            lore: optional_string(data, "lore")?,
        })
    }
}

fn present<'a>(data: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    data.get(field).filter(|value| !value.is_null())
}

fn optional_string(data: &Map<String, Value>, field: &str) -> ForgeResult<Option<String>> {
    match present(data, field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(wrong_type(field, "a string", other)),
    }
}

fn optional_bool(data: &Map<String, Value>, field: &str) -> ForgeResult<Option<bool>> {
    match present(data, field) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(wrong_type(field, "a boolean", other)),
    }
}

fn optional_string_list(data: &Map<String, Value>, field: &str) -> ForgeResult<Option<Vec<String>>> {
    let items = match present(data, field) {
        None => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(other) => return Err(wrong_type(field, "a list of strings", other)),
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            other => Err(wrong_type(field, "a list of strings", other)),
        })
        .collect::<ForgeResult<Vec<_>>>()
        .map(Some)
}

fn wrong_type(field: &str, expected: &str, found: &Value) -> ForgeError {
    ForgeError::validation(field, format!("expected {}, found {}", expected, found))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ItemSubtype, ItemType, Rarity};
    use serde_json::json;

    fn advanced_defaults() -> ItemDefaults {
        let params = LootParameters {
            item_type: ItemType::Armor,
            item_subtype: ItemSubtype::Shield,
            rarity: Rarity::Rare,
            requires_attunement: true,
            ..Default::default()
        };
        ItemDefaults::for_params(&params)
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_full_reply_is_taken_verbatim() {
        let data = object(json!({
            "name": "Aegis of Dawn",
            "item_type": "Armor",
            "subtype": "Shield",
            "rarity": "Very Rare",
            "requires_attunement": false,
            "attunement_requirement": null,
            "description": "A radiant shield.",
            "properties": ["+2 AC", "Resistance to radiant damage"],
            "curse": null,
            "lore": "Forged at first light."
        }));
        let item = MagicItem::from_generated(&data, &advanced_defaults()).unwrap();
        assert_eq!(item.name, "Aegis of Dawn");
        assert_eq!(item.rarity, "Very Rare");
        assert!(!item.requires_attunement);
        assert_eq!(item.properties.len(), 2);
        assert_eq!(item.curse, None);
        assert_eq!(item.lore.as_deref(), Some("Forged at first light."));
    }

    #[test]
    fn test_missing_fields_fall_back_to_request() {
        let data = object(json!({"name": "Plain Shield"}));
        let item = MagicItem::from_generated(&data, &advanced_defaults()).unwrap();
        assert_eq!(item.item_type, "Armor");
        assert_eq!(item.subtype, "Shield");
        assert_eq!(item.rarity, "Rare");
        assert!(item.requires_attunement);
        assert_eq!(item.description, DEFAULT_DESCRIPTION);
        assert!(item.properties.is_empty());
        assert!(item.attunement_requirement.is_none());
    }

    #[test]
    fn test_quick_defaults() {
        let quick = QuickLootParameters {
            rarity: Rarity::Legendary,
            theme_description: "whispering ring".to_string(),
        };
        let item =
            MagicItem::from_generated(&object(json!({"name": "Hush"})), &ItemDefaults::for_quick(&quick))
                .unwrap();
        assert_eq!(item.item_type, "Wondrous Item");
        assert_eq!(item.subtype, "Unknown");
        assert_eq!(item.rarity, "Legendary");
        assert!(!item.requires_attunement);
    }

    #[test]
    fn test_name_is_required() {
        for data in [json!({}), json!({"name": null}), json!({"name": "   "})] {
            match MagicItem::from_generated(&object(data), &advanced_defaults()) {
                Err(ForgeError::Validation { field, .. }) => assert_eq!(field, "name"),
                other => panic!("expected name validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_wrong_types_name_the_field() {
        let cases = [
            (json!({"name": "X", "properties": "sharp"}), "properties"),
            (json!({"name": "X", "properties": ["ok", 3]}), "properties"),
            (json!({"name": "X", "requires_attunement": "yes"}), "requires_attunement"),
            (json!({"name": 12}), "name"),
        ];
        for (data, expected) in cases {
            match MagicItem::from_generated(&object(data), &advanced_defaults()) {
                Err(ForgeError::Validation { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected validation error on {}, got {:?}", expected, other),
            }
        }
    }

    #[test]
    fn test_saved_item_tolerates_missing_keys() {
        let item: MagicItem = serde_json::from_str(r#"{"name": "Old Relic"}"#).unwrap();
        assert_eq!(item.name, "Old Relic");
        assert!(item.properties.is_empty());
    }
}
