//! # Item Parameters
//!
//! The typed option groups describing a magic item to score or generate.
//!
//! Enum values serialize as their table labels (`"Very Rare"`, `"Bonus Action"`),
//! and every field has a default so partial parameter files load.

use crate::{ForgeError, ForgeResult};
use serde::{Deserialize, Serialize};

/// Declares a closed set of values that serialize, display and parse as labels.
///
/// Parsing ignores case, spaces and punctuation and also accepts the variant name,
/// so `"very-rare"`, `"VeryRare"` and `"Very Rare"` all name the same rarity.
macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every value, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Display label, also used on the wire.
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ForgeError;

            fn from_str(s: &str) -> ForgeResult<Self> {
                let wanted = normalize_label(s);
                $(
                    if normalize_label($label) == wanted
                        || normalize_label(stringify!($variant)) == wanted
                    {
                        return Ok($name::$variant);
                    }
                )+
                Err(ForgeError::validation(
                    stringify!($name),
                    format!("unknown value '{}'", s),
                ))
            }
        }
    };
}

fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

labeled_enum! {
    /// Main item type categories.
    ItemType {
        Weapon => "Weapon",
        Armor => "Armor",
        Ring => "Ring",
        WondrousItem => "Wondrous Item",
        Potion => "Potion",
        Scroll => "Scroll",
    }
}

labeled_enum! {
    /// Specific item subtypes.
    ItemSubtype {
        Longsword => "Longsword",
        Shortsword => "Shortsword",
        Greatsword => "Greatsword",
        Dagger => "Dagger",
        Battleaxe => "Battleaxe",
        Greataxe => "Greataxe",
        Warhammer => "Warhammer",
        Maul => "Maul",
        Spear => "Spear",
        Halberd => "Halberd",
        Longbow => "Longbow",
        Shortbow => "Shortbow",
        Crossbow => "Crossbow",
        Staff => "Staff",
        Mace => "Mace",
        Flail => "Flail",
        Rapier => "Rapier",
        Scimitar => "Scimitar",
        Trident => "Trident",
        PlateArmor => "Plate Armor",
        ChainMail => "Chain Mail",
        ScaleMail => "Scale Mail",
        LeatherArmor => "Leather Armor",
        StuddedLeather => "Studded Leather",
        Shield => "Shield",
        Helmet => "Helmet",
        Gauntlets => "Gauntlets",
        Boots => "Boots",
        Cloak => "Cloak",
        Amulet => "Amulet",
        Belt => "Belt",
        Bracers => "Bracers",
        Circlet => "Circlet",
        Gloves => "Gloves",
        Goggles => "Goggles",
        Hat => "Hat",
        Robe => "Robe",
        Bag => "Bag",
        Cape => "Cape",
        Mantle => "Mantle",
        Ring => "Ring",
        Potion => "Potion",
        Scroll => "Scroll",
    }
}

labeled_enum! {
    /// Item rarity tiers, lowest first.
    Rarity {
        Common => "Common",
        Uncommon => "Uncommon",
        Rare => "Rare",
        VeryRare => "Very Rare",
        Legendary => "Legendary",
        Artifact => "Artifact",
    }
}

labeled_enum! {
    /// Action cost of an active effect.
    ActionEconomy {
        Action => "Action",
        BonusAction => "Bonus Action",
        Reaction => "Reaction",
        Free => "Free Action",
    }
}

labeled_enum! {
    /// Who an active effect targets.
    TargetType {
        SelfOnly => "Self",
        SingleTarget => "Single Target",
        Area => "Area",
        MultipleTargets => "Multiple Targets",
    }
}

labeled_enum! {
    /// How often an item's power can be used.
    UsageLimit {
        AtWill => "At-Will",
        PerLongRest => "Per Long Rest",
        PerShortRest => "Per Short Rest",
        Charges => "Charges",
        SingleUse => "Single Use",
    }
}

labeled_enum! {
    /// Conditions that set off an item's effect.
    TriggerType {
        OnHit => "On Hit",
        WhenHit => "When You Are Hit",
        AtZeroHp => "When You Drop to 0 HP",
        AsReaction => "As a Reaction When...",
        AtDawn => "At Dawn",
        AtDusk => "At Dusk",
        OnCritical => "On Critical Hit",
        AlwaysActive => "Always Active (Passive)",
    }
}

impl Default for ItemType {
    fn default() -> Self {
        ItemType::Weapon
    }
}

impl Default for ItemSubtype {
    fn default() -> Self {
        ItemSubtype::Longsword
    }
}

impl Default for Rarity {
    fn default() -> Self {
        Rarity::Uncommon
    }
}

impl Default for ActionEconomy {
    fn default() -> Self {
        ActionEconomy::Action
    }
}

impl Default for TargetType {
    fn default() -> Self {
        TargetType::SelfOnly
    }
}

impl Default for UsageLimit {
    fn default() -> Self {
        UsageLimit::AtWill
    }
}

impl ItemType {
    /// Subtypes that belong to this item type.
    pub fn subtypes(self) -> &'static [ItemSubtype] {
        use ItemSubtype::*;
        match self {
            ItemType::Weapon => &[
                Longsword, Shortsword, Greatsword, Dagger, Battleaxe, Greataxe, Warhammer,
                Maul, Spear, Halberd, Longbow, Shortbow, Crossbow, Staff, Mace, Flail, Rapier,
                Scimitar, Trident,
            ],
            ItemType::Armor => &[
                PlateArmor,
                ChainMail,
                ScaleMail,
                LeatherArmor,
                StuddedLeather,
                Shield,
                Helmet,
                Gauntlets,
                Boots,
            ],
            ItemType::Ring => &[Ring],
            ItemType::WondrousItem => &[
                Cloak, Amulet, Belt, Bracers, Circlet, Gloves, Goggles, Hat, Robe, Bag, Cape,
                Mantle,
            ],
            ItemType::Potion => &[Potion],
            ItemType::Scroll => &[Scroll],
        }
    }
}

impl ItemSubtype {
    /// The item type this subtype belongs to.
    pub fn item_type(self) -> ItemType {
        ItemType::ALL
            .iter()
            .copied()
            .find(|t| t.subtypes().contains(&self))
            .unwrap_or_default()
    }
}

/// Passive numerical bonuses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassiveBonuses {
    /// Bonus to attack rolls, 0..=3
    pub attack_bonus: i32,
    /// Bonus to damage rolls, 0..=3
    pub damage_bonus: i32,
    /// Bonus to armor class, 0..=3
    pub ac_bonus: i32,
    /// Free-text ability bonuses, e.g. "+2 STR"
    pub ability_bonuses: Vec<String>,
    pub saving_throw_bonuses: Vec<String>,
}

impl PassiveBonuses {
    /// Whether any of the attack, damage or AC bonuses is nonzero.
    pub fn has_numeric_bonus(&self) -> bool {
        self.attack_bonus > 0 || self.damage_bonus > 0 || self.ac_bonus > 0
    }
}

/// An active, spell-like effect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActiveEffect {
    pub enabled: bool,
    pub spell_name: Option<String>,
    /// Spell level, 1..=9
    pub spell_level: Option<i32>,
    pub action_economy: ActionEconomy,
    pub target_type: TargetType,
}

impl ActiveEffect {
    /// The spell name when the effect is enabled and the name is non-empty.
    pub fn enabled_spell_name(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.spell_name.as_deref().filter(|name| !name.is_empty())
    }
}

/// Usage limitation policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageLimits {
    pub limit_type: UsageLimit,
    /// Uses per rest, 1..=10
    pub uses_per_rest: Option<i32>,
    /// Maximum charges, 1..=20
    pub max_charges: Option<i32>,
    /// Recharge rule, e.g. "1d6+1 at dawn"
    pub regain_charges: Option<String>,
}

/// Resistances, immunities and other extra properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditionalProperties {
    pub damage_type_change: Option<String>,
    pub resistances: Vec<String>,
    pub immunities: Vec<String>,
    pub conditions_inflicted: Vec<String>,
    pub visual_effects: Option<String>,
}

/// Restrictions and costs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Restrictions {
    pub class_restrictions: Vec<String>,
    pub alignment_restrictions: Vec<String>,
    pub has_curse: bool,
    pub curse_description: Option<String>,
    pub side_effects: Vec<String>,
}

/// Complete parameters for scoring or generating a magic item.
///
/// # Examples
///
/// ```
/// use encounter_forge::{LootParameters, Rarity};
///
/// let params = LootParameters::from_json(r#"{"rarity": "Very Rare"}"#).unwrap();
/// assert_eq!(params.rarity, Rarity::VeryRare);
/// assert_eq!(params.passive_bonuses.attack_bonus, 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootParameters {
    pub item_type: ItemType,
    pub item_subtype: ItemSubtype,
    pub rarity: Rarity,
    pub requires_attunement: bool,
    pub passive_bonuses: PassiveBonuses,
    pub active_effect: ActiveEffect,
    pub usage_limits: UsageLimits,
    pub triggers: Vec<TriggerType>,
    pub additional_properties: AdditionalProperties,
    pub restrictions: Restrictions,
    /// Flavor keywords for the generator, e.g. "fire, phoenix, rebirth"
    pub theme_keywords: Option<String>,
    pub power_level_notes: Option<String>,
}

impl LootParameters {
    /// Parses parameters from JSON and checks their numeric ranges.
    pub fn from_json(json: &str) -> ForgeResult<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Checks the per-field numeric ranges.
    pub fn validate(&self) -> ForgeResult<()> {
        let bonuses = &self.passive_bonuses;
        check_range("passive_bonuses.attack_bonus", bonuses.attack_bonus, 0, 3)?;
        check_range("passive_bonuses.damage_bonus", bonuses.damage_bonus, 0, 3)?;
        check_range("passive_bonuses.ac_bonus", bonuses.ac_bonus, 0, 3)?;

        if let Some(level) = self.active_effect.spell_level {
            check_range("active_effect.spell_level", level, 1, 9)?;
        }
        if let Some(uses) = self.usage_limits.uses_per_rest {
            check_range("usage_limits.uses_per_rest", uses, 1, 10)?;
        }
        if let Some(charges) = self.usage_limits.max_charges {
            check_range("usage_limits.max_charges", charges, 1, 20)?;
        }

        Ok(())
    }

    /// Whether any trigger makes the item work without spending an action.
    pub fn has_passive_trigger(&self) -> bool {
        self.triggers.iter().any(|t| {
            matches!(
                t,
                TriggerType::AlwaysActive | TriggerType::OnHit | TriggerType::WhenHit
            )
        })
    }
}

fn check_range(field: &str, value: i32, min: i32, max: i32) -> ForgeResult<()> {
    if value < min || value > max {
        return Err(ForgeError::validation(
            field,
            format!("{} is outside {}..={}", value, min, max),
        ));
    }
    Ok(())
}

/// Reduced parameters for quick generation: the generator decides everything
/// beyond rarity and theme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuickLootParameters {
    pub rarity: Rarity,
    /// What kind of item is wanted, e.g. "fire sword for a paladin"
    pub theme_description: String,
}
