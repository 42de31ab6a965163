//! # Prompt Construction
//!
//! Turns loot parameters into generation prompts. Each parameter group gets a
//! section only when it holds something, and every prompt ends with the JSON
//! shape the reply must follow.

use crate::{LootParameters, QuickLootParameters, UsageLimit};

const DESIGNER_ROLE: &str = "You are an expert D&D 5th Edition magic item designer.";

const RESPONSE_FIELDS: &[&str] = &[
    r#"  "requires_attunement": true/false,"#,
    r#"  "attunement_requirement": "Optional requirement like class or alignment, or null","#,
    r#"  "description": "Full mechanical description of the item including all properties and effects","#,
    r#"  "properties": ["List", "of", "individual", "properties"],"#,
    r#"  "curse": "Description of the curse if applicable, or null","#,
    r#"  "lore": "A short paragraph of flavor text about the item's history or origin""#,
];

const RARITY_GUIDELINES: &[&str] = &[
    "- Common: Minor cosmetic or utility effects",
    "- Uncommon: +1 bonuses or simple magical effects",
    "- Rare: +2 bonuses or moderate magical effects, may require attunement",
    "- Very Rare: +3 bonuses or powerful effects, usually requires attunement",
    "- Legendary: Multiple powerful effects, always requires attunement",
    "- Artifact: World-changing power with significant drawbacks",
];

/// Theme used when a quick request leaves it blank.
pub const DEFAULT_QUICK_THEME: &str = "a mysterious and interesting magic item";

/// Accumulates prompt lines, separating sections with a blank line.
#[derive(Default)]
struct PromptBuilder {
    lines: Vec<String>,
}

impl PromptBuilder {
    fn line(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push(text.into());
        self
    }

    fn section(&mut self, heading: &str, body: Vec<String>) -> &mut Self {
        if !body.is_empty() {
            self.line("").line(format!("## {}", heading));
            self.lines.extend(body);
        }
        self
    }

    fn response_format(&mut self, head: &[String]) -> &mut Self {
        self.line("").line("Respond in this exact JSON format:").line("```json").line("{");
        self.lines.extend(head.iter().cloned());
        self.lines.extend(RESPONSE_FIELDS.iter().map(|s| s.to_string()));
        self.line("}").line("```")
    }

    fn finish(&self) -> String {
        self.lines.join("\n")
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Builds the prompt for fully specified generation.
///
/// # Examples
///
/// ```
/// use encounter_forge::{build_item_prompt, LootParameters};
///
/// let mut params = LootParameters::default();
/// params.passive_bonuses.attack_bonus = 1;
/// let prompt = build_item_prompt(&params);
/// assert!(prompt.contains("- +1 to attack rolls"));
/// assert!(!prompt.contains("## Triggers"));
/// ```
pub fn build_item_prompt(params: &LootParameters) -> String {
    let mut prompt = PromptBuilder::default();
    prompt.line(format!(
        "{} Create a unique and balanced magic item based on the following specifications.",
        DESIGNER_ROLE
    ));

    prompt.section(
        "Base Identity",
        vec![
            format!("- Item Type: {}", params.item_type),
            format!("- Subtype: {}", params.item_subtype),
            format!("- Rarity: {}", params.rarity),
            format!("- Requires Attunement: {}", yes_no(params.requires_attunement)),
        ],
    );

    let bonuses = &params.passive_bonuses;
    let mut body = Vec::new();
    if bonuses.attack_bonus > 0 {
        body.push(format!("- +{} to attack rolls", bonuses.attack_bonus));
    }
    if bonuses.damage_bonus > 0 {
        body.push(format!("- +{} to damage", bonuses.damage_bonus));
    }
    if bonuses.ac_bonus > 0 {
        body.push(format!("- +{} to Armor Class", bonuses.ac_bonus));
    }
    body.extend(bonuses.ability_bonuses.iter().map(|b| format!("- {}", b)));
    body.extend(bonuses.saving_throw_bonuses.iter().map(|b| format!("- {}", b)));
    prompt.section("Passive Numerical Bonuses", body);

    let effect = &params.active_effect;
    let mut body = Vec::new();
    if let Some(spell) = effect.enabled_spell_name() {
        body.push(format!("- Spell-like Effect: {}", spell));
        if let Some(level) = effect.spell_level {
            body.push(format!("- Spell Level/Power Tier: {}", level));
        }
        body.push(format!("- Action Economy: {}", effect.action_economy));
        body.push(format!("- Target Type: {}", effect.target_type));
    }
    prompt.section("Active Effects", body);

    let limits = &params.usage_limits;
    let mut body = Vec::new();
    if limits.limit_type != UsageLimit::AtWill {
        body.push(format!("- Limit Type: {}", limits.limit_type));
        if let Some(uses) = limits.uses_per_rest {
            body.push(format!("- Uses: {} per rest", uses));
        }
        if let Some(charges) = limits.max_charges {
            body.push(format!("- Maximum Charges: {}", charges));
        }
        if let Some(regain) = limits.regain_charges.as_deref().filter(|r| !r.is_empty()) {
            body.push(format!("- Charge Regain: {}", regain));
        }
    }
    prompt.section("Usage Limits", body);

    prompt.section(
        "Triggers",
        params.triggers.iter().map(|t| format!("- {}", t)).collect(),
    );

    let props = &params.additional_properties;
    let mut body = Vec::new();
    if let Some(damage_type) = non_empty(&props.damage_type_change) {
        body.push(format!("- Damage Type: {}", damage_type));
    }
    body.extend(props.resistances.iter().map(|r| format!("- Resistance to {}", r)));
    body.extend(props.immunities.iter().map(|i| format!("- Immunity to {}", i)));
    body.extend(props.conditions_inflicted.iter().map(|c| format!("- Can inflict: {}", c)));
    if let Some(visual) = non_empty(&props.visual_effects) {
        body.push(format!("- Visual Theme: {}", visual));
    }
    prompt.section("Additional Properties", body);

    let restrictions = &params.restrictions;
    let mut body: Vec<String> = restrictions
        .class_restrictions
        .iter()
        .map(|c| format!("- Class Restriction: {} only", c))
        .collect();
    body.extend(
        restrictions
            .alignment_restrictions
            .iter()
            .map(|a| format!("- Alignment Restriction: {}", a)),
    );
    if restrictions.has_curse {
        body.push("- This item IS CURSED".to_string());
        if let Some(curse) = non_empty(&restrictions.curse_description) {
            body.push(format!("- Curse Theme: {}", curse));
        }
    }
    body.extend(restrictions.side_effects.iter().map(|s| format!("- Side Effect: {}", s)));
    prompt.section("Restrictions & Costs", body);

    if let Some(keywords) = non_empty(&params.theme_keywords) {
        prompt.line("").line(format!("## Theme/Flavor Keywords: {}", keywords));
    }
    if let Some(notes) = non_empty(&params.power_level_notes) {
        prompt.line("").line(format!("## Power Level Notes: {}", notes));
    }

    prompt
        .line("")
        .line("---")
        .line("")
        .line(
            "Generate a complete magic item with the following structure. Be creative with \
             the name and lore, but ensure the mechanics match the specifications above.",
        )
        .response_format(&[
            r#"  "name": "Creative item name","#.to_string(),
            r#"  "item_type": "The item type","#.to_string(),
            r#"  "subtype": "The subtype","#.to_string(),
            r#"  "rarity": "The rarity","#.to_string(),
        ])
        .line("")
        .line(
            "Ensure the item is balanced for D&D 5th Edition based on its rarity. \
             Make the name evocative and memorable.",
        )
        .finish()
}

/// Builds the prompt for quick generation, leaving type, subtype and mechanics to
/// the generator.
pub fn build_quick_item_prompt(params: &QuickLootParameters) -> String {
    let theme = match params.theme_description.trim() {
        "" => DEFAULT_QUICK_THEME,
        theme => theme,
    };

    let mut prompt = PromptBuilder::default();
    prompt.line(format!(
        "{} Create a unique and balanced magic item based on minimal input.",
        DESIGNER_ROLE
    ));
    prompt.section(
        "Requirements",
        vec![
            format!("- **Rarity:** {}", params.rarity),
            format!("- **Theme/Description:** {}", theme),
        ],
    );
    prompt.section(
        "Your Task",
        [
            "Based on the theme description, decide:",
            "1. What type of item this should be (weapon, armor, ring, wondrous item, potion, scroll, etc.)",
            "2. The specific subtype (longsword, cloak, amulet, etc.)",
            "3. Whether it requires attunement",
            "4. All mechanical properties appropriate for the rarity level",
            "5. Any special effects, bonuses, or abilities",
            "6. Creative name and backstory",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    );
    prompt.section(
        "Rarity Guidelines",
        RARITY_GUIDELINES.iter().map(|s| s.to_string()).collect(),
    );

    prompt
        .line("")
        .line("---")
        .response_format(&[
            r#"  "name": "Creative item name","#.to_string(),
            r#"  "item_type": "The item type (Weapon, Armor, Ring, Wondrous Item, Potion, Scroll)","#
                .to_string(),
            r#"  "subtype": "The specific subtype","#.to_string(),
            format!(r#"  "rarity": "{}","#, params.rarity),
        ])
        .line("")
        .line(
            "Be creative and make the item feel magical and unique while staying balanced \
             for its rarity level.",
        )
        .finish()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
