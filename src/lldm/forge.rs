//! # Item Forge
//!
//! Prompt, generate, extract, validate.

use super::{build_item_prompt, build_quick_item_prompt, extract_json_object, TextGenerator};
use crate::{ForgeError, ForgeResult, ItemDefaults, LootParameters, MagicItem, QuickLootParameters};

/// Generates magic items through a [`TextGenerator`].
///
/// # Examples
///
/// ```
/// use encounter_forge::{ForgeResult, ItemForge, LootParameters, TextGenerator};
///
/// struct Canned;
///
/// impl TextGenerator for Canned {
///     fn generate(&self, _prompt: &str) -> ForgeResult<String> {
///         Ok(r#"{"name": "Emberfang", "description": "Warm to the touch."}"#.to_string())
///     }
/// }
///
/// let forge = ItemForge::new(Canned);
/// let item = forge.generate_item(&LootParameters::default()).unwrap();
/// assert_eq!(item.name, "Emberfang");
/// ```
pub struct ItemForge<G: TextGenerator> {
    generator: G,
}

impl<G: TextGenerator> ItemForge<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Generates an item matching fully specified parameters.
    pub fn generate_item(&self, params: &LootParameters) -> ForgeResult<MagicItem> {
        log::info!(
            "Generating {} {} ({})",
            params.rarity,
            params.item_subtype,
            params.item_type
        );
        self.forge(&build_item_prompt(params), &ItemDefaults::for_params(params))
    }

    /// Generates an item from only a rarity and a theme.
    pub fn generate_quick_item(&self, params: &QuickLootParameters) -> ForgeResult<MagicItem> {
        log::info!("Generating quick {} item", params.rarity);
        self.forge(
            &build_quick_item_prompt(params),
            &ItemDefaults::for_quick(params),
        )
    }

    fn forge(&self, prompt: &str, defaults: &ItemDefaults) -> ForgeResult<MagicItem> {
        let reply = self.generator.generate(prompt)?;
        let object = extract_json_object(&reply).ok_or_else(|| {
            log::warn!("Generator reply held no JSON object ({} chars)", reply.len());
            ForgeError::Parse { raw: reply.clone() }
        })?;

        let item = MagicItem::from_generated(&object, defaults)?;
        log::debug!("Generated item '{}'", item.name);
        Ok(item)
    }
}
