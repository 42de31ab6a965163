//! # Power Balance
//!
//! Deterministic power scoring for magic items.
//!
//! ```text
//! Power Score = max(0, [(ΔDPR × A × U) + D + C] × R − (Kₐ + Kₙ))
//! ```
//!
//! - ΔDPR: damage per round increase
//! - A: action economy multiplier
//! - U: usage multiplier
//! - D: defensive power
//! - C: control/utility power
//! - R: reliability multiplier
//! - Kₐ: structural constraints (attunement, restrictions)
//! - Kₙ: negative effects (curses, drawbacks)
//!
//! Every component is a pure function of the parameters. The score, its details and
//! the balance verdict all come from one [`PowerBreakdown`].

use super::{ActionEconomy, LootParameters, Rarity, UsageLimit};
use serde::{Deserialize, Serialize};

/// ΔDPR per point of attack bonus.
pub const ATTACK_BONUS_DPR: f64 = 1.0;
/// ΔDPR per point of damage bonus, assuming roughly half the attacks hit.
pub const DAMAGE_BONUS_DPR: f64 = 0.5;
/// ΔDPR per spell level of an active effect.
pub const SPELL_LEVEL_DPR: f64 = 1.5;

pub const RELIABILITY_AUTOMATIC: f64 = 1.0;
pub const RELIABILITY_ATTACK_ROLL: f64 = 0.65;
pub const RELIABILITY_SAVE_DC: f64 = 0.6;

pub const AC_BONUS_VALUE: f64 = 2.0;
pub const RESISTANCE_VALUE: f64 = 3.0;
pub const IMMUNITY_VALUE: f64 = 5.0;

pub const CONDITION_WITH_SAVE: f64 = 2.0;
pub const UTILITY_BASE: f64 = 1.5;

pub const ATTUNEMENT_PENALTY: f64 = 1.0;
pub const CLASS_RESTRICTION_PENALTY: f64 = 0.5;
pub const ALIGNMENT_RESTRICTION_PENALTY: f64 = 0.3;

pub const MINOR_CURSE_PENALTY: f64 = 1.0;
pub const MAJOR_CURSE_PENALTY: f64 = 3.0;
pub const SIDE_EFFECT_PENALTY: f64 = 0.5;

/// Curse descriptions mentioning any of these count as major curses.
pub const MAJOR_CURSE_WORDS: &[&str] = &["death", "kill", "destroy", "permanent"];

/// Charges assumed when a charged item does not say how many.
pub const DEFAULT_MAX_CHARGES: i32 = 7;
/// Uses assumed when a per-rest item does not say how many.
pub const DEFAULT_USES_PER_REST: i32 = 1;

/// Half-open `[min, max)` power range for each rarity.
pub const RARITY_POWER_RANGES: &[(Rarity, f64, f64)] = &[
    (Rarity::Common, 0.0, 2.0),
    (Rarity::Uncommon, 2.0, 5.0),
    (Rarity::Rare, 5.0, 10.0),
    (Rarity::VeryRare, 10.0, 18.0),
    (Rarity::Legendary, 18.0, 30.0),
    (Rarity::Artifact, 30.0, f64::INFINITY),
];

/// Scores above this are Overpowered even for an Artifact.
pub const ARTIFACT_VERDICT_CEILING: f64 = 100.0;

/// Multiplier for the action cost of an active effect.
pub fn action_cost_multiplier(action: ActionEconomy) -> f64 {
    match action {
        ActionEconomy::Free => 1.5,
        ActionEconomy::BonusAction => 1.2,
        ActionEconomy::Reaction => 1.0,
        ActionEconomy::Action => 0.8,
    }
}

/// Base multiplier for a usage limit, before charge and per-rest adjustments.
pub fn base_usage_multiplier(limit: UsageLimit) -> f64 {
    match limit {
        UsageLimit::AtWill => 1.0,
        UsageLimit::PerShortRest => 0.7,
        UsageLimit::PerLongRest => 0.4,
        UsageLimit::Charges => 0.5,
        UsageLimit::SingleUse => 0.1,
    }
}

/// ΔDPR: damage per round increase.
pub fn calculate_dpr(params: &LootParameters) -> f64 {
    let bonuses = &params.passive_bonuses;
    let mut dpr = f64::from(bonuses.attack_bonus) * ATTACK_BONUS_DPR
        + f64::from(bonuses.damage_bonus) * DAMAGE_BONUS_DPR;

    if params.active_effect.enabled {
        if let Some(level) = params.active_effect.spell_level {
            dpr += f64::from(level) * SPELL_LEVEL_DPR;
        }
    }

    dpr
}

/// A: passive triggers beat everything, then the active effect's action cost.
pub fn action_economy_multiplier(params: &LootParameters) -> f64 {
    if params.has_passive_trigger() {
        return action_cost_multiplier(ActionEconomy::Free);
    }
    if params.active_effect.enabled {
        return action_cost_multiplier(params.active_effect.action_economy);
    }
    if params.passive_bonuses.has_numeric_bonus() {
        return action_cost_multiplier(ActionEconomy::Free);
    }
    1.0
}

/// U: at-will is most valuable, single-use least.
pub fn usage_multiplier(params: &LootParameters) -> f64 {
    let limits = &params.usage_limits;
    let base = base_usage_multiplier(limits.limit_type);

    match limits.limit_type {
        UsageLimit::Charges => {
            let charges = limits.max_charges.unwrap_or(DEFAULT_MAX_CHARGES);
            (0.3 + f64::from(charges) * 0.05).min(1.0)
        }
        UsageLimit::PerShortRest | UsageLimit::PerLongRest => {
            let uses = limits.uses_per_rest.unwrap_or(DEFAULT_USES_PER_REST);
            (base + f64::from(uses) * 0.05).min(1.0)
        }
        UsageLimit::AtWill | UsageLimit::SingleUse => base,
    }
}

/// D: AC bonus, resistances and immunities.
pub fn defensive_power(params: &LootParameters) -> f64 {
    let props = &params.additional_properties;
    f64::from(params.passive_bonuses.ac_bonus) * AC_BONUS_VALUE
        + props.resistances.len() as f64 * RESISTANCE_VALUE
        + props.immunities.len() as f64 * IMMUNITY_VALUE
}

/// C: inflicted conditions, save and ability bonuses, spell utility.
pub fn control_utility(params: &LootParameters) -> f64 {
    let mut c = params.additional_properties.conditions_inflicted.len() as f64
        * CONDITION_WITH_SAVE
        + params.passive_bonuses.saving_throw_bonuses.len() as f64 * UTILITY_BASE
        + params.passive_bonuses.ability_bonuses.len() as f64 * UTILITY_BASE;

    if params.active_effect.enabled_spell_name().is_some() {
        c += UTILITY_BASE * 2.0;
    }

    c
}

/// R: automatic bonuses first, then save-based conditions, then active effects.
pub fn reliability_multiplier(params: &LootParameters) -> f64 {
    if params.passive_bonuses.has_numeric_bonus() {
        return RELIABILITY_AUTOMATIC;
    }
    if !params.additional_properties.conditions_inflicted.is_empty() {
        return RELIABILITY_SAVE_DC;
    }
    if params.active_effect.enabled {
        return RELIABILITY_ATTACK_ROLL;
    }
    RELIABILITY_AUTOMATIC
}

/// Kₐ: attunement and class/alignment restrictions.
pub fn structural_constraints(params: &LootParameters) -> f64 {
    let restrictions = &params.restrictions;
    let attunement = if params.requires_attunement {
        ATTUNEMENT_PENALTY
    } else {
        0.0
    };

    attunement
        + restrictions.class_restrictions.len() as f64 * CLASS_RESTRICTION_PENALTY
        + restrictions.alignment_restrictions.len() as f64 * ALIGNMENT_RESTRICTION_PENALTY
}

/// Kₙ: curse severity and side effects.
pub fn negative_effects(params: &LootParameters) -> f64 {
    let restrictions = &params.restrictions;
    let mut kn = 0.0;

    if restrictions.has_curse {
        let description = restrictions
            .curse_description
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        kn += if MAJOR_CURSE_WORDS.iter().any(|w| description.contains(w)) {
            MAJOR_CURSE_PENALTY
        } else {
            MINOR_CURSE_PENALTY
        };
    }

    kn + restrictions.side_effects.len() as f64 * SIDE_EFFECT_PENALTY
}

/// All formula components for one set of parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerBreakdown {
    pub dpr: f64,
    pub action_economy: f64,
    pub usage: f64,
    pub defensive: f64,
    pub control_utility: f64,
    pub reliability: f64,
    pub constraints: f64,
    pub negative_effects: f64,
}

impl PowerBreakdown {
    /// Evaluates every component.
    pub fn compute(params: &LootParameters) -> Self {
        Self {
            dpr: calculate_dpr(params),
            action_economy: action_economy_multiplier(params),
            usage: usage_multiplier(params),
            defensive: defensive_power(params),
            control_utility: control_utility(params),
            reliability: reliability_multiplier(params),
            constraints: structural_constraints(params),
            negative_effects: negative_effects(params),
        }
    }

    /// Combines the components; never negative.
    pub fn power_score(&self) -> f64 {
        let raw = (self.dpr * self.action_economy * self.usage + self.defensive + self.control_utility)
            * self.reliability
            - (self.constraints + self.negative_effects);
        raw.max(0.0)
    }

    /// Rounded components plus the final score and suggested rarity.
    pub fn details(&self) -> PowerDetails {
        let score = self.power_score();
        PowerDetails {
            dpr: round2(self.dpr),
            action_economy: round2(self.action_economy),
            usage: round2(self.usage),
            defensive: round2(self.defensive),
            control_utility: round2(self.control_utility),
            reliability: round2(self.reliability),
            constraints: round2(self.constraints),
            negative_effects: round2(self.negative_effects),
            power_score: round2(score),
            suggested_rarity: suggested_rarity(score),
        }
    }
}

/// Display-ready breakdown, every value rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerDetails {
    pub dpr: f64,
    pub action_economy: f64,
    pub usage: f64,
    pub defensive: f64,
    pub control_utility: f64,
    pub reliability: f64,
    pub constraints: f64,
    pub negative_effects: f64,
    pub power_score: f64,
    pub suggested_rarity: Rarity,
}

/// How a score compares with the selected rarity's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceVerdict {
    Underpowered,
    Balanced,
    Overpowered,
}

impl std::fmt::Display for BalanceVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BalanceVerdict::Underpowered => "Underpowered",
            BalanceVerdict::Balanced => "Balanced",
            BalanceVerdict::Overpowered => "Overpowered",
        };
        f.write_str(label)
    }
}

/// Calculates the total power score.
///
/// # Examples
///
/// ```
/// use encounter_forge::{power_score, LootParameters, TriggerType};
///
/// let mut params = LootParameters::default();
/// params.passive_bonuses.attack_bonus = 2;
/// params.passive_bonuses.damage_bonus = 1;
/// params.triggers.push(TriggerType::AlwaysActive);
/// assert_eq!(power_score(&params), 3.75);
/// ```
pub fn power_score(params: &LootParameters) -> f64 {
    PowerBreakdown::compute(params).power_score()
}

/// Detailed breakdown of the power score.
pub fn power_details(params: &LootParameters) -> PowerDetails {
    PowerBreakdown::compute(params).details()
}

/// The rarity whose range contains the score. Anything beyond the table is an artifact.
pub fn suggested_rarity(power_score: f64) -> Rarity {
    RARITY_POWER_RANGES
        .iter()
        .find(|(_, min, max)| *min <= power_score && power_score < *max)
        .map(|(rarity, _, _)| *rarity)
        .unwrap_or(Rarity::Artifact)
}

/// The `[min, max)` power range of a rarity.
pub fn rarity_power_range(rarity: Rarity) -> (f64, f64) {
    RARITY_POWER_RANGES
        .iter()
        .find(|(r, _, _)| *r == rarity)
        .map(|(_, min, max)| (*min, *max))
        .unwrap_or((0.0, f64::INFINITY))
}

/// Compares the item's score with the range of its selected rarity.
pub fn balance_verdict(params: &LootParameters) -> BalanceVerdict {
    verdict_for(power_score(params), params.rarity)
}

/// The inclusive `[min, max]` range a score must fall in to be Balanced for a
/// rarity. Same as [`rarity_power_range`] except that Artifact is capped.
pub fn verdict_range(rarity: Rarity) -> (f64, f64) {
    let (min, max) = rarity_power_range(rarity);
    (min, max.min(ARTIFACT_VERDICT_CEILING))
}

/// Compares a score with the verdict range of a rarity.
pub fn verdict_for(score: f64, rarity: Rarity) -> BalanceVerdict {
    let (min, max) = verdict_range(rarity);
    if score < min {
        BalanceVerdict::Underpowered
    } else if score > max {
        BalanceVerdict::Overpowered
    } else {
        BalanceVerdict::Balanced
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TriggerType;

    fn passive_sword() -> LootParameters {
        let mut params = LootParameters::default();
        params.passive_bonuses.attack_bonus = 2;
        params.passive_bonuses.damage_bonus = 1;
        params.triggers.push(TriggerType::AlwaysActive);
        params
    }

    #[test]
    fn test_passive_sword_scenario() {
        let params = passive_sword();
        let b = PowerBreakdown::compute(&params);
        assert_eq!(b.dpr, 2.5);
        assert_eq!(b.action_economy, 1.5);
        assert_eq!(b.usage, 1.0);
        assert_eq!(b.defensive, 0.0);
        assert_eq!(b.control_utility, 0.0);
        assert_eq!(b.reliability, 1.0);
        assert_eq!(b.constraints, 0.0);
        assert_eq!(b.negative_effects, 0.0);
        assert_eq!(b.power_score(), 3.75);
        assert_eq!(suggested_rarity(b.power_score()), Rarity::Uncommon);
    }

    #[test]
    fn test_empty_params_score_zero() {
        let params = LootParameters::default();
        assert_eq!(power_score(&params), 0.0);
        assert_eq!(action_economy_multiplier(&params), 1.0);
        assert_eq!(reliability_multiplier(&params), 1.0);
        assert_eq!(power_details(&params).suggested_rarity, Rarity::Common);
    }

    #[test]
    fn test_spell_level_adds_dpr_only_when_enabled() {
        let mut params = LootParameters::default();
        params.active_effect.spell_level = Some(3);
        assert_eq!(calculate_dpr(&params), 0.0);
        params.active_effect.enabled = true;
        assert_eq!(calculate_dpr(&params), 4.5);
    }

    #[test]
    fn test_action_economy_precedence() {
        let mut params = LootParameters::default();
        params.active_effect.enabled = true;
        params.active_effect.action_economy = ActionEconomy::Action;
        assert_eq!(action_economy_multiplier(&params), 0.8);

        params.active_effect.action_economy = ActionEconomy::BonusAction;
        assert_eq!(action_economy_multiplier(&params), 1.2);

        // A passive trigger wins over any action cost
        params.triggers.push(TriggerType::WhenHit);
        assert_eq!(action_economy_multiplier(&params), 1.5);

        // Non-passive triggers do not count
        let mut params = LootParameters::default();
        params.triggers.push(TriggerType::AtDawn);
        params.passive_bonuses.ac_bonus = 1;
        assert_eq!(action_economy_multiplier(&params), 1.5);
        params.passive_bonuses.ac_bonus = 0;
        assert_eq!(action_economy_multiplier(&params), 1.0);
    }

    #[test]
    fn test_usage_multipliers() {
        let mut params = LootParameters::default();

        params.usage_limits.limit_type = UsageLimit::SingleUse;
        assert_eq!(usage_multiplier(&params), 0.1);

        params.usage_limits.limit_type = UsageLimit::Charges;
        assert!((usage_multiplier(&params) - 0.65).abs() < 1e-9);
        params.usage_limits.max_charges = Some(20);
        assert_eq!(usage_multiplier(&params), 1.0);

        params.usage_limits.limit_type = UsageLimit::PerLongRest;
        assert!((usage_multiplier(&params) - 0.45).abs() < 1e-9);
        params.usage_limits.uses_per_rest = Some(3);
        assert!((usage_multiplier(&params) - 0.55).abs() < 1e-9);

        params.usage_limits.limit_type = UsageLimit::PerShortRest;
        params.usage_limits.uses_per_rest = Some(10);
        assert_eq!(usage_multiplier(&params), 1.0);
    }

    #[test]
    fn test_defensive_and_control() {
        let mut params = LootParameters::default();
        params.passive_bonuses.ac_bonus = 1;
        params.additional_properties.resistances = vec!["fire".into(), "cold".into()];
        params.additional_properties.immunities = vec!["poison".into()];
        assert_eq!(defensive_power(&params), 13.0);

        params.additional_properties.conditions_inflicted = vec!["Frightened".into()];
        params.passive_bonuses.saving_throw_bonuses = vec!["+1 WIS saves".into()];
        params.passive_bonuses.ability_bonuses = vec!["+2 STR".into()];
        assert_eq!(control_utility(&params), 5.0);

        params.active_effect.enabled = true;
        params.active_effect.spell_name = Some("Fear".into());
        assert_eq!(control_utility(&params), 8.0);
    }

    #[test]
    fn test_reliability_precedence() {
        let mut params = LootParameters::default();
        params.active_effect.enabled = true;
        assert_eq!(reliability_multiplier(&params), 0.65);

        params.additional_properties.conditions_inflicted = vec!["Prone".into()];
        assert_eq!(reliability_multiplier(&params), 0.6);

        params.passive_bonuses.damage_bonus = 1;
        assert_eq!(reliability_multiplier(&params), 1.0);
    }

    #[test]
    fn test_penalties() {
        let mut params = LootParameters::default();
        params.requires_attunement = true;
        params.restrictions.class_restrictions = vec!["Paladin".into()];
        params.restrictions.alignment_restrictions = vec!["Lawful Good".into()];
        assert!((structural_constraints(&params) - 1.8).abs() < 1e-9);

        params.restrictions.has_curse = true;
        assert_eq!(negative_effects(&params), 1.0);
        params.restrictions.curse_description = Some("Causes PERMANENT blindness".into());
        assert_eq!(negative_effects(&params), 3.0);
        params.restrictions.side_effects = vec!["glows".into(), "hums".into()];
        assert_eq!(negative_effects(&params), 4.0);

        // A curse description without the curse flag costs nothing
        params.restrictions.has_curse = false;
        assert_eq!(negative_effects(&params), 1.0);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let mut params = LootParameters::default();
        params.requires_attunement = true;
        params.restrictions.has_curse = true;
        assert_eq!(power_score(&params), 0.0);
    }

    #[test]
    fn test_suggested_rarity_boundaries() {
        assert_eq!(suggested_rarity(0.0), Rarity::Common);
        assert_eq!(suggested_rarity(1.99), Rarity::Common);
        assert_eq!(suggested_rarity(2.0), Rarity::Uncommon);
        assert_eq!(suggested_rarity(5.0), Rarity::Rare);
        assert_eq!(suggested_rarity(10.0), Rarity::VeryRare);
        assert_eq!(suggested_rarity(18.0), Rarity::Legendary);
        assert_eq!(suggested_rarity(30.0), Rarity::Artifact);
        assert_eq!(suggested_rarity(250.0), Rarity::Artifact);
        assert_eq!(suggested_rarity(f64::NAN), Rarity::Artifact);
    }

    #[test]
    fn test_details_match_breakdown() {
        let mut params = passive_sword();
        params.usage_limits.limit_type = UsageLimit::PerLongRest;
        params.restrictions.alignment_restrictions = vec!["Chaotic".into()];

        let breakdown = PowerBreakdown::compute(&params);
        let details = power_details(&params);
        assert_eq!(details.power_score, round2(power_score(&params)));
        assert_eq!(details.usage, round2(breakdown.usage));
        assert_eq!(details.constraints, 0.3);
        assert_eq!(details.suggested_rarity, suggested_rarity(power_score(&params)));
    }

    #[test]
    fn test_score_is_deterministic() {
        let mut params = passive_sword();
        params.active_effect.enabled = true;
        params.active_effect.spell_level = Some(5);
        params.usage_limits.limit_type = UsageLimit::Charges;
        let first = power_score(&params);
        let second = power_score(&params);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_balance_verdict() {
        let mut params = passive_sword();
        params.rarity = Rarity::Uncommon;
        assert_eq!(balance_verdict(&params), BalanceVerdict::Balanced);
        params.rarity = Rarity::Rare;
        assert_eq!(balance_verdict(&params), BalanceVerdict::Underpowered);
        params.rarity = Rarity::Common;
        assert_eq!(balance_verdict(&params), BalanceVerdict::Overpowered);
        assert_eq!(verdict_for(29.9, Rarity::Artifact), BalanceVerdict::Underpowered);
        assert_eq!(verdict_for(100.0, Rarity::Artifact), BalanceVerdict::Balanced);
        assert_eq!(verdict_for(500.0, Rarity::Artifact), BalanceVerdict::Overpowered);
        assert_eq!(suggested_rarity(500.0), Rarity::Artifact);
    }
}
