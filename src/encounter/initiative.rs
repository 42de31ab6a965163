//! # Initiative
//!
//! Initiative rolls and turn ordering.
//!
//! Every random draw goes through a [`DiceRoller`], so production code can pass
//! `rand::thread_rng()` while tests pass a seeded `StdRng` or a scripted roller.

use super::Creature;
use rand::Rng;
use std::cmp::Ordering;

/// Source of dice rolls and tie-break draws.
///
/// Implemented for every [`rand::Rng`].
pub trait DiceRoller {
    /// Rolls a single die with the given number of sides, returning 1..=sides.
    fn roll_die(&mut self, sides: u32) -> u32;

    /// Draws a uniform value in [0, 1) used to order fully tied creatures.
    fn tie_break(&mut self) -> f64;

    /// Rolls a d20.
    fn roll_d20(&mut self) -> i32 {
        self.roll_die(20) as i32
    }
}

impl<R: Rng + ?Sized> DiceRoller for R {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.gen_range(1..=sides.max(1))
    }

    fn tie_break(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Rolls initiative for a creature: d20 plus its initiative modifier.
///
/// # Examples
///
/// ```
/// use encounter_forge::{roll_initiative, Creature};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let rogue = Creature::at_full_health("Rogue", 24, 14).unwrap().with_initiative_modifier(4);
/// let mut rng = StdRng::seed_from_u64(7);
/// let roll = roll_initiative(&rogue, &mut rng);
/// assert!((5..=24).contains(&roll));
/// ```
pub fn roll_initiative<D: DiceRoller + ?Sized>(creature: &Creature, dice: &mut D) -> i32 {
    dice.roll_d20() + creature.initiative_modifier
}

/// Sorts creatures by initiative, highest first.
///
/// Ties are broken by:
/// 1. Higher initiative modifier
/// 2. Players before non-players
/// 3. A fresh random draw per creature, taken on every call
///
/// Fully tied creatures may therefore come back in a different relative order
/// on each call.
pub fn sort_by_initiative<D: DiceRoller + ?Sized>(
    creatures: Vec<Creature>,
    dice: &mut D,
) -> Vec<Creature> {
    let mut keyed: Vec<(f64, Creature)> = creatures
        .into_iter()
        .map(|creature| (dice.tie_break(), creature))
        .collect();

    keyed.sort_by(|(key_a, a), (key_b, b)| {
        initiative_order(a, b).then_with(|| key_a.total_cmp(key_b))
    });

    keyed.into_iter().map(|(_, creature)| creature).collect()
}

/// Deterministic part of the initiative ordering.
fn initiative_order(a: &Creature, b: &Creature) -> Ordering {
    b.initiative
        .cmp(&a.initiative)
        .then_with(|| b.initiative_modifier.cmp(&a.initiative_modifier))
        .then_with(|| b.is_player.cmp(&a.is_player))
}
