//! # Loot Module
//!
//! Magic item design: typed parameters, the generated item record, and the
//! power-balance engine that scores an item against its rarity.

pub mod balance;
pub mod item;
pub mod params;

pub use balance::*;
pub use item::*;
pub use params::*;
