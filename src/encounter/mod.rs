//! # Encounter Module
//!
//! Combat tracking: creatures, initiative, and the turn/round state machine.
//!
//! This module contains:
//! - Creature records with guarded hit points
//! - Initiative rolling and tie-break ordering behind an injectable dice source
//! - The encounter roster with turn advance, retreat, removal and reset
//! - Bulk entry from text and spawning from monster templates

pub mod bestiary;
pub mod creature;
pub mod initiative;
pub mod quick_add;
pub mod state;

pub use bestiary::*;
pub use creature::*;
pub use initiative::*;
pub use quick_add::*;
pub use state::*;
