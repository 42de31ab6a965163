//! # LLDM Module
//!
//! LLM Dungeon Master integration for magic item generation.
//!
//! This module contains:
//! - The [`TextGenerator`] seam and its Gemini-backed implementation
//! - Prompt builders for full and quick generation
//! - JSON extraction from free-text replies
//! - [`ItemForge`], which ties the pieces together

pub mod client;
pub mod extract;
pub mod forge;
pub mod prompt;
pub mod traits;

pub use client::*;
pub use extract::*;
pub use forge::*;
pub use prompt::*;
pub use traits::*;
