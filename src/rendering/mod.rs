//! # Rendering Module
//!
//! Plain-text rendering for terminal output, with optional ANSI colors for
//! hit-point bands.

pub mod display;
pub mod ui;

pub use display::*;
pub use ui::*;
