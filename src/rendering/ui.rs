//! # User Interface Elements
//!
//! Health bars and the hit-point color bands.

use crate::Creature;

/// Width of a health bar in characters, brackets excluded.
pub const HEALTH_BAR_WIDTH: usize = 20;

/// Hit-point band, used to color a creature's health.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HpBand {
    /// Above half health
    Healthy,
    /// Above a quarter health
    Wounded,
    /// A quarter or less
    Critical,
}

impl HpBand {
    /// Band for an HP percentage.
    ///
    /// # Examples
    ///
    /// ```
    /// use encounter_forge::HpBand;
    ///
    /// assert_eq!(HpBand::from_percentage(50.5), HpBand::Healthy);
    /// assert_eq!(HpBand::from_percentage(50.0), HpBand::Wounded);
    /// assert_eq!(HpBand::from_percentage(25.0), HpBand::Critical);
    /// ```
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage > 50.0 {
            HpBand::Healthy
        } else if percentage > 25.0 {
            HpBand::Wounded
        } else {
            HpBand::Critical
        }
    }

    pub fn for_creature(creature: &Creature) -> Self {
        Self::from_percentage(creature.hp_percentage())
    }

    /// Color name for the band.
    pub fn color(self) -> &'static str {
        match self {
            HpBand::Healthy => "green",
            HpBand::Wounded => "orange",
            HpBand::Critical => "red",
        }
    }

    /// ANSI escape for the band's color.
    pub fn ansi(self) -> &'static str {
        match self {
            HpBand::Healthy => "\x1b[32m",
            HpBand::Wounded => "\x1b[33m",
            HpBand::Critical => "\x1b[31m",
        }
    }
}

pub const ANSI_RESET: &str = "\x1b[0m";

/// Renders `[######......] 12/20` for a creature.
pub fn health_bar(creature: &Creature, width: usize) -> String {
    let filled = if creature.max_hp() > 0 {
        let ratio = f64::from(creature.current_hp()) / f64::from(creature.max_hp());
        ((ratio * width as f64).round() as usize).min(width)
    } else {
        0
    };

    format!(
        "[{}{}] {}/{}",
        "#".repeat(filled),
        ".".repeat(width - filled),
        creature.current_hp(),
        creature.max_hp()
    )
}

/// Wraps text in the band's color when `color` is set.
pub fn paint(text: &str, band: HpBand, color: bool) -> String {
    if color {
        format!("{}{}{}", band.ansi(), text, ANSI_RESET)
    } else {
        text.to_string()
    }
}
