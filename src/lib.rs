//! # Encounter Forge
//!
//! A tabletop combat tracker and magic item power-balance engine with
//! LLM-assisted item generation.
//!
//! ## Architecture Overview
//!
//! The crate is organized around two cores and the collaborators that feed them:
//!
//! - **Encounter**: creature records, initiative rolling, and the turn/round state machine
//! - **Loot**: typed item parameters, the generated item record, and the deterministic
//!   power-balance scoring engine
//! - **LLDM**: prompt construction, the text-generation seam, and JSON extraction from
//!   free-text replies
//! - **Storage**: whole-file JSON snapshots keyed by name
//! - **Rendering**: plain-text formatting for terminal output
//!
//! Session state is never ambient. Every operation receives the [`Encounter`] or the
//! [`LootParameters`] it works on, and every random draw goes through a caller-supplied
//! [`DiceRoller`].

pub mod encounter;
pub mod lldm;
pub mod loot;
pub mod rendering;
pub mod storage;

pub use encounter::*;
pub use lldm::*;
pub use loot::*;
pub use rendering::*;
pub use storage::*;

/// Core error type for Encounter Forge.
#[derive(thiserror::Error, Debug)]
pub enum ForgeError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A record violates one of its field invariants
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Required configuration is missing or unusable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The generator replied with text that holds no JSON object
    #[error("Failed to parse generator reply as JSON. Raw reply:\n{raw}")]
    Parse { raw: String },

    /// The external generator call failed
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),
}

impl ForgeError {
    /// Builds a validation error for the named field.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ForgeError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type used throughout the Encounter Forge codebase.
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration constants.
pub mod config {
    /// Directory holding the JSON snapshots
    pub const DEFAULT_DATA_DIR: &str = "data";

    /// Store key for saved encounters
    pub const SAVED_ENCOUNTERS_KEY: &str = "saved_encounters";

    /// Store key for saved magic items
    pub const SAVED_ITEMS_KEY: &str = "saved_items";

    /// Store key for the monster templates
    pub const SRD_MONSTERS_KEY: &str = "srd_monsters";

    /// Name given to a fresh encounter
    pub const DEFAULT_ENCOUNTER_NAME: &str = "New Encounter";

    /// Armor class used when none is given
    pub const DEFAULT_ARMOR_CLASS: i32 = 10;

    /// Text generation model used when none is configured
    pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

    /// Base URL of the text generation service
    pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Seconds to wait on the text generation service
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// The standard 5e conditions offered for creatures.
    pub const CONDITIONS: &[&str] = &[
        "Blinded",
        "Charmed",
        "Deafened",
        "Exhaustion",
        "Frightened",
        "Grappled",
        "Incapacitated",
        "Invisible",
        "Paralyzed",
        "Petrified",
        "Poisoned",
        "Prone",
        "Restrained",
        "Stunned",
        "Unconscious",
    ];
}
