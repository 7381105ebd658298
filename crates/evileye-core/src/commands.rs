//! Player commands sent from the UI collaborator to the simulation.
//!
//! Commands are queued and applied at the next tick boundary.

use serde::{Deserialize, Serialize};

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Economy ---
    /// Buy the next level of an upgrade category, by identifier
    /// (`"damage"`, `"fireRate"`, `"bullet_size"`, ...).
    PurchaseUpgrade { category: String },
    /// Repair the base between waves.
    Heal,

    // --- Waves ---
    /// Start the current wave.
    StartWave,
    /// Automatically start the next wave after a short delay.
    SetAutoStart { enabled: bool },

    // --- Simulation control ---
    /// Suspend or resume the simulation phase.
    TogglePause,

    // --- Dev tools ---
    /// Open or close the dev menu.
    ToggleDevMenu,
    /// Dev menu hotkey `'1'..='6'`. Ignored while the menu is closed.
    DevKey { key: char },
}

/// Dev menu actions, keyed 1 through 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DevAction {
    AddMoney,
    AddMoreMoney,
    MaxUpgrades,
    SkipWave,
    KillAllEnemies,
    FullHeal,
}

impl DevAction {
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            '1' => Some(Self::AddMoney),
            '2' => Some(Self::AddMoreMoney),
            '3' => Some(Self::MaxUpgrades),
            '4' => Some(Self::SkipWave),
            '5' => Some(Self::KillAllEnemies),
            '6' => Some(Self::FullHeal),
            _ => None,
        }
    }
}
