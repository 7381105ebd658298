//! Events emitted by the simulation for audio and UI feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::upgrades::UpgradeCategory;

/// Gameplay events, drained into the next snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    WaveStarted { wave: u32, enemies: u32 },
    EnemySpawned { serial: u64, kind: EnemyKind },
    EnemyKilled { serial: u64, reward: u64 },
    /// An enemy reached the base.
    BaseHit { serial: u64, damage: u32, health: u32 },
    ProjectileFired { source: EmitterKind, accuracy: f64 },
    ProjectileHit { enemy_serial: u64, damage: f64 },
    WaveComplete { wave: u32, bonus: u64 },
    GameOver { wave: u32 },
    UpgradePurchased {
        category: UpgradeCategory,
        level: u32,
        cost: u64,
    },
    Healed { amount: u32, health: u32 },
}

/// Operator-facing message, e.g. a rejected action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    pub tick: u64,
}
