//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Cosmetic enemy variety. Chosen uniformly at spawn; has no gameplay effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    #[default]
    Imp,
    Cacodemon,
    Pinky,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Imp, EnemyKind::Cacodemon, EnemyKind::Pinky];
}

/// Which emitter produced a shot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmitterKind {
    #[default]
    Primary,
    /// Satellite in the given pentagonal slot.
    Satellite(u8),
}

/// Targeting state of a single emitter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmitterState {
    /// No target in range.
    #[default]
    Idle,
    /// Target acquired, still rotating or cooling down.
    Tracking,
    /// Angular error under the aim threshold and cooldown elapsed.
    AimedReady,
}

/// Alert severity level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertLevel {
    #[default]
    Info,
    Warning,
    Critical,
}

/// Timed overlay raised by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PopupKind {
    /// Wave `wave` was cleared and paid `bonus`.
    WaveComplete { wave: u32, bonus: u64 },
    /// Base destroyed on `wave`.
    GameOver { wave: u32 },
}
