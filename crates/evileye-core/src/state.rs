//! Game state snapshot, the complete visible state handed to the renderer each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{Alert, GameEvent};
use crate::types::{Position, SimTime};
use crate::upgrades::{TurretStats, UpgradeCategory};

/// Complete game state published after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub wave: u32,
    pub health: u32,
    pub max_health: u32,
    pub money: u64,
    /// Enemies of the current wave not yet spawned.
    pub enemies_left_to_spawn: u32,
    pub enemies_alive: u32,
    pub game_running: bool,
    pub paused: bool,
    pub dev_menu_open: bool,
    pub auto_start: bool,
    /// Ticks until an auto-started wave begins, if one is scheduled.
    pub auto_start_in_ticks: Option<u64>,
    pub heal: HealView,
    pub turret: TurretView,
    pub upgrades: Vec<UpgradeView>,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub particles: Vec<ParticleView>,
    /// Camera offset to apply this frame.
    pub shake_offset: Position,
    pub popups: Vec<PopupView>,
    pub events: Vec<GameEvent>,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealView {
    pub cost: u64,
    pub amount: u32,
    pub available: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurretView {
    pub primary: EmitterView,
    pub satellites: Vec<EmitterView>,
    pub stats: TurretStats,
}

/// One emitter (primary or satellite).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmitterView {
    pub kind: EmitterKind,
    pub position: Position,
    /// Aim angle (radians, from +x toward +y).
    pub rotation: f64,
    pub state: EmitterState,
    /// Serial of the tracked enemy, if any.
    pub target_serial: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeView {
    pub category: UpgradeCategory,
    pub name: String,
    pub level: u32,
    /// `None` once maxed.
    pub cost: Option<u64>,
    pub next_effect: Option<f64>,
    pub description: String,
    pub maxed: bool,
    pub affordable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub serial: u64,
    pub kind: EnemyKind,
    pub wave: u32,
    pub position: Position,
    pub health: f64,
    pub max_health: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub serial: u64,
    pub source: EmitterKind,
    pub position: Position,
    /// Travel direction (radians).
    pub heading: f64,
    /// Collision radius, grows with bullet size.
    pub radius: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleView {
    pub position: Position,
    pub size: f64,
    /// Remaining life, usable as draw alpha.
    pub alpha: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopupView {
    pub kind: PopupKind,
    pub alpha: f64,
    pub scale: f64,
}
