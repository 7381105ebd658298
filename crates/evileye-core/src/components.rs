//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

/// Hostile homing toward the base. Paired with a `Position` component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    /// Spawn order. Stable iteration key for hit tests and targeting.
    pub serial: u64,
    /// Wave number at spawn. Fixes the enemy's scaling for its lifetime.
    pub wave: u32,
    pub kind: EnemyKind,
    /// Movement speed toward the base (px/tick).
    pub speed: f64,
    /// Current health. May go negative; death is detected, not clamped.
    pub health: f64,
    pub max_health: f64,
    /// Base damage dealt on reaching the base.
    pub damage: u32,
    /// Money paid out on kill.
    pub reward: u64,
    /// Knockback impulse (px/tick), decays every tick.
    pub knockback: DVec2,
    /// Terminal: the enemy touched the base this tick.
    pub reached_base: bool,
}

impl Enemy {
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

/// Ballistic shot. Paired with `Position` and `Velocity` components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    /// Creation order.
    pub serial: u64,
    pub source: EmitterKind,
    pub damage: f64,
    /// Enemies this projectile may still damage.
    pub pierce_remaining: u32,
    /// Collision radius (px).
    pub hit_radius: f64,
    /// Emitter position at launch. Knockback pushes away from this point.
    pub origin: Position,
    /// Serials of enemies already struck.
    pub hits: Vec<u64>,
    /// Set once the piercing budget is exhausted or the shot left the field.
    pub spent: bool,
}

/// Explosion debris. Paired with `Position` and `Velocity` components.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    /// Remaining life in `[0, 1]`.
    pub life: f64,
    /// Life lost per tick.
    pub decay: f64,
    pub size: f64,
}
