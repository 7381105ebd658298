//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Convert a millisecond duration into whole ticks, rounding up.
pub fn ms_to_ticks(ms: f64) -> u64 {
    if ms <= 0.0 {
        return 0;
    }
    (ms * TICK_RATE as f64 / 1000.0).ceil() as u64
}

// --- Play-field ---

/// Logical play-field width (px). Bounds tests use this regardless of display size.
pub const FIELD_WIDTH: f64 = 800.0;

/// Logical play-field height (px).
pub const FIELD_HEIGHT: f64 = 600.0;

/// Base center (the middle of the field).
pub const BASE_X: f64 = FIELD_WIDTH / 2.0;
pub const BASE_Y: f64 = FIELD_HEIGHT / 2.0;

/// Base radius (px).
pub const BASE_RADIUS: f64 = 30.0;

/// Extra slack added to the base radius for the reach test.
pub const BASE_REACH_MARGIN: f64 = 5.0;

// --- Economy ---

pub const INITIAL_HEALTH: u32 = 100;
pub const MAX_HEALTH: u32 = 100;
pub const INITIAL_MONEY: u64 = 500;
pub const INITIAL_WAVE: u32 = 1;

pub const HEAL_COST: u64 = 50;
pub const HEAL_AMOUNT: u32 = 50;

/// Completion bonus base and growth: floor(150 * 1.2^(wave - 1)).
pub const WAVE_BONUS_BASE: f64 = 150.0;
pub const WAVE_BONUS_GROWTH: f64 = 1.2;

// --- Turret ---

pub const TURRET_BASE_DAMAGE: f64 = 25.0;
pub const TURRET_BASE_RANGE: f64 = 200.0;
pub const TURRET_BASE_FIRE_RATE_MS: f64 = 1200.0;
pub const TURRET_BASE_BULLET_SPEED: f64 = 5.0;
pub const TURRET_BASE_KNOCKBACK: f64 = 0.0;
pub const TURRET_BASE_BULLET_SIZE: f64 = 1.0;
/// Visual size of the turret. Never changed by upgrades.
pub const TURRET_BASE_RADIUS: f64 = 15.0;

/// Fire-rate floor. Fury upgrades never push the cooldown below this.
pub const MIN_FIRE_RATE_MS: f64 = 50.0;

// --- Emitters ---

/// Primary turret turn speed (rad/tick).
pub const PRIMARY_TURN_SPEED: f64 = 0.15;

/// Satellite emitter turn speed (rad/tick).
pub const SATELLITE_TURN_SPEED: f64 = 0.2;

/// Satellite orbit radius around the primary (px).
pub const SATELLITE_ORBIT_RADIUS: f64 = 40.0;

/// Pentagonal slot count used for satellite placement.
pub const SATELLITE_SLOTS: usize = 5;

/// Satellite shots deal this fraction of turret damage.
pub const SATELLITE_DAMAGE_FACTOR: f64 = 0.5;

/// Angular error below which an emitter may fire (radians, 30°).
pub const AIM_THRESHOLD: f64 = std::f64::consts::PI / 6.0;

/// Angular error at which accuracy reaches zero before flooring (60°).
pub const ACCURACY_FALLOFF: f64 = std::f64::consts::PI / 3.0;

/// Lowest accuracy a shot can have.
pub const MIN_ACCURACY: f64 = 0.1;

/// Half-width of the launch jitter cone at accuracy 0 (45°).
pub const MAX_JITTER: f64 = std::f64::consts::PI / 4.0;

// --- Projectiles ---

/// Collision radius at bullet-size multiplier 1.0 (px).
pub const PROJECTILE_HIT_RADIUS: f64 = 10.0;

/// Extra pierces granted per unit of bullet-size multiplier above 1.0.
pub const PIERCE_PER_SIZE: f64 = 2.0;

// --- Enemies ---

pub const ENEMY_BASE_SPEED: f64 = 0.8;
pub const ENEMY_BASE_HEALTH: f64 = 50.0;
pub const ENEMY_BASE_DAMAGE: f64 = 12.0;
pub const ENEMY_BASE_REWARD: f64 = 12.0;

/// Knockback velocity multiplier applied every enemy tick.
pub const KNOCKBACK_DECAY: f64 = 0.85;

/// Knockback below this magnitude is zeroed (px/tick).
pub const KNOCKBACK_EPSILON: f64 = 0.01;

// --- Waves ---

/// Delay between individual enemy spawns (ms).
pub const SPAWN_INTERVAL_MS: f64 = 800.0;

/// Delay before an auto-started wave begins (ms).
pub const AUTO_START_DELAY_MS: f64 = 2000.0;

// --- Particles ---

/// Explosion particles spawned when a projectile is removed.
pub const PARTICLES_PER_EXPLOSION: usize = 8;

/// Max per-axis particle speed (px/tick).
pub const PARTICLE_MAX_SPEED: f64 = 2.0;

pub const PARTICLE_DECAY: f64 = 0.02;
pub const PARTICLE_SHRINK: f64 = 0.98;
pub const PARTICLE_MIN_SIZE: f64 = 0.1;

// --- Effects ---

/// Peak shake magnitude of a single hit (px).
pub const SHAKE_PULSE: f64 = 3.0;

/// Additional magnitude for each stacked hit within a live pulse.
pub const SHAKE_STACK: f64 = 1.0;

/// Shake magnitude ceiling (px).
pub const SHAKE_MAX: f64 = 12.0;

/// Shake duration (ticks).
pub const SHAKE_DURATION_TICKS: u32 = 12;

pub const WAVE_COMPLETE_POPUP_TICKS: u32 = 120;
pub const GAME_OVER_POPUP_TICKS: u32 = 180;

/// Fraction of a popup's lifetime spent fading in.
pub const POPUP_FADE_IN: f64 = 0.15;

/// Fraction of a popup's lifetime spent fading out.
pub const POPUP_FADE_OUT: f64 = 0.25;

// --- Dev menu ---

pub const DEV_SMALL_GRANT: u64 = 1000;
pub const DEV_LARGE_GRANT: u64 = 10_000;

/// Levels granted to each infinite category by the "max upgrades" dev key.
pub const DEV_INFINITE_LEVELS: u32 = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_ticks_rounds_up() {
        assert_eq!(ms_to_ticks(800.0), 48);
        assert_eq!(ms_to_ticks(1200.0), 72);
        assert_eq!(ms_to_ticks(50.0), 3);
        assert_eq!(ms_to_ticks(10.0), 1);
        assert_eq!(ms_to_ticks(0.0), 0);
    }
}
