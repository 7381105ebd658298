//! Entity spawn factories for the simulation world.
//!
//! Creates enemies, projectiles and explosion particles with their
//! component bundles.

use glam::DVec2;
use hecs::World;
use rand::Rng;

use evileye_core::components::*;
use evileye_core::constants::*;
use evileye_core::enums::*;
use evileye_core::types::{Position, Velocity};
use evileye_core::upgrades::TurretStats;
use evileye_core::waves::EnemyProfile;

use crate::emitter::{launch_angle, ShotSolution};

/// Random point on one of the four field edges (0 top, 1 right, 2 bottom, 3 left).
pub fn random_edge_position<R: Rng>(rng: &mut R) -> Position {
    match rng.gen_range(0..4) {
        0 => Position::new(rng.gen_range(0.0..FIELD_WIDTH), 0.0),
        1 => Position::new(FIELD_WIDTH, rng.gen_range(0.0..FIELD_HEIGHT)),
        2 => Position::new(rng.gen_range(0.0..FIELD_WIDTH), FIELD_HEIGHT),
        _ => Position::new(0.0, rng.gen_range(0.0..FIELD_HEIGHT)),
    }
}

/// Spawn an enemy for `wave` at a random edge point with a random kind.
pub fn spawn_enemy<R: Rng>(world: &mut World, rng: &mut R, wave: u32, serial: u64) -> (hecs::Entity, EnemyKind) {
    let position = random_edge_position(rng);
    let kind = EnemyKind::ALL[rng.gen_range(0..EnemyKind::ALL.len())];
    (spawn_enemy_at(world, position, wave, serial, kind), kind)
}

/// Spawn an enemy at an explicit position.
pub fn spawn_enemy_at(
    world: &mut World,
    position: Position,
    wave: u32,
    serial: u64,
    kind: EnemyKind,
) -> hecs::Entity {
    let profile = EnemyProfile::for_wave(wave);
    world.spawn((
        Enemy {
            serial,
            wave,
            kind,
            speed: profile.speed,
            health: profile.health,
            max_health: profile.health,
            damage: profile.damage,
            reward: profile.reward,
            knockback: DVec2::ZERO,
            reached_base: false,
        },
        position,
    ))
}

/// Spawn a projectile from a fire solution using the current stats.
pub fn spawn_projectile<R: Rng>(
    world: &mut World,
    rng: &mut R,
    shot: &ShotSolution,
    stats: &TurretStats,
    serial: u64,
) -> hecs::Entity {
    let angle = launch_angle(shot.bearing, shot.accuracy, rng);
    let damage = match shot.source {
        EmitterKind::Primary => stats.damage,
        EmitterKind::Satellite(_) => stats.damage * SATELLITE_DAMAGE_FACTOR,
    };
    world.spawn((
        Projectile {
            serial,
            source: shot.source,
            damage,
            pierce_remaining: stats.pierce_budget(),
            hit_radius: stats.hit_radius(),
            origin: shot.origin,
            hits: Vec::new(),
            spent: false,
        },
        shot.origin,
        Velocity::from_angle(angle, stats.bullet_speed),
    ))
}

/// Burst of debris where a projectile was removed.
pub fn spawn_explosion<R: Rng>(world: &mut World, rng: &mut R, at: Position) {
    for _ in 0..PARTICLES_PER_EXPLOSION {
        let velocity = Velocity::new(
            rng.gen_range(-PARTICLE_MAX_SPEED..PARTICLE_MAX_SPEED),
            rng.gen_range(-PARTICLE_MAX_SPEED..PARTICLE_MAX_SPEED),
        );
        let particle = Particle {
            life: 1.0,
            decay: PARTICLE_DECAY,
            size: rng.gen_range(1.0..4.0),
        };
        world.spawn((particle, at, velocity));
    }
}
