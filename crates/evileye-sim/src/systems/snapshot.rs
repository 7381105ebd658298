//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only. It never modifies the world.

use hecs::World;

use evileye_core::components::*;
use evileye_core::constants::{HEAL_AMOUNT, HEAL_COST, MAX_HEALTH};
use evileye_core::events::{Alert, GameEvent};
use evileye_core::state::*;
use evileye_core::types::{Position, SimTime, Velocity};
use evileye_core::upgrades::{StatModel, UpgradeCategory};
use evileye_core::waves::WaveState;

use crate::effects::Effects;
use crate::emitter::{Emitter, Turret};

/// Engine flags that are not part of the world or the wave state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlFlags {
    pub paused: bool,
    pub dev_menu_open: bool,
    pub auto_start: bool,
    pub auto_start_in_ticks: Option<u64>,
}

/// Build a complete GameStateSnapshot from the current world state.
#[allow(clippy::too_many_arguments)]
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    wave: &WaveState,
    upgrades: &StatModel,
    turret: &Turret,
    effects: &Effects,
    flags: ControlFlags,
    events: Vec<GameEvent>,
    alerts: Vec<Alert>,
) -> GameStateSnapshot {
    let enemies = build_enemies(world);
    GameStateSnapshot {
        time: *time,
        wave: wave.wave,
        health: wave.health,
        max_health: MAX_HEALTH,
        money: wave.money,
        enemies_left_to_spawn: wave.enemies_left_to_spawn,
        enemies_alive: enemies.len() as u32,
        game_running: wave.game_running,
        paused: flags.paused,
        dev_menu_open: flags.dev_menu_open,
        auto_start: flags.auto_start,
        auto_start_in_ticks: flags.auto_start_in_ticks,
        heal: HealView {
            cost: HEAL_COST,
            amount: HEAL_AMOUNT,
            available: wave.can_heal(),
        },
        turret: TurretView {
            primary: build_emitter(&turret.primary),
            satellites: turret.satellites.iter().map(build_emitter).collect(),
            stats: *upgrades.stats(),
        },
        upgrades: build_upgrades(upgrades, wave.money),
        enemies,
        projectiles: build_projectiles(world),
        particles: build_particles(world),
        shake_offset: effects.shake_offset,
        popups: effects.popups.iter().map(|p| p.view()).collect(),
        events,
        alerts,
    }
}

fn build_emitter(emitter: &Emitter) -> EmitterView {
    EmitterView {
        kind: emitter.kind,
        position: emitter.position,
        rotation: emitter.rotation,
        state: emitter.state,
        target_serial: emitter.target.map(|t| t.serial),
    }
}

fn build_upgrades(model: &StatModel, money: u64) -> Vec<UpgradeView> {
    UpgradeCategory::ALL
        .iter()
        .map(|&category| {
            let cost = model.next_cost(category);
            UpgradeView {
                category,
                name: category.display_name().to_string(),
                level: model.level(category),
                cost,
                next_effect: model.next_effect(category),
                description: model.next_description(category),
                maxed: model.is_maxed(category),
                affordable: cost.is_some_and(|c| money >= c),
            }
        })
        .collect()
}

/// Enemies still on the field (dead or arrived enemies are never visible).
fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(&Enemy, &Position)>()
        .iter()
        .filter(|(_, (enemy, _))| !enemy.is_dead() && !enemy.reached_base)
        .map(|(_, (enemy, position))| EnemyView {
            serial: enemy.serial,
            kind: enemy.kind,
            wave: enemy.wave,
            position: *position,
            health: enemy.health,
            max_health: enemy.max_health,
        })
        .collect();
    enemies.sort_by_key(|e| e.serial);
    enemies
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = world
        .query::<(&Projectile, &Position, &Velocity)>()
        .iter()
        .map(|(_, (projectile, position, velocity))| ProjectileView {
            serial: projectile.serial,
            source: projectile.source,
            position: *position,
            heading: velocity.y.atan2(velocity.x),
            radius: projectile.hit_radius,
        })
        .collect();
    projectiles.sort_by_key(|p| p.serial);
    projectiles
}

fn build_particles(world: &World) -> Vec<ParticleView> {
    world
        .query::<(&Particle, &Position)>()
        .iter()
        .map(|(_, (particle, position))| ParticleView {
            position: *position,
            size: particle.size,
            alpha: particle.life.clamp(0.0, 1.0),
        })
        .collect()
}
