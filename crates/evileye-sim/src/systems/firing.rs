//! Firing system: every emitter retargets, rotates and fires independently.

use hecs::World;
use rand_chacha::ChaCha8Rng;

use evileye_core::components::Enemy;
use evileye_core::events::GameEvent;
use evileye_core::types::Position;
use evileye_core::upgrades::TurretStats;

use crate::emitter::{TargetCandidate, Turret};

/// Live, targetable enemies in spawn order.
pub fn candidates(world: &World) -> Vec<TargetCandidate> {
    let mut out: Vec<TargetCandidate> = world
        .query::<(&Enemy, &Position)>()
        .iter()
        .filter(|(_, (enemy, _))| !enemy.is_dead() && !enemy.reached_base)
        .map(|(entity, (enemy, position))| TargetCandidate {
            entity,
            serial: enemy.serial,
            position: *position,
        })
        .collect();
    out.sort_by_key(|c| c.serial);
    out
}

/// Update all emitters and spawn projectiles for those that fire.
/// Returns the number of shots fired.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    turret: &mut Turret,
    stats: &TurretStats,
    current_tick: u64,
    next_serial: &mut u64,
    events: &mut Vec<GameEvent>,
) -> u32 {
    let targets = candidates(world);
    let mut fired = 0;
    for emitter in turret.emitters_mut() {
        if !emitter.update(&targets, stats, current_tick) {
            continue;
        }
        let Some(shot) = emitter.fire(current_tick) else {
            continue;
        };
        crate::world_setup::spawn_projectile(world, rng, &shot, stats, *next_serial);
        *next_serial += 1;
        fired += 1;
        events.push(GameEvent::ProjectileFired {
            source: shot.source,
            accuracy: shot.accuracy,
        });
    }
    fired
}
