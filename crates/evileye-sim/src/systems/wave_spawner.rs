//! Wave spawning system: spawns one enemy each time the interval elapses.

use hecs::World;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use evileye_core::events::GameEvent;
use evileye_core::waves::WaveState;

use crate::wave::WaveController;

/// Advance the spawn timer and spawn any due enemy. Returns the number spawned.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    controller: &mut WaveController,
    state: &mut WaveState,
    next_serial: &mut u64,
    events: &mut Vec<GameEvent>,
) -> u32 {
    if !controller.tick_spawn(state) {
        return 0;
    }
    let serial = *next_serial;
    *next_serial += 1;
    let (_, kind) = crate::world_setup::spawn_enemy(world, rng, state.wave, serial);
    debug!(serial, ?kind, wave = state.wave, left = state.enemies_left_to_spawn, "enemy spawned");
    events.push(GameEvent::EnemySpawned { serial, kind });
    1
}
