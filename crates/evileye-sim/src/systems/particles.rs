//! Particle system: drift, fade and shrink explosion debris.

use hecs::{Entity, World};

use evileye_core::components::Particle;
use evileye_core::constants::{PARTICLE_MIN_SIZE, PARTICLE_SHRINK};
use evileye_core::types::{Position, Velocity};

pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, (particle, position, velocity)) in
        world.query_mut::<(&mut Particle, &mut Position, &Velocity)>()
    {
        position.x += velocity.x;
        position.y += velocity.y;
        particle.life -= particle.decay;
        particle.size *= PARTICLE_SHRINK;
        if particle.life <= 0.0 || particle.size <= PARTICLE_MIN_SIZE {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_expires_after_life_runs_out() {
        let mut world = World::new();
        let mut buffer = Vec::new();
        world.spawn((
            Particle {
                life: 1.0,
                decay: 0.02,
                size: 3.5,
            },
            Position::new(100.0, 100.0),
            Velocity::new(1.0, -1.0),
        ));
        let mut ticks = 0;
        while world.query::<&Particle>().iter().count() > 0 {
            run(&mut world, &mut buffer);
            ticks += 1;
            assert!(ticks <= 60, "particle outlived its life");
        }
        assert!(ticks >= 49);
    }
}
