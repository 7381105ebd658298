//! Projectile system: straight-line flight, hit tests against every live
//! enemy, piercing, knockback and removal.
//!
//! Removal is deferred until every projectile has moved, so all hits in a
//! tick land before anything is despawned.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use evileye_core::components::{Enemy, Projectile};
use evileye_core::events::GameEvent;
use evileye_core::types::{Position, Velocity};
use evileye_core::upgrades::TurretStats;

use crate::effects::Effects;
use crate::systems::enemies;

/// Test `shot` at `at` against enemies in order, applying damage and knockback.
/// Returns the number of enemies hit.
fn resolve_hits(
    world: &mut World,
    enemy_order: &[Entity],
    shot: &mut Projectile,
    at: Position,
    knockback_force: f64,
    effects: &mut Effects,
    events: &mut Vec<GameEvent>,
) -> u32 {
    let mut hits = 0;
    for &entity in enemy_order {
        if shot.pierce_remaining == 0 {
            break;
        }
        let Ok((enemy, position)) = world.query_one_mut::<(&mut Enemy, &Position)>(entity) else {
            continue;
        };
        if enemy.is_dead() || enemy.reached_base || shot.hits.contains(&enemy.serial) {
            continue;
        }
        if at.distance_to(position) >= shot.hit_radius {
            continue;
        }

        enemy.health -= shot.damage;
        shot.hits.push(enemy.serial);
        shot.pierce_remaining -= 1;
        hits += 1;

        if knockback_force > 0.0 {
            let direction = (position.as_dvec2() - shot.origin.as_dvec2()).normalize_or_zero();
            enemy.knockback += direction * knockback_force;
        }
        effects.shake.pulse();
        events.push(GameEvent::ProjectileHit {
            enemy_serial: enemy.serial,
            damage: shot.damage,
        });
    }
    if shot.pierce_remaining == 0 {
        shot.spent = true;
    }
    hits
}

/// Advance all projectiles. Spent projectiles are despawned with an explosion.
/// Returns the number of projectiles removed.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    stats: &TurretStats,
    effects: &mut Effects,
    events: &mut Vec<GameEvent>,
    despawn_buffer: &mut Vec<Entity>,
) -> u32 {
    despawn_buffer.clear();

    let enemy_order = enemies::ordered(world);
    let mut shots: Vec<(Entity, u64)> = world
        .query::<&Projectile>()
        .iter()
        .map(|(entity, p)| (entity, p.serial))
        .collect();
    shots.sort_by_key(|(_, serial)| *serial);

    let mut explosions: Vec<Position> = Vec::new();

    for (entity, _) in shots {
        let Ok((projectile, position, velocity)) =
            world.query_one_mut::<(&Projectile, &mut Position, &Velocity)>(entity)
        else {
            continue;
        };
        position.x += velocity.x;
        position.y += velocity.y;
        let at = *position;
        let mut shot = projectile.clone();

        if !at.in_field() {
            shot.spent = true;
        } else {
            let hits = resolve_hits(
                world,
                &enemy_order,
                &mut shot,
                at,
                stats.knockback_force,
                effects,
                events,
            );
            if hits > 1 {
                debug!(serial = shot.serial, hits, "projectile pierced");
            }
        }

        if shot.spent {
            despawn_buffer.push(entity);
            explosions.push(at);
        }
        if let Ok(mut stored) = world.get::<&mut Projectile>(entity) {
            *stored = shot;
        }
    }

    let removed = despawn_buffer.len() as u32;
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
    for at in explosions {
        crate::world_setup::spawn_explosion(world, rng, at);
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use evileye_core::enums::{EmitterKind, EnemyKind};
    use evileye_core::components::Particle;
    use rand::SeedableRng;

    fn shot_at(world: &mut World, x: f64, y: f64, vx: f64, pierce: u32, hit_radius: f64) -> Entity {
        world.spawn((
            Projectile {
                serial: 0,
                source: EmitterKind::Primary,
                damage: 25.0,
                pierce_remaining: pierce,
                hit_radius,
                origin: Position::new(x, y),
                hits: Vec::new(),
                spent: false,
            },
            Position::new(x, y),
            Velocity::new(vx, 0.0),
        ))
    }

    fn enemy_at(world: &mut World, serial: u64, x: f64, y: f64) -> Entity {
        crate::world_setup::spawn_enemy_at(world, Position::new(x, y), 1, serial, EnemyKind::Imp)
    }

    fn health(world: &World, entity: Entity) -> f64 {
        world.get::<&Enemy>(entity).unwrap().health
    }

    #[test]
    fn test_single_pierce_hits_first_in_order_only() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut effects = Effects::default();
        let mut events = Vec::new();
        let mut buffer = Vec::new();

        let a = enemy_at(&mut world, 0, 105.0, 100.0);
        let b = enemy_at(&mut world, 1, 106.0, 101.0);
        shot_at(&mut world, 100.0, 100.0, 5.0, 1, 10.0);

        let removed = run(&mut world, &mut rng, &TurretStats::default(), &mut effects, &mut events, &mut buffer);
        assert_eq!(removed, 1);
        assert_eq!(health(&world, a), 25.0);
        assert_eq!(health(&world, b), 50.0);
        assert!(effects.shake.is_active());
        assert_eq!(world.query::<&Particle>().iter().count(), 8);
    }

    #[test]
    fn test_piercing_hits_multiple_in_one_tick() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut effects = Effects::default();
        let mut events = Vec::new();
        let mut buffer = Vec::new();

        let a = enemy_at(&mut world, 0, 105.0, 100.0);
        let b = enemy_at(&mut world, 1, 106.0, 101.0);
        let c = enemy_at(&mut world, 2, 104.0, 99.0);
        let p = shot_at(&mut world, 100.0, 100.0, 5.0, 2, 10.0);

        let removed = run(&mut world, &mut rng, &TurretStats::default(), &mut effects, &mut events, &mut buffer);
        assert_eq!(removed, 1, "budget of 2 exhausted");
        assert_eq!(health(&world, a), 25.0);
        assert_eq!(health(&world, b), 25.0);
        assert_eq!(health(&world, c), 50.0);
        assert!(world.get::<&Projectile>(p).is_err());
    }

    #[test]
    fn test_never_hits_same_enemy_twice() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut effects = Effects::default();
        let mut events = Vec::new();
        let mut buffer = Vec::new();

        let a = enemy_at(&mut world, 0, 101.0, 100.0);
        let p = shot_at(&mut world, 100.0, 100.0, 0.5, 3, 10.0);
        for _ in 0..3 {
            run(&mut world, &mut rng, &TurretStats::default(), &mut effects, &mut events, &mut buffer);
        }
        assert_eq!(health(&world, a), 25.0);
        let shot = world.get::<&Projectile>(p).unwrap();
        assert_eq!(shot.pierce_remaining, 2);
        assert_eq!(shot.hits, vec![0]);
    }

    #[test]
    fn test_out_of_bounds_removes() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut effects = Effects::default();
        let mut events = Vec::new();
        let mut buffer = Vec::new();

        shot_at(&mut world, 798.0, 300.0, 5.0, 1, 10.0);
        let removed = run(&mut world, &mut rng, &TurretStats::default(), &mut effects, &mut events, &mut buffer);
        assert_eq!(removed, 1);
        assert!(!effects.shake.is_active());
        assert!(events.is_empty());
    }

    #[test]
    fn test_knockback_pushes_away_from_origin() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut effects = Effects::default();
        let mut events = Vec::new();
        let mut buffer = Vec::new();
        let stats = TurretStats {
            knockback_force: 2.0,
            ..Default::default()
        };

        let a = enemy_at(&mut world, 0, 105.0, 100.0);
        shot_at(&mut world, 100.0, 100.0, 5.0, 1, 10.0);
        run(&mut world, &mut rng, &stats, &mut effects, &mut events, &mut buffer);
        let enemy = world.get::<&Enemy>(a).unwrap();
        assert!((enemy.knockback.x - 2.0).abs() < 1e-9);
        assert!(enemy.knockback.y.abs() < 1e-9);
    }
}
