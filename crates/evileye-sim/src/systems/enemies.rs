//! Enemy system: knockback, homing movement and the reach-base check.

use glam::DVec2;
use hecs::{Entity, World};
use tracing::debug;

use evileye_core::components::Enemy;
use evileye_core::constants::*;
use evileye_core::events::GameEvent;
use evileye_core::types::Position;
use evileye_core::waves::WaveState;

/// Live enemies in spawn order.
pub fn ordered(world: &World) -> Vec<Entity> {
    let mut enemies: Vec<(Entity, u64)> = world
        .query::<&Enemy>()
        .iter()
        .map(|(entity, enemy)| (entity, enemy.serial))
        .collect();
    enemies.sort_by_key(|(_, serial)| *serial);
    enemies.into_iter().map(|(entity, _)| entity).collect()
}

pub fn base_position() -> DVec2 {
    DVec2::new(BASE_X, BASE_Y)
}

/// One tick of motion for a single enemy.
///
/// The knockback impulse is applied first, clamped to the field, and decays;
/// an enemy inside the reach radius is flagged instead of moving.
pub fn step(enemy: &mut Enemy, position: &mut Position) {
    let base = base_position();
    let mut p = (position.as_dvec2() + enemy.knockback)
        .clamp(DVec2::ZERO, DVec2::new(FIELD_WIDTH, FIELD_HEIGHT));

    enemy.knockback *= KNOCKBACK_DECAY;
    if enemy.knockback.length() < KNOCKBACK_EPSILON {
        enemy.knockback = DVec2::ZERO;
    }

    if p.distance(base) < BASE_RADIUS + BASE_REACH_MARGIN {
        enemy.reached_base = true;
    } else {
        p += (base - p).normalize_or_zero() * enemy.speed;
    }
    *position = p.into();
}

/// Move every enemy and apply base damage for those that arrive.
///
/// Returns true when the base is destroyed; remaining enemies are left
/// untouched since the caller resets the world.
pub fn run(
    world: &mut World,
    state: &mut WaveState,
    events: &mut Vec<GameEvent>,
    despawn_buffer: &mut Vec<Entity>,
) -> bool {
    despawn_buffer.clear();
    let mut destroyed = false;

    for entity in ordered(world) {
        let Ok((enemy, position)) = world.query_one_mut::<(&mut Enemy, &mut Position)>(entity)
        else {
            continue;
        };
        if enemy.is_dead() {
            continue;
        }
        step(enemy, position);
        if !enemy.reached_base {
            continue;
        }

        destroyed = state.damage_base(enemy.damage);
        debug!(serial = enemy.serial, damage = enemy.damage, health = state.health, "enemy reached base");
        events.push(GameEvent::BaseHit {
            serial: enemy.serial,
            damage: enemy.damage,
            health: state.health,
        });
        despawn_buffer.push(entity);
        if destroyed {
            break;
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
    destroyed
}

/// Remove dead enemies, paying out their rewards. Returns the number removed.
pub fn collect_dead(
    world: &mut World,
    state: &mut WaveState,
    events: &mut Vec<GameEvent>,
    despawn_buffer: &mut Vec<Entity>,
) -> u32 {
    despawn_buffer.clear();
    for entity in ordered(world) {
        let Ok(enemy) = world.get::<&Enemy>(entity) else {
            continue;
        };
        if enemy.is_dead() {
            state.money += enemy.reward;
            debug!(serial = enemy.serial, reward = enemy.reward, "enemy killed");
            events.push(GameEvent::EnemyKilled {
                serial: enemy.serial,
                reward: enemy.reward,
            });
            despawn_buffer.push(entity);
        }
    }
    let removed = despawn_buffer.len() as u32;
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use evileye_core::enums::EnemyKind;

    fn enemy(speed: f64) -> Enemy {
        Enemy {
            serial: 0,
            wave: 1,
            kind: EnemyKind::Imp,
            speed,
            health: 50.0,
            max_health: 50.0,
            damage: 12,
            reward: 12,
            knockback: DVec2::ZERO,
            reached_base: false,
        }
    }

    #[test]
    fn test_moves_straight_toward_base() {
        let mut e = enemy(2.0);
        let mut pos = Position::new(BASE_X - 200.0, BASE_Y);
        step(&mut e, &mut pos);
        assert!((pos.x - (BASE_X - 198.0)).abs() < 1e-9);
        assert!((pos.y - BASE_Y).abs() < 1e-9);
    }

    #[test]
    fn test_knockback_decays_geometrically() {
        let mut e = enemy(0.0);
        e.knockback = DVec2::new(-4.0, 0.0);
        let mut pos = Position::new(BASE_X - 200.0, BASE_Y);
        step(&mut e, &mut pos);
        assert!((pos.x - (BASE_X - 204.0)).abs() < 1e-9);
        assert!((e.knockback.x + 4.0 * KNOCKBACK_DECAY).abs() < 1e-9);
        for _ in 0..100 {
            step(&mut e, &mut pos);
        }
        assert_eq!(e.knockback, DVec2::ZERO);
    }

    #[test]
    fn test_knockback_cannot_push_off_field() {
        let mut e = enemy(0.0);
        e.knockback = DVec2::new(50.0, -400.0);
        let mut pos = Position::new(795.0, 300.0);
        step(&mut e, &mut pos);
        assert_eq!(pos.x, FIELD_WIDTH);
        assert_eq!(pos.y, 0.0);
        for _ in 0..100 {
            step(&mut e, &mut pos);
            assert!(pos.in_field());
        }
    }

    #[test]
    fn test_reach_radius() {
        let mut e = enemy(0.8);
        let mut pos = Position::new(BASE_X + 34.9, BASE_Y);
        step(&mut e, &mut pos);
        assert!(e.reached_base);

        let mut e = enemy(0.0);
        let mut pos = Position::new(BASE_X + 35.0, BASE_Y);
        step(&mut e, &mut pos);
        assert!(!e.reached_base);
    }
}
