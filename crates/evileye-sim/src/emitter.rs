//! Emitter data model: the primary turret and its satellite eyes.
//!
//! Stored on `SimulationEngine`, NOT as ECS entities. Targets are held as
//! hecs handles and re-validated every tick.

use std::f64::consts::TAU;

use rand::Rng;

use evileye_core::constants::*;
use evileye_core::enums::{EmitterKind, EmitterState};
use evileye_core::types::{shortest_angle, Position};
use evileye_core::upgrades::TurretStats;

/// A live enemy an emitter may lock onto.
#[derive(Debug, Clone, Copy)]
pub struct TargetCandidate {
    pub entity: hecs::Entity,
    pub serial: u64,
    pub position: Position,
}

/// Current lock of an emitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetLock {
    pub entity: hecs::Entity,
    pub serial: u64,
    /// Target position as of the last retarget pass.
    pub position: Position,
}

/// Everything needed to spawn a projectile.
#[derive(Debug, Clone, Copy)]
pub struct ShotSolution {
    pub source: EmitterKind,
    pub origin: Position,
    /// Bearing to the target at fire time, before jitter.
    pub bearing: f64,
    pub accuracy: f64,
}

/// `max(0.1, 1 - error / 60°)`.
pub fn accuracy_for_error(angular_error: f64) -> f64 {
    (1.0 - angular_error.abs() / ACCURACY_FALLOFF).max(MIN_ACCURACY)
}

/// Half-width of the launch jitter window for a given accuracy.
pub fn jitter_spread(accuracy: f64) -> f64 {
    (1.0 - accuracy).max(0.0) * MAX_JITTER
}

/// Launch angle with uniform jitter. Perfect accuracy draws nothing from `rng`.
pub fn launch_angle<R: Rng>(bearing: f64, accuracy: f64, rng: &mut R) -> f64 {
    let spread = jitter_spread(accuracy);
    if spread <= 0.0 {
        return bearing;
    }
    bearing + rng.gen_range(-spread..=spread)
}

#[derive(Debug, Clone)]
pub struct Emitter {
    pub kind: EmitterKind,
    pub position: Position,
    /// Current aim angle (radians). Persists across ticks.
    pub rotation: f64,
    pub target: Option<TargetLock>,
    /// Tick of the last shot. `None` means the emitter has never fired.
    pub last_fire_tick: Option<u64>,
    pub state: EmitterState,
    /// Max rotation per tick (radians).
    pub turn_speed: f64,
    /// Error between rotation and target bearing after the last update.
    pub angular_error: f64,
}

impl Emitter {
    pub fn primary(position: Position) -> Self {
        Self {
            kind: EmitterKind::Primary,
            position,
            rotation: 0.0,
            target: None,
            last_fire_tick: None,
            state: EmitterState::Idle,
            turn_speed: PRIMARY_TURN_SPEED,
            angular_error: 0.0,
        }
    }

    pub fn satellite(index: usize, center: Position) -> Self {
        Self {
            kind: EmitterKind::Satellite(index as u8),
            position: satellite_position(index, center),
            turn_speed: SATELLITE_TURN_SPEED,
            ..Self::primary(center)
        }
    }

    pub fn cooldown_ready(&self, now: u64, cooldown_ticks: u64) -> bool {
        match self.last_fire_tick {
            None => true,
            Some(t) => now.saturating_sub(t) >= cooldown_ticks,
        }
    }

    /// Retarget, rotate toward the target and evaluate fire gating.
    ///
    /// Returns true when the emitter is aimed and off cooldown.
    pub fn update(&mut self, candidates: &[TargetCandidate], stats: &TurretStats, now: u64) -> bool {
        self.target = closest_in_range(self.position, candidates, stats.range).map(|c| TargetLock {
            entity: c.entity,
            serial: c.serial,
            position: c.position,
        });

        let Some(lock) = self.target else {
            self.state = EmitterState::Idle;
            self.angular_error = 0.0;
            return false;
        };

        let bearing = self.position.bearing_to(&lock.position);
        let delta = shortest_angle(self.rotation, bearing);
        let step = delta.clamp(-self.turn_speed, self.turn_speed);
        self.rotation = (self.rotation + step).rem_euclid(TAU);
        self.angular_error = shortest_angle(self.rotation, bearing).abs();

        let ready = self.angular_error < AIM_THRESHOLD
            && self.cooldown_ready(now, stats.cooldown_ticks());
        self.state = if ready {
            EmitterState::AimedReady
        } else {
            EmitterState::Tracking
        };
        ready
    }

    /// Fire at the current target. Returns `None` unless the last update left
    /// the emitter aimed and ready.
    pub fn fire(&mut self, now: u64) -> Option<ShotSolution> {
        if self.state != EmitterState::AimedReady {
            return None;
        }
        let lock = self.target?;
        self.last_fire_tick = Some(now);
        self.state = EmitterState::Tracking;
        Some(ShotSolution {
            source: self.kind,
            origin: self.position,
            bearing: self.position.bearing_to(&lock.position),
            accuracy: accuracy_for_error(self.angular_error),
        })
    }

    fn reset(&mut self) {
        self.rotation = 0.0;
        self.target = None;
        self.last_fire_tick = None;
        self.state = EmitterState::Idle;
        self.angular_error = 0.0;
    }
}

/// Minimum-distance candidate strictly inside `range`. Ties keep the first encountered.
fn closest_in_range(
    from: Position,
    candidates: &[TargetCandidate],
    range: f64,
) -> Option<&TargetCandidate> {
    let mut best: Option<(&TargetCandidate, f64)> = None;
    for candidate in candidates {
        let distance = from.distance_to(&candidate.position);
        if distance >= range {
            continue;
        }
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((candidate, distance));
        }
    }
    best.map(|(c, _)| c)
}

/// Pentagonal slot position: angle `index * 2π/5` at the orbit radius.
pub fn satellite_position(index: usize, center: Position) -> Position {
    let angle = index as f64 * TAU / SATELLITE_SLOTS as f64;
    Position::new(
        center.x + angle.cos() * SATELLITE_ORBIT_RADIUS,
        center.y + angle.sin() * SATELLITE_ORBIT_RADIUS,
    )
}

/// One primary emitter plus satellites bound 1:1 to the Multishot level.
#[derive(Debug, Clone)]
pub struct Turret {
    pub primary: Emitter,
    pub satellites: Vec<Emitter>,
}

impl Turret {
    pub fn new(position: Position) -> Self {
        Self {
            primary: Emitter::primary(position),
            satellites: Vec::new(),
        }
    }

    /// Resize the satellite list to `count` and recompute every slot.
    ///
    /// Existing satellites keep their rotation and cooldown.
    pub fn set_satellite_count(&mut self, count: usize) {
        let center = self.primary.position;
        self.satellites.truncate(count);
        while self.satellites.len() < count {
            let index = self.satellites.len();
            self.satellites.push(Emitter::satellite(index, center));
        }
        for (index, satellite) in self.satellites.iter_mut().enumerate() {
            satellite.kind = EmitterKind::Satellite(index as u8);
            satellite.position = satellite_position(index, center);
        }
    }

    /// Primary first, then satellites in slot order.
    pub fn emitters_mut(&mut self) -> impl Iterator<Item = &mut Emitter> {
        std::iter::once(&mut self.primary).chain(self.satellites.iter_mut())
    }

    /// Drop all satellites and return the primary to its initial state.
    pub fn reset(&mut self) {
        self.satellites.clear();
        self.primary.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn candidate(world: &mut hecs::World, serial: u64, x: f64, y: f64) -> TargetCandidate {
        TargetCandidate {
            entity: world.spawn((serial,)),
            serial,
            position: Position::new(x, y),
        }
    }

    #[test]
    fn test_accuracy_curve() {
        assert_eq!(accuracy_for_error(0.0), 1.0);
        assert!((accuracy_for_error(30f64.to_radians()) - 0.5).abs() < 1e-9);
        assert_eq!(accuracy_for_error(90f64.to_radians()), MIN_ACCURACY);
    }

    #[test]
    fn test_jitter_spread_bounds() {
        assert_eq!(jitter_spread(1.0), 0.0);
        assert!((jitter_spread(0.1) - 40.5f64.to_radians()).abs() < 1e-9);
    }

    #[test]
    fn test_perfect_accuracy_has_no_jitter() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            assert_eq!(launch_angle(1.25, 1.0, &mut rng), 1.25);
        }
    }

    #[test]
    fn test_jitter_stays_within_cone() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let spread = jitter_spread(0.1);
        for _ in 0..500 {
            let angle = launch_angle(0.0, 0.1, &mut rng);
            assert!(angle.abs() <= spread + 1e-12, "angle {angle} outside ±{spread}");
        }
    }

    #[test]
    fn test_targets_closest_in_range_first_wins_ties() {
        let mut world = hecs::World::new();
        let center = Position::new(400.0, 300.0);
        let far = candidate(&mut world, 0, 400.0 + 150.0, 300.0);
        let tie_a = candidate(&mut world, 1, 400.0, 300.0 + 100.0);
        let tie_b = candidate(&mut world, 2, 400.0 - 100.0, 300.0);
        let out_of_range = candidate(&mut world, 3, 400.0 + 50.0, 300.0 + 500.0);
        let mut emitter = Emitter::primary(center);
        emitter.update(&[far, tie_a, tie_b, out_of_range], &TurretStats::default(), 0);
        assert_eq!(emitter.target.map(|t| t.serial), Some(1));
    }

    #[test]
    fn test_enemy_exactly_at_range_is_ignored() {
        let mut world = hecs::World::new();
        let stats = TurretStats::default();
        let mut emitter = Emitter::primary(Position::new(400.0, 300.0));
        let edge = candidate(&mut world, 0, 400.0 + stats.range, 300.0);
        assert!(!emitter.update(&[edge], &stats, 0));
        assert!(emitter.target.is_none());

        let inside = candidate(&mut world, 1, 400.0 + stats.range - 0.5, 300.0);
        emitter.update(&[edge, inside], &stats, 1);
        assert_eq!(emitter.target.map(|t| t.serial), Some(1));
    }

    #[test]
    fn test_no_candidates_reverts_to_idle() {
        let mut world = hecs::World::new();
        let mut emitter = Emitter::primary(Position::new(400.0, 300.0));
        let c = candidate(&mut world, 0, 450.0, 300.0);
        emitter.update(&[c], &TurretStats::default(), 0);
        assert_ne!(emitter.state, EmitterState::Idle);
        assert!(!emitter.update(&[], &TurretStats::default(), 1));
        assert_eq!(emitter.state, EmitterState::Idle);
        assert!(emitter.target.is_none());
    }

    #[test]
    fn test_rotation_clamped_to_turn_speed() {
        let mut world = hecs::World::new();
        let mut emitter = Emitter::primary(Position::new(400.0, 300.0));
        // Straight down (+y) is a quarter turn away.
        let c = candidate(&mut world, 0, 400.0, 400.0);
        emitter.update(&[c], &TurretStats::default(), 0);
        assert!((emitter.rotation - PRIMARY_TURN_SPEED).abs() < 1e-12);
    }

    #[test]
    fn test_cooldown_blocks_fire() {
        let mut world = hecs::World::new();
        let stats = TurretStats::default();
        let mut emitter = Emitter::primary(Position::new(400.0, 300.0));
        let c = candidate(&mut world, 0, 500.0, 300.0);
        assert!(emitter.update(&[c], &stats, 10));
        let shot = emitter.fire(10).unwrap();
        assert_eq!(shot.accuracy, 1.0);
        let cooldown = stats.cooldown_ticks();
        assert!(!emitter.update(&[c], &stats, 10 + cooldown - 1));
        assert!(emitter.fire(10 + cooldown - 1).is_none());
        assert!(emitter.update(&[c], &stats, 10 + cooldown));
    }

    #[test]
    fn test_satellite_count_round_trip() {
        let center = Position::new(400.0, 300.0);
        let mut turret = Turret::new(center);
        for k in [3, 5, 1, 1, 0, 4] {
            turret.set_satellite_count(k);
            assert_eq!(turret.satellites.len(), k);
            for (i, sat) in turret.satellites.iter().enumerate() {
                let angle = i as f64 * TAU / 5.0;
                assert!((sat.position.x - (center.x + 40.0 * angle.cos())).abs() < 1e-9);
                assert!((sat.position.y - (center.y + 40.0 * angle.sin())).abs() < 1e-9);
                assert_eq!(sat.kind, EmitterKind::Satellite(i as u8));
                assert_eq!(sat.turn_speed, SATELLITE_TURN_SPEED);
            }
        }
    }

    #[test]
    fn test_satellite_count_idempotent_keeps_state() {
        let mut turret = Turret::new(Position::new(400.0, 300.0));
        turret.set_satellite_count(2);
        turret.satellites[1].rotation = 1.0;
        turret.satellites[1].last_fire_tick = Some(42);
        turret.set_satellite_count(2);
        assert_eq!(turret.satellites[1].rotation, 1.0);
        assert_eq!(turret.satellites[1].last_fire_tick, Some(42));
    }
}
