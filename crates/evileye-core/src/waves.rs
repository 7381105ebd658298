//! Wave progression state and the difficulty curves behind it.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::errors::{HealError, WaveError};

/// Enemies spawned over the course of `wave`.
///
/// Gentle through wave 3, moderate through wave 8, steep beyond.
pub fn enemy_count_for_wave(wave: u32) -> u32 {
    let w = wave.max(1) as f64;
    let count = if wave <= 3 {
        3.0 + ((w - 1.0) * 1.0).floor()
    } else if wave <= 8 {
        5.0 + ((w - 3.0) * 2.0).floor()
    } else {
        8.0 + ((w - 8.0) * 3.0).floor() + 15.0
    };
    count as u32
}

/// Money paid for clearing `wave`.
pub fn completion_bonus(wave: u32) -> u64 {
    let exp = wave.max(1) as i32 - 1;
    (WAVE_BONUS_BASE * WAVE_BONUS_GROWTH.powi(exp)).floor() as u64
}

/// Speed multiplier for an enemy spawned on `wave`. Also scales damage and reward.
pub fn speed_multiplier(wave: u32) -> f64 {
    tiered_growth(wave, 0.05, 0.08, 0.25)
}

/// Health multiplier for an enemy spawned on `wave`.
pub fn health_multiplier(wave: u32) -> f64 {
    tiered_growth(wave, 0.08, 0.10, 0.30)
}

/// Piecewise-linear growth: `early` per wave through 5, `mid` through 10, `late` after.
fn tiered_growth(wave: u32, early: f64, mid: f64, late: f64) -> f64 {
    let w = wave.max(1) as f64;
    let tier1 = (w.min(5.0) - 1.0) * early;
    let tier2 = (w.min(10.0) - 5.0).max(0.0) * mid;
    let tier3 = (w - 10.0).max(0.0) * late;
    1.0 + tier1 + tier2 + tier3
}

/// Stats of an enemy spawned on a given wave.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyProfile {
    pub wave: u32,
    pub speed: f64,
    pub health: f64,
    pub damage: u32,
    pub reward: u64,
}

impl EnemyProfile {
    pub fn for_wave(wave: u32) -> Self {
        let speed_mult = speed_multiplier(wave);
        let health_mult = health_multiplier(wave);
        Self {
            wave,
            speed: ENEMY_BASE_SPEED * speed_mult,
            health: (ENEMY_BASE_HEALTH * health_mult).floor(),
            damage: (ENEMY_BASE_DAMAGE * speed_mult).floor() as u32,
            reward: (ENEMY_BASE_REWARD * speed_mult).floor() as u64,
        }
    }
}

/// Wave counter, base health and money.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveState {
    pub wave: u32,
    pub enemies_left_to_spawn: u32,
    pub game_running: bool,
    /// Base HP, always within `[0, MAX_HEALTH]`.
    pub health: u32,
    pub money: u64,
}

impl Default for WaveState {
    fn default() -> Self {
        Self::new(INITIAL_MONEY, INITIAL_HEALTH)
    }
}

impl WaveState {
    pub fn new(money: u64, health: u32) -> Self {
        Self {
            wave: INITIAL_WAVE,
            enemies_left_to_spawn: 0,
            game_running: false,
            health: health.min(MAX_HEALTH),
            money,
        }
    }

    /// Begin the current wave. Returns the number of enemies to spawn.
    pub fn start(&mut self) -> Result<u32, WaveError> {
        if self.game_running {
            return Err(WaveError::AlreadyRunning { wave: self.wave });
        }
        let count = enemy_count_for_wave(self.wave);
        self.enemies_left_to_spawn = count;
        self.game_running = true;
        Ok(count)
    }

    /// The sole completion condition: nothing left to spawn and nothing alive.
    pub fn is_complete(&self, live_enemies: usize) -> bool {
        self.game_running && self.enemies_left_to_spawn == 0 && live_enemies == 0
    }

    /// Close out the running wave. Returns `(completed_wave, bonus)`.
    pub fn complete(&mut self) -> (u32, u64) {
        let completed = self.wave;
        let bonus = completion_bonus(completed);
        self.money += bonus;
        self.wave += 1;
        self.game_running = false;
        (completed, bonus)
    }

    /// Whether `heal` would currently succeed.
    pub fn can_heal(&self) -> bool {
        self.check_heal().is_ok()
    }

    /// Spend `HEAL_COST` to restore up to `HEAL_AMOUNT` health. Returns health gained.
    pub fn heal(&mut self) -> Result<u32, HealError> {
        self.check_heal()?;
        self.money -= HEAL_COST;
        let before = self.health;
        self.health = (self.health + HEAL_AMOUNT).min(MAX_HEALTH);
        Ok(self.health - before)
    }

    fn check_heal(&self) -> Result<(), HealError> {
        if self.game_running {
            return Err(HealError::WaveInProgress);
        }
        if self.health >= MAX_HEALTH {
            return Err(HealError::HealthFull);
        }
        if self.money < HEAL_COST {
            return Err(HealError::InsufficientFunds {
                cost: HEAL_COST,
                money: self.money,
            });
        }
        Ok(())
    }

    /// Apply base damage, clamped at zero. Returns true when the base is destroyed.
    pub fn damage_base(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.health == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_count_tiers() {
        assert_eq!(enemy_count_for_wave(1), 3);
        assert_eq!(enemy_count_for_wave(3), 5);
        assert_eq!(enemy_count_for_wave(4), 7);
        assert_eq!(enemy_count_for_wave(5), 9);
        assert_eq!(enemy_count_for_wave(8), 15);
        assert_eq!(enemy_count_for_wave(9), 26);
        assert_eq!(enemy_count_for_wave(12), 35);
    }

    #[test]
    fn test_growth_is_continuous_across_tiers() {
        assert!((speed_multiplier(1) - 1.0).abs() < 1e-9);
        assert!((speed_multiplier(5) - 1.2).abs() < 1e-9);
        assert!((speed_multiplier(10) - 1.6).abs() < 1e-9);
        assert!((speed_multiplier(11) - 1.85).abs() < 1e-9);
        assert!((health_multiplier(5) - 1.32).abs() < 1e-9);
        assert!((health_multiplier(10) - 1.82).abs() < 1e-9);
        assert!((health_multiplier(12) - 2.42).abs() < 1e-9);
    }

    #[test]
    fn test_wave_one_profile() {
        let p = EnemyProfile::for_wave(1);
        assert_eq!(p.health, 50.0);
        assert_eq!(p.damage, 12);
        assert_eq!(p.reward, 12);
        assert!((p.speed - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_completion_bonus_curve() {
        assert_eq!(completion_bonus(1), 150);
        assert_eq!(completion_bonus(2), 180);
        assert_eq!(completion_bonus(3), 216);
        assert_eq!(completion_bonus(4), 259);
    }

    #[test]
    fn test_damage_base_clamps() {
        let mut state = WaveState::default();
        assert!(!state.damage_base(40));
        assert_eq!(state.health, 60);
        assert!(state.damage_base(500));
        assert_eq!(state.health, 0);
    }
}
