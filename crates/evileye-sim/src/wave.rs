//! Wave controller: spawn scheduling and the auto-start countdown.
//!
//! Both timers are tick countdowns that only move while the simulation is
//! running, so a pause never drops or duplicates a scheduled spawn.

use evileye_core::constants::{ms_to_ticks, AUTO_START_DELAY_MS, SPAWN_INTERVAL_MS};
use evileye_core::errors::WaveError;
use evileye_core::waves::WaveState;

#[derive(Debug, Clone, Default)]
pub struct WaveController {
    /// Ticks until the next spawn, while a wave still has enemies to spawn.
    spawn_countdown: Option<u64>,
    /// Ticks until an auto-started wave begins.
    auto_start_countdown: Option<u64>,
}

impl WaveController {
    pub fn spawn_interval_ticks() -> u64 {
        ms_to_ticks(SPAWN_INTERVAL_MS)
    }

    pub fn auto_start_delay_ticks() -> u64 {
        ms_to_ticks(AUTO_START_DELAY_MS)
    }

    /// Start the current wave. The first enemy arrives one interval later.
    pub fn start(&mut self, state: &mut WaveState) -> Result<u32, WaveError> {
        let count = state.start()?;
        self.auto_start_countdown = None;
        self.spawn_countdown = (count > 0).then(Self::spawn_interval_ticks);
        Ok(count)
    }

    /// Advance the spawn timer one tick. Returns true when an enemy is due;
    /// the caller must spawn exactly one.
    pub fn tick_spawn(&mut self, state: &mut WaveState) -> bool {
        if !state.game_running || state.enemies_left_to_spawn == 0 {
            self.spawn_countdown = None;
            return false;
        }
        let remaining = self
            .spawn_countdown
            .get_or_insert_with(Self::spawn_interval_ticks);
        *remaining = remaining.saturating_sub(1);
        if *remaining > 0 {
            return false;
        }
        state.enemies_left_to_spawn -= 1;
        self.spawn_countdown = (state.enemies_left_to_spawn > 0).then(Self::spawn_interval_ticks);
        true
    }

    pub fn schedule_auto_start(&mut self) {
        if self.auto_start_countdown.is_none() {
            self.auto_start_countdown = Some(Self::auto_start_delay_ticks());
        }
    }

    pub fn cancel_auto_start(&mut self) {
        self.auto_start_countdown = None;
    }

    /// Advance the auto-start timer one tick. Returns true when the wave should start.
    pub fn tick_auto_start(&mut self) -> bool {
        match self.auto_start_countdown.as_mut() {
            Some(remaining) => {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    self.auto_start_countdown = None;
                    true
                } else {
                    false
                }
            }
            None => false,
        }
    }

    pub fn auto_start_in_ticks(&self) -> Option<u64> {
        self.auto_start_countdown
    }

    /// Invalidate every pending timer.
    pub fn reset(&mut self) {
        self.spawn_countdown = None;
        self.auto_start_countdown = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawns_at_fixed_interval() {
        let mut controller = WaveController::default();
        let mut state = WaveState::default();
        assert_eq!(controller.start(&mut state), Ok(3));

        let interval = WaveController::spawn_interval_ticks();
        let mut spawn_ticks = Vec::new();
        for tick in 1..=interval * 5 {
            if controller.tick_spawn(&mut state) {
                spawn_ticks.push(tick);
            }
        }
        assert_eq!(spawn_ticks, vec![interval, interval * 2, interval * 3]);
        assert_eq!(state.enemies_left_to_spawn, 0);
    }

    #[test]
    fn test_reset_invalidates_spawner() {
        let mut controller = WaveController::default();
        let mut state = WaveState::default();
        controller.start(&mut state).unwrap();
        controller.tick_spawn(&mut state);
        controller.reset();
        state = WaveState::default();
        for _ in 0..200 {
            assert!(!controller.tick_spawn(&mut state));
        }
    }

    #[test]
    fn test_auto_start_countdown() {
        let mut controller = WaveController::default();
        controller.schedule_auto_start();
        let delay = WaveController::auto_start_delay_ticks();
        assert_eq!(delay, 120);
        for _ in 1..delay {
            assert!(!controller.tick_auto_start());
        }
        assert!(controller.tick_auto_start());
        assert!(controller.auto_start_in_ticks().is_none());
        assert!(!controller.tick_auto_start());
    }
}
