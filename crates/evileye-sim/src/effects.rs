//! Screen shake and timed popups, advanced once per simulation tick.

use std::f64::consts::TAU;

use rand::Rng;

use evileye_core::constants::*;
use evileye_core::enums::PopupKind;
use evileye_core::state::PopupView;
use evileye_core::types::Position;

/// Quadratic ease-out.
pub fn ease_out_quad(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Ease-out with a slight overshoot past 1.0.
pub fn ease_out_back(t: f64) -> f64 {
    const C1: f64 = 1.70158;
    const C3: f64 = C1 + 1.0;
    let t = t.clamp(0.0, 1.0) - 1.0;
    1.0 + C3 * t * t * t + C1 * t * t
}

#[derive(Debug, Clone, Default)]
pub struct ScreenShake {
    /// Peak magnitude of the current pulse (px).
    peak: f64,
    remaining_ticks: u32,
}

impl ScreenShake {
    /// Start a pulse, or stack onto the live one.
    pub fn pulse(&mut self) {
        self.peak = if self.remaining_ticks > 0 {
            (self.peak + SHAKE_STACK).min(SHAKE_MAX)
        } else {
            SHAKE_PULSE
        };
        self.remaining_ticks = SHAKE_DURATION_TICKS;
    }

    /// Current magnitude, eased out over the pulse duration.
    pub fn magnitude(&self) -> f64 {
        if self.remaining_ticks == 0 {
            return 0.0;
        }
        let progress = 1.0 - self.remaining_ticks as f64 / SHAKE_DURATION_TICKS as f64;
        self.peak * (1.0 - ease_out_quad(progress))
    }

    pub fn is_active(&self) -> bool {
        self.remaining_ticks > 0
    }

    /// Sample this tick's offset and advance the pulse.
    pub fn update<R: Rng>(&mut self, rng: &mut R) -> Position {
        if self.remaining_ticks == 0 {
            return Position::default();
        }
        let magnitude = self.magnitude();
        let angle = rng.gen_range(0.0..TAU);
        self.remaining_ticks -= 1;
        Position::new(angle.cos() * magnitude, angle.sin() * magnitude)
    }
}

#[derive(Debug, Clone)]
pub struct Popup {
    pub kind: PopupKind,
    pub age_ticks: u32,
    pub duration_ticks: u32,
}

impl Popup {
    pub fn new(kind: PopupKind) -> Self {
        let duration_ticks = match kind {
            PopupKind::WaveComplete { .. } => WAVE_COMPLETE_POPUP_TICKS,
            PopupKind::GameOver { .. } => GAME_OVER_POPUP_TICKS,
        };
        Self {
            kind,
            age_ticks: 0,
            duration_ticks,
        }
    }

    fn progress(&self) -> f64 {
        self.age_ticks as f64 / self.duration_ticks.max(1) as f64
    }

    pub fn alpha(&self) -> f64 {
        let p = self.progress();
        if p < POPUP_FADE_IN {
            p / POPUP_FADE_IN
        } else if p > 1.0 - POPUP_FADE_OUT {
            ((1.0 - p) / POPUP_FADE_OUT).max(0.0)
        } else {
            1.0
        }
    }

    pub fn scale(&self) -> f64 {
        let p = self.progress();
        if p < POPUP_FADE_IN {
            ease_out_back(p / POPUP_FADE_IN)
        } else {
            1.0
        }
    }

    pub fn is_expired(&self) -> bool {
        self.age_ticks >= self.duration_ticks
    }

    pub fn view(&self) -> PopupView {
        PopupView {
            kind: self.kind,
            alpha: self.alpha(),
            scale: self.scale(),
        }
    }
}

/// All transient visual effects owned by the simulation.
#[derive(Debug, Clone, Default)]
pub struct Effects {
    pub shake: ScreenShake,
    pub popups: Vec<Popup>,
    /// Offset sampled on the last update.
    pub shake_offset: Position,
}

impl Effects {
    pub fn show(&mut self, kind: PopupKind) {
        self.popups.push(Popup::new(kind));
    }

    pub fn update<R: Rng>(&mut self, rng: &mut R) {
        self.shake_offset = self.shake.update(rng);
        for popup in &mut self.popups {
            popup.age_ticks += 1;
        }
        self.popups.retain(|p| !p.is_expired());
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_shake_decays_to_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut shake = ScreenShake::default();
        shake.pulse();
        assert_eq!(shake.magnitude(), SHAKE_PULSE);
        let mut last = f64::MAX;
        for _ in 0..SHAKE_DURATION_TICKS {
            let m = shake.magnitude();
            assert!(m <= last);
            last = m;
            let offset = shake.update(&mut rng);
            let len = (offset.x * offset.x + offset.y * offset.y).sqrt();
            assert!((len - m).abs() < 1e-9);
        }
        assert!(!shake.is_active());
        assert_eq!(shake.update(&mut rng), Position::default());
    }

    #[test]
    fn test_shake_stacks_and_caps() {
        let mut shake = ScreenShake::default();
        for _ in 0..50 {
            shake.pulse();
        }
        assert_eq!(shake.magnitude(), SHAKE_MAX);
    }

    #[test]
    fn test_popup_fades_in_and_out() {
        let mut popup = Popup::new(PopupKind::WaveComplete { wave: 1, bonus: 150 });
        assert_eq!(popup.alpha(), 0.0);
        popup.age_ticks = popup.duration_ticks / 2;
        assert_eq!(popup.alpha(), 1.0);
        assert_eq!(popup.scale(), 1.0);
        popup.age_ticks = popup.duration_ticks - 1;
        assert!(popup.alpha() < 0.1);
        popup.age_ticks = popup.duration_ticks;
        assert!(popup.is_expired());
    }

    #[test]
    fn test_effects_drop_expired_popups() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut effects = Effects::default();
        effects.show(PopupKind::GameOver { wave: 3 });
        for _ in 0..GAME_OVER_POPUP_TICKS - 1 {
            effects.update(&mut rng);
        }
        assert_eq!(effects.popups.len(), 1);
        effects.update(&mut rng);
        assert!(effects.popups.is_empty());
    }

    #[test]
    fn test_ease_out_back_endpoints() {
        assert!(ease_out_back(0.0).abs() < 1e-9);
        assert!((ease_out_back(1.0) - 1.0).abs() < 1e-9);
        assert!(ease_out_back(0.8) > 1.0);
    }
}
