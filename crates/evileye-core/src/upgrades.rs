//! Turret stats and the upgrade ledger that mutates them.
//!
//! Every category is either an infinite geometric schedule or a finite
//! list of tiers. Purchases are the only way a level moves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::errors::{PurchaseError, UnknownCategory};

/// Current turret stats, shared by the primary and every satellite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurretStats {
    pub damage: f64,
    /// Targeting range (px).
    pub range: f64,
    /// Cooldown between shots (ms). Never below `MIN_FIRE_RATE_MS`.
    pub fire_rate_ms: f64,
    /// Projectile speed (px/tick).
    pub bullet_speed: f64,
    pub knockback_force: f64,
    pub bullet_size_multiplier: f64,
    /// Visual size. Not affected by upgrades.
    pub base_radius: f64,
}

impl Default for TurretStats {
    fn default() -> Self {
        Self {
            damage: TURRET_BASE_DAMAGE,
            range: TURRET_BASE_RANGE,
            fire_rate_ms: TURRET_BASE_FIRE_RATE_MS,
            bullet_speed: TURRET_BASE_BULLET_SPEED,
            knockback_force: TURRET_BASE_KNOCKBACK,
            bullet_size_multiplier: TURRET_BASE_BULLET_SIZE,
            base_radius: TURRET_BASE_RADIUS,
        }
    }
}

impl TurretStats {
    /// Cooldown in whole ticks.
    pub fn cooldown_ticks(&self) -> u64 {
        ms_to_ticks(self.fire_rate_ms)
    }

    /// Number of enemies one projectile may damage.
    pub fn pierce_budget(&self) -> u32 {
        1 + ((self.bullet_size_multiplier - 1.0) * PIERCE_PER_SIZE).floor().max(0.0) as u32
    }

    /// Projectile collision radius (px).
    pub fn hit_radius(&self) -> f64 {
        PROJECTILE_HIT_RADIUS * self.bullet_size_multiplier
    }

    fn apply(&mut self, category: UpgradeCategory, effect: f64) {
        match category {
            UpgradeCategory::Damage => self.damage += effect,
            UpgradeCategory::Range => self.range += effect,
            UpgradeCategory::FireRate => {
                self.fire_rate_ms = (self.fire_rate_ms + effect).max(MIN_FIRE_RATE_MS)
            }
            UpgradeCategory::BulletSpeed => self.bullet_speed += effect,
            UpgradeCategory::Knockback => self.knockback_force += effect,
            UpgradeCategory::BulletSize => self.bullet_size_multiplier += effect,
            UpgradeCategory::Multishot => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeCategory {
    Damage,
    Range,
    FireRate,
    BulletSpeed,
    Knockback,
    BulletSize,
    Multishot,
}

impl UpgradeCategory {
    pub const COUNT: usize = 7;

    pub const ALL: [UpgradeCategory; Self::COUNT] = [
        UpgradeCategory::Damage,
        UpgradeCategory::Range,
        UpgradeCategory::FireRate,
        UpgradeCategory::BulletSpeed,
        UpgradeCategory::Knockback,
        UpgradeCategory::BulletSize,
        UpgradeCategory::Multishot,
    ];

    pub fn index(&self) -> usize {
        match self {
            Self::Damage => 0,
            Self::Range => 1,
            Self::FireRate => 2,
            Self::BulletSpeed => 3,
            Self::Knockback => 4,
            Self::BulletSize => 5,
            Self::Multishot => 6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Damage => "damage",
            Self::Range => "range",
            Self::FireRate => "fire_rate",
            Self::BulletSpeed => "bullet_speed",
            Self::Knockback => "knockback",
            Self::BulletSize => "bullet_size",
            Self::Multishot => "multishot",
        }
    }

    /// Player-facing upgrade name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Damage => "Hellfire",
            Self::Range => "Vision",
            Self::FireRate => "Fury",
            Self::BulletSpeed => "Velocity",
            Self::Knockback => "Repulsion",
            Self::BulletSize => "Brimstone",
            Self::Multishot => "Multishot",
        }
    }

    pub fn schedule(&self) -> UpgradeSchedule {
        match self {
            Self::Damage => UpgradeSchedule::Infinite {
                base_cost: 75.0,
                base_effect: 10.0,
                cost_multiplier: 1.5,
                effect_multiplier: 1.2,
            },
            Self::Range => UpgradeSchedule::Tiered(RANGE_TIERS),
            Self::FireRate => UpgradeSchedule::Infinite {
                base_cost: 75.0,
                base_effect: -75.0,
                cost_multiplier: 1.5,
                effect_multiplier: 1.3,
            },
            Self::BulletSpeed => UpgradeSchedule::Infinite {
                base_cost: 100.0,
                base_effect: 1.0,
                cost_multiplier: 1.6,
                effect_multiplier: 1.1,
            },
            Self::Knockback => UpgradeSchedule::Infinite {
                base_cost: 120.0,
                base_effect: 2.0,
                cost_multiplier: 1.5,
                effect_multiplier: 1.15,
            },
            Self::BulletSize => UpgradeSchedule::Tiered(BULLET_SIZE_TIERS),
            Self::Multishot => UpgradeSchedule::Tiered(MULTISHOT_TIERS),
        }
    }

    fn describe_effect(&self, effect: f64) -> String {
        match self {
            Self::Damage => format!("+{} damage", effect),
            Self::Range => format!("+{} range", effect),
            Self::FireRate => format!("{}ms fire delay", effect),
            Self::BulletSpeed => format!("+{} bullet speed", effect),
            Self::Knockback => format!("+{} knockback", effect),
            Self::BulletSize => format!("+{}x bullet size", effect),
            Self::Multishot => format!("+{} satellite eye", effect),
        }
    }
}

impl fmt::Display for UpgradeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpgradeCategory {
    type Err = UnknownCategory;

    /// Accepts snake_case, camelCase or kebab-case identifiers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "damage" => Ok(Self::Damage),
            "range" => Ok(Self::Range),
            "firerate" => Ok(Self::FireRate),
            "bulletspeed" => Ok(Self::BulletSpeed),
            "knockback" => Ok(Self::Knockback),
            "bulletsize" => Ok(Self::BulletSize),
            "multishot" => Ok(Self::Multishot),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// One step of a finite upgrade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeTier {
    pub cost: u64,
    pub effect: f64,
}

const RANGE_TIERS: &[UpgradeTier] = &[
    UpgradeTier { cost: 75, effect: 12.0 },
    UpgradeTier { cost: 150, effect: 15.0 },
    UpgradeTier { cost: 300, effect: 18.0 },
    UpgradeTier { cost: 600, effect: 22.0 },
    UpgradeTier { cost: 1200, effect: 28.0 },
];

const BULLET_SIZE_TIERS: &[UpgradeTier] = &[
    UpgradeTier { cost: 150, effect: 0.25 },
    UpgradeTier { cost: 300, effect: 0.25 },
    UpgradeTier { cost: 600, effect: 0.5 },
    UpgradeTier { cost: 1200, effect: 0.5 },
    UpgradeTier { cost: 2400, effect: 0.5 },
];

const MULTISHOT_TIERS: &[UpgradeTier] = &[
    UpgradeTier { cost: 500, effect: 1.0 },
    UpgradeTier { cost: 1000, effect: 1.0 },
    UpgradeTier { cost: 2000, effect: 1.0 },
    UpgradeTier { cost: 4000, effect: 1.0 },
    UpgradeTier { cost: 8000, effect: 1.0 },
];

/// Cost/effect curve of a category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpgradeSchedule {
    /// cost(L) = floor(base_cost * cost_multiplier^L), same shape for effect.
    Infinite {
        base_cost: f64,
        base_effect: f64,
        cost_multiplier: f64,
        effect_multiplier: f64,
    },
    /// Exhausted once the level equals the tier count.
    Tiered(&'static [UpgradeTier]),
}

impl UpgradeSchedule {
    /// Cost of buying the level after `level`. `None` when exhausted.
    pub fn cost_at(&self, level: u32) -> Option<u64> {
        match self {
            Self::Infinite {
                base_cost,
                cost_multiplier,
                ..
            } => Some((base_cost * cost_multiplier.powi(level as i32)).floor() as u64),
            Self::Tiered(tiers) => tiers.get(level as usize).map(|t| t.cost),
        }
    }

    /// Effect of buying the level after `level`. `None` when exhausted.
    pub fn effect_at(&self, level: u32) -> Option<f64> {
        match self {
            Self::Infinite {
                base_effect,
                effect_multiplier,
                ..
            } => Some((base_effect * effect_multiplier.powi(level as i32)).floor()),
            Self::Tiered(tiers) => tiers.get(level as usize).map(|t| t.effect),
        }
    }

    pub fn max_level(&self) -> Option<u32> {
        match self {
            Self::Infinite { .. } => None,
            Self::Tiered(tiers) => Some(tiers.len() as u32),
        }
    }
}

/// Result of a successful purchase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Applied {
    pub category: UpgradeCategory,
    /// Level after the purchase.
    pub level: u32,
    /// Money debited (0 for free grants).
    pub cost: u64,
    pub effect: f64,
    /// New satellite count; only set for Multishot.
    pub satellites: Option<usize>,
}

/// Turret stats plus the per-category level ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatModel {
    stats: TurretStats,
    levels: [u32; UpgradeCategory::COUNT],
}

impl StatModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &TurretStats {
        &self.stats
    }

    pub fn level(&self, category: UpgradeCategory) -> u32 {
        self.levels[category.index()]
    }

    pub fn next_cost(&self, category: UpgradeCategory) -> Option<u64> {
        category.schedule().cost_at(self.level(category))
    }

    pub fn next_effect(&self, category: UpgradeCategory) -> Option<f64> {
        category.schedule().effect_at(self.level(category))
    }

    pub fn is_maxed(&self, category: UpgradeCategory) -> bool {
        category
            .schedule()
            .max_level()
            .is_some_and(|max| self.level(category) >= max)
    }

    /// Human-readable description of the next level, or `"MAX"`.
    pub fn next_description(&self, category: UpgradeCategory) -> String {
        match self.next_effect(category) {
            Some(effect) => category.describe_effect(effect),
            None => "MAX".to_string(),
        }
    }

    /// Satellite emitters implied by the Multishot level.
    pub fn satellite_count(&self) -> usize {
        let level = self.level(UpgradeCategory::Multishot) as usize;
        MULTISHOT_TIERS
            .iter()
            .take(level)
            .map(|t| t.effect as usize)
            .sum()
    }

    /// Buy the next level of `category`, debiting `money`.
    ///
    /// On rejection neither `money` nor the ledger changes.
    pub fn purchase(
        &mut self,
        category: UpgradeCategory,
        money: &mut u64,
    ) -> Result<Applied, PurchaseError> {
        let (cost, effect) = self.quote(category)?;
        if *money < cost {
            return Err(PurchaseError::InsufficientFunds {
                cost,
                money: *money,
            });
        }
        *money -= cost;
        Ok(self.advance(category, cost, effect))
    }

    /// Advance `category` one level without charging for it.
    pub fn grant(&mut self, category: UpgradeCategory) -> Result<Applied, PurchaseError> {
        let (_, effect) = self.quote(category)?;
        Ok(self.advance(category, 0, effect))
    }

    /// Grant every tiered category to its last tier and every infinite
    /// category `infinite_levels` more levels.
    pub fn max_out(&mut self, infinite_levels: u32) -> Vec<Applied> {
        let mut applied = Vec::new();
        for category in UpgradeCategory::ALL {
            let steps = match category.schedule().max_level() {
                Some(max) => max.saturating_sub(self.level(category)),
                None => infinite_levels,
            };
            for _ in 0..steps {
                if let Ok(a) = self.grant(category) {
                    applied.push(a);
                }
            }
        }
        applied
    }

    fn quote(&self, category: UpgradeCategory) -> Result<(u64, f64), PurchaseError> {
        let schedule = category.schedule();
        let level = self.level(category);
        match (schedule.cost_at(level), schedule.effect_at(level)) {
            (Some(cost), Some(effect)) => Ok((cost, effect)),
            _ => Err(PurchaseError::MaxLevelReached { category }),
        }
    }

    fn advance(&mut self, category: UpgradeCategory, cost: u64, effect: f64) -> Applied {
        self.levels[category.index()] += 1;
        self.stats.apply(category, effect);
        Applied {
            category,
            level: self.level(category),
            cost,
            effect,
            satellites: (category == UpgradeCategory::Multishot).then(|| self.satellite_count()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infinite_schedule_floors() {
        let s = UpgradeCategory::Damage.schedule();
        assert_eq!(s.cost_at(0), Some(75));
        assert_eq!(s.cost_at(1), Some(112));
        assert_eq!(s.cost_at(2), Some(168));
        assert_eq!(s.effect_at(0), Some(10.0));
        assert_eq!(s.effect_at(1), Some(12.0));
        assert_eq!(s.effect_at(2), Some(14.0));
    }

    #[test]
    fn test_fire_rate_effect_is_negative_and_floored() {
        let s = UpgradeCategory::FireRate.schedule();
        assert_eq!(s.effect_at(0), Some(-75.0));
        // -75 * 1.3 = -97.5
        assert_eq!(s.effect_at(1), Some(-98.0));
    }

    #[test]
    fn test_tiered_exhausts() {
        let s = UpgradeCategory::Range.schedule();
        assert_eq!(s.max_level(), Some(5));
        assert_eq!(s.cost_at(4), Some(1200));
        assert_eq!(s.cost_at(5), None);
        assert_eq!(s.effect_at(5), None);
    }

    #[test]
    fn test_pierce_budget_from_bullet_size() {
        let mut stats = TurretStats::default();
        assert_eq!(stats.pierce_budget(), 1);
        stats.bullet_size_multiplier = 1.25;
        assert_eq!(stats.pierce_budget(), 1);
        stats.bullet_size_multiplier = 1.5;
        assert_eq!(stats.pierce_budget(), 2);
        stats.bullet_size_multiplier = 3.0;
        assert_eq!(stats.pierce_budget(), 5);
        assert!((stats.hit_radius() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_category_variants() {
        assert_eq!("fireRate".parse::<UpgradeCategory>(), Ok(UpgradeCategory::FireRate));
        assert_eq!("fire_rate".parse::<UpgradeCategory>(), Ok(UpgradeCategory::FireRate));
        assert_eq!("Bullet-Size".parse::<UpgradeCategory>(), Ok(UpgradeCategory::BulletSize));
        assert_eq!(
            "laser".parse::<UpgradeCategory>(),
            Err(UnknownCategory("laser".to_string()))
        );
        for c in UpgradeCategory::ALL {
            assert_eq!(c.as_str().parse::<UpgradeCategory>(), Ok(c));
        }
    }

    #[test]
    fn test_fire_rate_clamped_at_floor() {
        let mut model = StatModel::new();
        for _ in 0..30 {
            model.grant(UpgradeCategory::FireRate).unwrap();
        }
        assert_eq!(model.stats().fire_rate_ms, MIN_FIRE_RATE_MS);
        assert!(model.stats().cooldown_ticks() > 0);
    }
}
