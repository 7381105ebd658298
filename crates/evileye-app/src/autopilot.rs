//! Scripted player used by headless runs.
//!
//! Reads only the published snapshot, so it sees exactly what a UI would.

use evileye_core::commands::PlayerCommand;
use evileye_core::state::GameStateSnapshot;

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Heal between waves once health drops below this.
    pub heal_below: u32,
    /// Buy upgrades while a wave is running, not just between waves.
    pub shop_mid_wave: bool,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            heal_below: 60,
            shop_mid_wave: true,
        }
    }
}

impl Autopilot {
    pub fn new(heal_below: u32) -> Self {
        Self {
            heal_below,
            ..Default::default()
        }
    }

    /// Commands to issue after seeing `snapshot`. At most one purchase per tick.
    pub fn decide(&self, snapshot: &GameStateSnapshot) -> Vec<PlayerCommand> {
        let mut commands = Vec::new();
        if snapshot.paused {
            return commands;
        }

        let idle = !snapshot.game_running;
        let wants_heal = idle && snapshot.health < self.heal_below && snapshot.heal.available;
        if wants_heal {
            commands.push(PlayerCommand::Heal);
        }

        // Heal money is spent first, so only shop with what is left over.
        let budget = if wants_heal {
            snapshot.money.saturating_sub(snapshot.heal.cost)
        } else {
            snapshot.money
        };
        if idle || self.shop_mid_wave {
            if let Some(category) = cheapest_upgrade(snapshot, budget) {
                commands.push(PlayerCommand::PurchaseUpgrade { category });
            }
        }

        if idle && snapshot.auto_start_in_ticks.is_none() {
            commands.push(PlayerCommand::StartWave);
        }
        commands
    }
}

fn cheapest_upgrade(snapshot: &GameStateSnapshot, budget: u64) -> Option<String> {
    snapshot
        .upgrades
        .iter()
        .filter(|u| !u.maxed)
        .filter_map(|u| u.cost.filter(|&c| c <= budget).map(|c| (c, u.category)))
        .min_by_key(|(cost, _)| *cost)
        .map(|(_, category)| category.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use evileye_core::state::{HealView, UpgradeView};
    use evileye_core::upgrades::UpgradeCategory;

    fn view(category: UpgradeCategory, cost: Option<u64>) -> UpgradeView {
        UpgradeView {
            category,
            name: category.display_name().to_string(),
            level: 0,
            cost,
            next_effect: None,
            description: String::new(),
            maxed: cost.is_none(),
            affordable: false,
        }
    }

    fn idle_snapshot(money: u64) -> GameStateSnapshot {
        GameStateSnapshot {
            money,
            health: 100,
            upgrades: vec![
                view(UpgradeCategory::Damage, Some(75)),
                view(UpgradeCategory::FireRate, Some(60)),
                view(UpgradeCategory::Range, None),
                view(UpgradeCategory::Multishot, Some(500)),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_buys_cheapest_then_starts_wave() {
        let commands = Autopilot::default().decide(&idle_snapshot(100));
        assert_eq!(
            commands,
            vec![
                PlayerCommand::PurchaseUpgrade {
                    category: "fire_rate".into()
                },
                PlayerCommand::StartWave,
            ]
        );
    }

    #[test]
    fn test_heals_before_shopping() {
        let mut snap = idle_snapshot(120);
        snap.health = 30;
        snap.heal = HealView {
            cost: 50,
            amount: 50,
            available: true,
        };
        let commands = Autopilot::default().decide(&snap);
        assert_eq!(commands[0], PlayerCommand::Heal);
        // 70 left after healing covers fire rate only.
        assert_eq!(
            commands[1],
            PlayerCommand::PurchaseUpgrade {
                category: "fire_rate".into()
            }
        );
    }

    #[test]
    fn test_waits_for_auto_start_countdown() {
        let mut snap = idle_snapshot(0);
        snap.auto_start_in_ticks = Some(30);
        assert!(Autopilot::default().decide(&snap).is_empty());
    }

    #[test]
    fn test_idle_while_paused() {
        let mut snap = idle_snapshot(1_000);
        snap.paused = true;
        assert!(Autopilot::default().decide(&snap).is_empty());
    }

    #[test]
    fn test_no_heal_or_start_mid_wave() {
        let mut snap = idle_snapshot(0);
        snap.game_running = true;
        snap.health = 10;
        snap.heal.available = false;
        assert!(Autopilot::new(90).decide(&snap).is_empty());
    }
}
