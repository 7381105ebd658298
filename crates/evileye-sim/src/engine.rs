//! Simulation engine, the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, processes player commands,
//! runs all systems in a fixed order, and produces `GameStateSnapshot`s.
//! Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use evileye_core::commands::{DevAction, PlayerCommand};
use evileye_core::components::Enemy;
use evileye_core::constants::*;
use evileye_core::enums::{AlertLevel, EnemyKind, PopupKind};
use evileye_core::errors::{CommandError, PurchaseError, WaveError};
use evileye_core::events::{Alert, GameEvent};
use evileye_core::state::GameStateSnapshot;
use evileye_core::types::{Position, SimTime};
use evileye_core::upgrades::{Applied, StatModel, UpgradeCategory};
use evileye_core::waves::{completion_bonus, WaveState};

use crate::effects::Effects;
use crate::emitter::Turret;
use crate::systems;
use crate::systems::snapshot::ControlFlags;
use crate::wave::WaveController;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Start the next wave automatically after each completion.
    pub auto_start: bool,
    pub starting_money: u64,
    /// Clamped to `1..=MAX_HEALTH`.
    pub starting_health: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            auto_start: false,
            starting_money: INITIAL_MONEY,
            starting_health: INITIAL_HEALTH,
        }
    }
}

impl SimConfig {
    fn initial_wave_state(&self) -> WaveState {
        WaveState::new(
            self.starting_money,
            self.starting_health.clamp(1, MAX_HEALTH),
        )
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    rng: ChaCha8Rng,
    config: SimConfig,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    events: Vec<GameEvent>,
    alerts: Vec<Alert>,

    wave: WaveState,
    upgrades: StatModel,
    turret: Turret,
    waves: WaveController,
    effects: Effects,

    paused: bool,
    dev_menu_open: bool,
    auto_start: bool,
    next_enemy_serial: u64,
    next_projectile_serial: u64,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        let mut engine = Self {
            world: World::new(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            alerts: Vec::new(),
            wave: config.initial_wave_state(),
            upgrades: StatModel::new(),
            turret: Turret::new(Position::new(BASE_X, BASE_Y)),
            waves: WaveController::default(),
            effects: Effects::default(),
            paused: false,
            dev_menu_open: false,
            auto_start: config.auto_start,
            next_enemy_serial: 0,
            next_projectile_serial: 0,
            config,
        };
        if engine.auto_start {
            engine.waves.schedule_auto_start();
        }
        engine
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    ///
    /// Commands are always applied. While paused no system runs and the
    /// clock does not advance.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if !self.paused {
            self.run_systems();
            self.time.advance();
        }

        self.snapshot()
    }

    /// Build a snapshot without advancing, draining pending events and alerts.
    pub fn snapshot(&mut self) -> GameStateSnapshot {
        let events = std::mem::take(&mut self.events);
        let alerts = std::mem::take(&mut self.alerts);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            &self.wave,
            &self.upgrades,
            &self.turret,
            &self.effects,
            ControlFlags {
                paused: self.paused,
                dev_menu_open: self.dev_menu_open,
                auto_start: self.auto_start,
                auto_start_in_ticks: self.waves.auto_start_in_ticks(),
            },
            events,
            alerts,
        )
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn wave_state(&self) -> &WaveState {
        &self.wave
    }

    pub fn upgrades(&self) -> &StatModel {
        &self.upgrades
    }

    pub fn turret(&self) -> &Turret {
        &self.turret
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Number of enemies currently in the world.
    pub fn live_enemies(&self) -> usize {
        self.world.query::<&Enemy>().iter().count()
    }

    /// Place an enemy for the current wave directly, bypassing the spawner.
    pub fn spawn_enemy_at(&mut self, position: Position) -> hecs::Entity {
        let serial = self.next_enemy_serial;
        self.next_enemy_serial += 1;
        world_setup::spawn_enemy_at(
            &mut self.world,
            position,
            self.wave.wave,
            serial,
            EnemyKind::default(),
        )
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(err) = self.handle_command(command) {
                self.reject(err);
            }
        }
    }

    /// Log a rejected action and surface it as an alert. Never fatal.
    fn reject(&mut self, err: CommandError) {
        let level = if err.is_programmer_error() {
            error!(%err, "invalid command");
            AlertLevel::Critical
        } else {
            warn!(%err, "command rejected");
            AlertLevel::Warning
        };
        self.alerts.push(Alert {
            level,
            message: err.to_string(),
            tick: self.time.tick,
        });
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) -> Result<(), CommandError> {
        match command {
            PlayerCommand::PurchaseUpgrade { category } => {
                let category: UpgradeCategory = category.parse()?;
                self.purchase(category)?;
            }
            PlayerCommand::Heal => {
                let amount = self.wave.heal()?;
                info!(amount, health = self.wave.health, money = self.wave.money, "base healed");
                self.events.push(GameEvent::Healed {
                    amount,
                    health: self.wave.health,
                });
            }
            PlayerCommand::StartWave => {
                self.start_wave()?;
            }
            PlayerCommand::SetAutoStart { enabled } => {
                self.auto_start = enabled;
                if !enabled {
                    self.waves.cancel_auto_start();
                } else if !self.wave.game_running {
                    self.waves.schedule_auto_start();
                }
            }
            PlayerCommand::TogglePause => {
                self.paused = !self.paused;
                info!(paused = self.paused, tick = self.time.tick, "pause toggled");
            }
            PlayerCommand::ToggleDevMenu => {
                self.dev_menu_open = !self.dev_menu_open;
            }
            PlayerCommand::DevKey { key } => {
                if !self.dev_menu_open {
                    return Err(CommandError::DevMenuClosed);
                }
                let action = DevAction::from_key(key).ok_or(CommandError::UnknownDevKey(key))?;
                self.apply_dev_action(action);
            }
        }
        Ok(())
    }

    fn purchase(&mut self, category: UpgradeCategory) -> Result<Applied, PurchaseError> {
        let applied = self.upgrades.purchase(category, &mut self.wave.money)?;
        if let Some(count) = applied.satellites {
            self.turret.set_satellite_count(count);
        }
        info!(
            %category,
            level = applied.level,
            cost = applied.cost,
            money = self.wave.money,
            "upgrade purchased"
        );
        self.events.push(GameEvent::UpgradePurchased {
            category,
            level: applied.level,
            cost: applied.cost,
        });
        Ok(applied)
    }

    fn start_wave(&mut self) -> Result<u32, WaveError> {
        let count = self.waves.start(&mut self.wave)?;
        info!(wave = self.wave.wave, enemies = count, "wave started");
        self.events.push(GameEvent::WaveStarted {
            wave: self.wave.wave,
            enemies: count,
        });
        Ok(count)
    }

    fn apply_dev_action(&mut self, action: DevAction) {
        info!(?action, "dev action");
        match action {
            DevAction::AddMoney => self.wave.money += DEV_SMALL_GRANT,
            DevAction::AddMoreMoney => self.wave.money += DEV_LARGE_GRANT,
            DevAction::MaxUpgrades => {
                self.upgrades.max_out(DEV_INFINITE_LEVELS);
                self.turret
                    .set_satellite_count(self.upgrades.satellite_count());
            }
            DevAction::SkipWave => {
                self.despawn_enemies();
                self.waves.reset();
                let skipped = self.wave.wave;
                self.wave.enemies_left_to_spawn = 0;
                self.wave.game_running = false;
                self.wave.money += completion_bonus(skipped);
                self.wave.wave += 1;
                if self.auto_start {
                    self.waves.schedule_auto_start();
                }
            }
            DevAction::KillAllEnemies => self.despawn_enemies(),
            DevAction::FullHeal => self.wave.health = MAX_HEALTH,
        }
    }

    /// Remove every enemy without paying rewards.
    fn despawn_enemies(&mut self) {
        self.despawn_buffer.clear();
        self.despawn_buffer
            .extend(self.world.query::<&Enemy>().iter().map(|(entity, _)| entity));
        for entity in self.despawn_buffer.drain(..) {
            let _ = self.world.despawn(entity);
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let now = self.time.tick;

        // 1. Auto-start countdown
        if self.waves.tick_auto_start() {
            if let Err(err) = self.start_wave() {
                self.reject(err.into());
            }
        }
        // 2. Wave spawning
        systems::wave_spawner::run(
            &mut self.world,
            &mut self.rng,
            &mut self.waves,
            &mut self.wave,
            &mut self.next_enemy_serial,
            &mut self.events,
        );
        // 3. Enemy movement, knockback, reach-base
        let destroyed = systems::enemies::run(
            &mut self.world,
            &mut self.wave,
            &mut self.events,
            &mut self.despawn_buffer,
        );
        if destroyed {
            self.game_over();
            return;
        }
        // 4. Emitters: retarget, rotate, fire
        systems::firing::run(
            &mut self.world,
            &mut self.rng,
            &mut self.turret,
            self.upgrades.stats(),
            now,
            &mut self.next_projectile_serial,
            &mut self.events,
        );
        // 5. Projectiles: move, hit, pierce, knockback
        systems::projectiles::run(
            &mut self.world,
            &mut self.rng,
            self.upgrades.stats(),
            &mut self.effects,
            &mut self.events,
            &mut self.despawn_buffer,
        );
        // 6. Dead enemies pay out
        systems::enemies::collect_dead(
            &mut self.world,
            &mut self.wave,
            &mut self.events,
            &mut self.despawn_buffer,
        );
        // 7. Particles
        systems::particles::run(&mut self.world, &mut self.despawn_buffer);
        // 8. Shake and popups
        self.effects.update(&mut self.rng);
        // 9. Wave completion
        self.check_wave_complete();
    }

    fn check_wave_complete(&mut self) {
        if !self.wave.is_complete(self.live_enemies()) {
            return;
        }
        let (wave, bonus) = self.wave.complete();
        info!(wave, bonus, money = self.wave.money, "wave complete");
        self.events.push(GameEvent::WaveComplete { wave, bonus });
        self.effects.show(PopupKind::WaveComplete { wave, bonus });
        if self.auto_start {
            self.waves.schedule_auto_start();
        }
    }

    /// Reset wave, economy, stats, upgrades and the turret, and clear every entity.
    fn game_over(&mut self) {
        let wave = self.wave.wave;
        info!(wave, "game over");

        self.world.clear();
        self.despawn_buffer.clear();
        self.wave = self.config.initial_wave_state();
        self.upgrades = StatModel::new();
        self.turret.reset();
        self.waves.reset();
        self.effects.clear();
        self.effects.show(PopupKind::GameOver { wave });
        if self.auto_start {
            self.waves.schedule_auto_start();
        }

        self.events.push(GameEvent::GameOver { wave });
        self.alerts.push(Alert {
            level: AlertLevel::Critical,
            message: format!("Base destroyed on wave {wave}"),
            tick: self.time.tick,
        });
    }
}
