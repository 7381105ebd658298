//! Game loop thread: runs the simulation engine at 60Hz and publishes snapshots.
//!
//! The engine is created inside the thread so it never crosses a thread
//! boundary. Commands arrive via `mpsc` channel; the latest snapshot is kept
//! in shared state for synchronous polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use evileye_core::constants::TICK_RATE;
use evileye_core::events::GameEvent;
use evileye_core::state::GameStateSnapshot;
use evileye_sim::{SimConfig, SimulationEngine};

use crate::autopilot::Autopilot;
use crate::state::GameLoopCommand;

/// Nominal duration of one tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop(
    config: SimConfig,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
) -> Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>), String> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("evileye-game-loop".into())
        .spawn(move || {
            run_game_loop(config, cmd_rx, &latest_snapshot);
        })
        .map_err(|e| format!("Failed to spawn game loop thread: {}", e))?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    config: SimConfig,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) {
    let mut engine = SimulationEngine::new(config);
    let mut next_tick_time = Instant::now();
    info!(seed = engine.config().seed, "game loop started");

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    info!(tick = engine.time().tick, "game loop stopped");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick (engine handles pause internally)
        let snapshot = engine.tick();
        log_milestones(&snapshot);

        // 3. Store latest snapshot for synchronous polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 4. Sleep until next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind, reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}

/// Summary of a headless run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub ticks: u64,
    pub final_snapshot: GameStateSnapshot,
    pub waves_completed: u32,
    pub game_overs: u32,
    pub kills: u32,
}

/// Run the engine flat out for `ticks` ticks, optionally driven by an autopilot.
pub fn run_headless(
    engine: &mut SimulationEngine,
    ticks: u64,
    autopilot: Option<&Autopilot>,
) -> RunSummary {
    let mut snapshot = engine.snapshot();
    let mut waves_completed = 0;
    let mut game_overs = 0;
    let mut kills = 0;

    for _ in 0..ticks {
        if let Some(pilot) = autopilot {
            engine.queue_commands(pilot.decide(&snapshot));
        }
        snapshot = engine.tick();
        log_milestones(&snapshot);
        for event in &snapshot.events {
            match event {
                GameEvent::WaveComplete { .. } => waves_completed += 1,
                GameEvent::GameOver { .. } => game_overs += 1,
                GameEvent::EnemyKilled { .. } => kills += 1,
                _ => {}
            }
        }
    }

    RunSummary {
        ticks,
        final_snapshot: snapshot,
        waves_completed,
        game_overs,
        kills,
    }
}

fn log_milestones(snapshot: &GameStateSnapshot) {
    for event in &snapshot.events {
        match event {
            GameEvent::WaveComplete { wave, bonus } => {
                debug!(wave, bonus, money = snapshot.money, health = snapshot.health, "milestone: wave cleared");
            }
            GameEvent::GameOver { wave } => {
                debug!(wave, tick = snapshot.time.tick, "milestone: base destroyed");
            }
            _ => {}
        }
    }
}
