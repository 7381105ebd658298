//! Control surface for a realtime session.
//!
//! Bridges callers to the game loop thread via channels. Every entry point
//! returns `Result<_, String>` so it can sit directly behind a UI binding.

use evileye_core::commands::PlayerCommand;
use evileye_core::state::GameStateSnapshot;
use evileye_sim::SimConfig;
use tracing::info;

use crate::game_loop;
use crate::state::{AppState, GameLoopCommand};

/// Start the simulation. Spawns the game loop thread if not already running.
pub fn start_simulation(state: &AppState, config: SimConfig) -> Result<(), String> {
    let mut running = state.running.lock().map_err(|e| e.to_string())?;

    if *running {
        return Err("Simulation already running".into());
    }

    let (cmd_tx, handle) = game_loop::spawn_game_loop(config, state.latest_snapshot.clone())?;

    let mut tx_lock = state.command_tx.lock().map_err(|e| e.to_string())?;
    *tx_lock = Some(cmd_tx);
    let mut handle_lock = state.loop_handle.lock().map_err(|e| e.to_string())?;
    *handle_lock = Some(handle);
    *running = true;

    Ok(())
}

/// Send a player command to the simulation.
pub fn send_command(state: &AppState, command: PlayerCommand) -> Result<(), String> {
    let tx_lock = state.command_tx.lock().map_err(|e| e.to_string())?;

    match tx_lock.as_ref() {
        Some(tx) => tx
            .send(GameLoopCommand::PlayerCommand(command))
            .map_err(|e| format!("Failed to send command: {}", e)),
        None => Err("Simulation not started".into()),
    }
}

/// Get the latest snapshot synchronously (for polling / initial state).
pub fn get_snapshot(state: &AppState) -> Result<Option<GameStateSnapshot>, String> {
    let lock = state.latest_snapshot.lock().map_err(|e| e.to_string())?;
    Ok(lock.clone())
}

/// Stop the game loop and wait for the thread to exit.
pub fn stop_simulation(state: &AppState) -> Result<(), String> {
    let mut running = state.running.lock().map_err(|e| e.to_string())?;
    if !*running {
        return Err("Simulation not started".into());
    }

    if let Some(tx) = state.command_tx.lock().map_err(|e| e.to_string())?.take() {
        // A disconnected receiver means the loop already exited.
        let _ = tx.send(GameLoopCommand::Shutdown);
    }
    if let Some(handle) = state.loop_handle.lock().map_err(|e| e.to_string())?.take() {
        handle
            .join()
            .map_err(|_| "Game loop thread panicked".to_string())?;
    }
    *running = false;
    info!("simulation stopped");

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_commands_rejected_before_start() {
        let state = AppState::new();
        assert!(send_command(&state, PlayerCommand::StartWave).is_err());
        assert!(stop_simulation(&state).is_err());
        assert!(get_snapshot(&state).unwrap().is_none());
    }

    #[test]
    fn test_start_send_stop() {
        let state = AppState::new();
        start_simulation(&state, SimConfig::default()).unwrap();
        assert!(start_simulation(&state, SimConfig::default()).is_err());

        send_command(&state, PlayerCommand::TogglePause).unwrap();
        std::thread::sleep(Duration::from_millis(100));
        let snap = get_snapshot(&state).unwrap().expect("loop has ticked");
        assert!(snap.paused);

        stop_simulation(&state).unwrap();
        assert!(!*state.running.lock().unwrap());
        assert!(send_command(&state, PlayerCommand::StartWave).is_err());
    }
}
