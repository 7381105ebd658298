//! Session state shared by the control surface and the loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use evileye_core::commands::PlayerCommand;
use evileye_core::state::GameStateSnapshot;

/// Messages accepted by the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    PlayerCommand(PlayerCommand),
    /// Stop ticking and let the thread exit.
    Shutdown,
}

/// Handles for one realtime session, owned by whoever drives `control`.
///
/// Every field sits behind a `Mutex` so the struct can be shared by
/// reference across threads. The snapshot slot is additionally `Arc`-shared
/// with the loop thread, which overwrites it once per tick.
pub struct AppState {
    /// Set by `start_simulation`, taken by `stop_simulation`.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    pub latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    pub loop_handle: Mutex<Option<JoinHandle<()>>>,
    pub running: Mutex<bool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            loop_handle: Mutex::new(None),
            running: Mutex::new(false),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
