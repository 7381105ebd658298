//! EVILEYE runner.
//!
//! Wires the simulation engine to a game-loop thread or a headless
//! fast-forward run, with an optional autopilot standing in for the UI.

pub mod autopilot;
pub mod config;
pub mod control;
pub mod game_loop;
pub mod state;

pub use evileye_core as core;
