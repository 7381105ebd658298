//! Simulation engine for EVILEYE.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces GameStateSnapshots for the renderer.

pub mod effects;
pub mod emitter;
pub mod engine;
pub mod systems;
pub mod wave;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use evileye_core as core;
