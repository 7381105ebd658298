//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only).
//! Per-tick ordering is fixed by `SimulationEngine::run_systems`.

pub mod enemies;
pub mod firing;
pub mod particles;
pub mod projectiles;
pub mod snapshot;
pub mod wave_spawner;
