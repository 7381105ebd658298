//! Core types and definitions for the EVILEYE simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, state snapshots, events, errors, the wave curves
//! and the upgrade-driven stat model. It has no dependency on any runtime.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod errors;
pub mod events;
pub mod state;
pub mod types;
pub mod upgrades;
pub mod waves;
