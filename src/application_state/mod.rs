//! # Application State
//!
//! Everything that sits between the outside world and the engine:
//! - Configuration loading and validation
//! - Input handling, from window events to per-tick snapshots
//!
//! The engine only ever sees an `EngineConfig` at startup and one
//! `InputSnapshot` per tick.

pub mod config;
pub mod input_manager;
pub mod input_state;
