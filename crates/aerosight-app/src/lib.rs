//! AEROSIGHT runtime.
//!
//! Wraps the headless simulation engine in a wall-clock scheduler thread and
//! exposes the control surface a dashboard drives.

pub mod control;
pub mod game_loop;
pub mod state;

pub use aerosight_core as core;
pub use control::FleetController;
pub use state::RuntimeError;
