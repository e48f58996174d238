//! Fleet simulation engine for AEROSIGHT.
//!
//! Owns the unit store, runs movement strategies and decay on every tick,
//! and produces FleetSnapshots for the UI.

pub mod engine;
pub mod fleet_setup;
pub mod store;
pub mod systems;

pub use aerosight_core as core;
pub use engine::{SimConfig, SimulationEngine, OBSERVER_BUFFER};
pub use store::{EntityStore, StoreError};
pub use systems::movement::{apply_strategy, StrategyContext, StrategyError};
