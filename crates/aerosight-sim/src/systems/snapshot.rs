//! Snapshot system: reads the store and builds a complete FleetSnapshot.
//!
//! This system is read-only: it never modifies the store.

use aerosight_core::enums::{SchedulerState, StrategyKind};
use aerosight_core::events::FleetEvent;
use aerosight_core::state::{FleetSnapshot, FleetSummary};
use aerosight_core::types::SimTime;

use crate::store::EntityStore;

/// Build a FleetSnapshot from the current store contents.
pub fn build_snapshot(
    store: &EntityStore,
    time: &SimTime,
    scheduler: SchedulerState,
    strategy: StrategyKind,
    events: Vec<FleetEvent>,
) -> FleetSnapshot {
    FleetSnapshot {
        time: *time,
        scheduler,
        strategy,
        units: store.units().to_vec(),
        selected: store.selected().cloned(),
        summary: FleetSummary::from_units(store.units()),
        events,
    }
}
