//! Fleet snapshot: the complete visible state handed to the UI.

use serde::{Deserialize, Serialize};

use crate::components::Unit;
use crate::enums::*;
use crate::events::FleetEvent;
use crate::types::SimTime;

/// Immutable view of the fleet, published after every tick or command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    pub time: SimTime,
    pub scheduler: SchedulerState,
    pub strategy: StrategyKind,
    /// Units in stable store order.
    pub units: Vec<Unit>,
    /// Latest committed state of the selected unit, if any.
    pub selected: Option<Unit>,
    pub summary: FleetSummary,
    /// Events raised since the previous snapshot.
    pub events: Vec<FleetEvent>,
}

/// Status counts for the dashboard header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetSummary {
    pub total: u32,
    pub active: u32,
    pub returning: u32,
    pub maintenance: u32,
}

impl FleetSnapshot {
    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn is_running(&self) -> bool {
        self.scheduler == SchedulerState::Running
    }
}

impl FleetSummary {
    pub fn from_units(units: &[Unit]) -> Self {
        let mut summary = FleetSummary {
            total: units.len() as u32,
            ..Default::default()
        };
        for unit in units {
            match unit.status {
                UnitStatus::Active => summary.active += 1,
                UnitStatus::Returning => summary.returning += 1,
                UnitStatus::Maintenance => summary.maintenance += 1,
            }
        }
        summary
    }
}
