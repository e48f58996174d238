//! Events emitted by the simulation for UI feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::GeoPoint;

/// Notable things that happened since the previous snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FleetEvent {
    /// A unit changed status during a tick.
    StatusChanged {
        id: String,
        from: UnitStatus,
        to: UnitStatus,
    },
    /// A patrolling unit reached a waypoint and moved on to the next one.
    WaypointReached { id: String, index: usize },
    /// The movement strategy could not be applied; the unit was left as-is.
    StrategyFailed { id: String, reason: String },
    /// Scheduler started or stopped.
    SchedulerChanged { state: SchedulerState },
    /// The active movement strategy was swapped.
    StrategyChanged { strategy: StrategyKind },
    /// The target/base/patrol geometry was replaced.
    ContextChanged { target: GeoPoint, base: GeoPoint },
}
