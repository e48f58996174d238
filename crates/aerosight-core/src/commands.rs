//! Operator commands sent from the UI to the simulation.
//!
//! Commands are applied between ticks, never in the middle of one.

use serde::{Deserialize, Serialize};

use crate::components::UnitPatch;
use crate::enums::*;
use crate::types::GeoPoint;

/// All possible operator actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FleetCommand {
    // --- Selection ---
    /// Select a unit. Selecting the already-selected unit clears the selection.
    SelectUnit { id: String },
    /// Clear the selection.
    DeselectUnit,

    // --- Unit updates ---
    /// Switch a unit's payload to one of its supported modes.
    SetPayloadMode { id: String, mode: String },
    /// Override a unit's status (e.g. send it to maintenance).
    SetUnitStatus { id: String, status: UnitStatus },
    /// Merge an arbitrary partial update into one unit.
    UpdateUnit { id: String, patch: UnitPatch },

    // --- Scheduler control ---
    Start,
    Stop,
    Toggle,
    /// Swap the movement strategy used from the next tick on.
    SetStrategy { strategy: StrategyKind },
    /// Move the hostile-intercept target.
    SetTarget { target: GeoPoint },
}
