//! Unit records and partial updates.
//!
//! These are plain data structs. Behaviour that mutates them lives in the
//! simulation crate.

use serde::{Deserialize, Serialize};

use crate::enums::UnitStatus;
use crate::types::GeoPoint;

/// Sensor payload carried by a unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayloadConfig {
    /// Payload designation, e.g. `EO/IR_MK4`.
    pub kind: String,
    /// Modes this payload supports. Fixed for the lifetime of the unit.
    pub modes: Vec<String>,
    /// Currently selected mode, always one of `modes`.
    pub current_mode: String,
}

/// One tracked mobile unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub model: String,
    pub status: UnitStatus,
    /// Battery percentage, 0-100.
    pub battery: f64,
    /// Link strength (dB-like), 0-100.
    pub signal: f64,
    pub position: GeoPoint,
    /// Degrees, 0 = North, clockwise, in `[0, 360)`.
    pub heading: f64,
    /// Meters. Informational only.
    pub altitude: f64,
    /// m/s. Informational only.
    pub speed: f64,
    pub payload: PayloadConfig,
    /// Index of the patrol waypoint this unit is heading for.
    #[serde(default)]
    pub waypoint_index: usize,
}

/// Partial update merged into a unit. `None` leaves the field untouched.
///
/// The id is deliberately absent: ids never change after creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitPatch {
    pub status: Option<UnitStatus>,
    pub battery: Option<f64>,
    pub signal: Option<f64>,
    pub position: Option<GeoPoint>,
    pub heading: Option<f64>,
    pub altitude: Option<f64>,
    pub speed: Option<f64>,
    pub payload_mode: Option<String>,
    pub waypoint_index: Option<usize>,
}

/// Per-tick output of a movement strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementPatch {
    pub position: GeoPoint,
    pub heading: f64,
    pub status: Option<UnitStatus>,
    pub waypoint_index: Option<usize>,
    /// The unit was already within the arrival threshold of its destination.
    pub arrived: bool,
}
