//! Simulation constants and tuning parameters.

use crate::types::GeoPoint;

/// Default scheduler period in milliseconds (1 Hz).
pub const TICK_PERIOD_MS: u64 = 1000;

// --- Decay ---

/// Battery percentage lost every tick.
pub const BATTERY_DECAY_PER_TICK: f64 = 0.005;

/// Half-width of the uniform signal jitter applied each tick.
pub const SIGNAL_JITTER: f64 = 1.0;

/// Battery level below which an active unit starts returning.
pub const LOW_BATTERY_THRESHOLD: f64 = 10.0;

/// Upper bound for battery and signal.
pub const GAUGE_MAX: f64 = 100.0;

// --- Movement ---

/// Maximum per-axis displacement of a random walk step (degrees).
pub const RANDOM_WALK_DELTA: f64 = 0.001;

/// Maximum heading perturbation of a random walk step (degrees).
pub const RANDOM_WALK_HEADING_JITTER: f64 = 5.0;

/// Planar distance below which a unit has reached its destination (degrees).
pub const ARRIVAL_THRESHOLD: f64 = 0.001;

/// Per-tick step toward an intercept target (degrees).
pub const INTERCEPT_STEP: f64 = 0.002;

/// Per-tick step toward base (degrees).
pub const RETURN_TO_BASE_STEP: f64 = 0.003;

/// Per-tick step toward the current patrol waypoint (degrees).
pub const PATROL_STEP: f64 = 0.002;

// --- Default geometry ---

/// Default hostile intercept target.
pub const DEFAULT_INTERCEPT_TARGET: GeoPoint = GeoPoint::new(48.201, 16.378);

/// Default home base.
pub const DEFAULT_BASE: GeoPoint = GeoPoint::new(48.150, 16.300);

/// Default rectangular patrol route, visited in order.
pub const DEFAULT_PATROL_ROUTE: [GeoPoint; 4] = [
    GeoPoint::new(48.180, 16.200),
    GeoPoint::new(48.220, 16.200),
    GeoPoint::new(48.220, 16.400),
    GeoPoint::new(48.180, 16.400),
];

// --- Display ---

/// Size of a map grid cell in degrees.
pub const GRID_CELL_DEG: f64 = 0.1;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
