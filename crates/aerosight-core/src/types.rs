//! Fundamental geographic and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::{EARTH_RADIUS_KM, GRID_CELL_DEG};

/// A point on the map in decimal degrees.
///
/// Movement math treats degrees as a flat plane: longitude is the x axis
/// (East) and latitude the y axis (North).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of committed ticks.
    pub tick: u64,
    /// Nominal simulated seconds (tick count times the tick period).
    pub elapsed_secs: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Planar vector form (x = lng, y = lat).
    pub fn as_dvec2(&self) -> DVec2 {
        DVec2::new(self.lng, self.lat)
    }

    pub fn from_dvec2(v: DVec2) -> Self {
        Self { lat: v.y, lng: v.x }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Planar distance in degrees (not geodesic).
    pub fn planar_distance_to(&self, other: &GeoPoint) -> f64 {
        (other.as_dvec2() - self.as_dvec2()).length()
    }

    /// Planar heading to another point in degrees (0 = North, clockwise).
    pub fn planar_heading_to(&self, other: &GeoPoint) -> f64 {
        let d = other.as_dvec2() - self.as_dvec2();
        normalize_heading(d.x.atan2(d.y).to_degrees())
    }

    /// Great-circle distance in kilometres.
    pub fn haversine_km(&self, other: &GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
    }

    /// Map grid cell label, e.g. `"E6"`.
    pub fn grid_reference(&self) -> String {
        const LETTERS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
        let row = (self.lat / GRID_CELL_DEG).floor() as i64;
        let col = (self.lng / GRID_CELL_DEG).floor() as i64;
        let letter = LETTERS[(row.unsigned_abs() % 26) as usize] as char;
        format!("{}{}", letter, col.unsigned_abs() % 10)
    }
}

/// Wrap a heading into `[0, 360)`.
pub fn normalize_heading(heading: f64) -> f64 {
    let wrapped = heading.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

impl SimTime {
    /// Advance by one tick of `period_secs`.
    pub fn advance(&mut self, period_secs: f64) {
        self.tick += 1;
        self.elapsed_secs += period_secs;
    }
}
