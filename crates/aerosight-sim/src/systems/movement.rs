//! Movement strategies.
//!
//! Every strategy is a pure function of the unit, the strategy context and
//! the RNG. Dispatch goes through [`apply_strategy`]; the engine decides what
//! to do with a failure (skip that unit for the tick).

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use aerosight_core::components::{MovementPatch, Unit};
use aerosight_core::constants::*;
use aerosight_core::enums::{StrategyKind, UnitStatus};
use aerosight_core::types::{normalize_heading, GeoPoint};

/// External geometry the target-seeking strategies steer toward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyContext {
    /// Hostile intercept target.
    pub target: GeoPoint,
    /// Home base for return-to-base.
    pub base: GeoPoint,
    /// Ordered patrol waypoints, cycled forever.
    pub patrol_route: Vec<GeoPoint>,
}

impl Default for StrategyContext {
    fn default() -> Self {
        Self {
            target: DEFAULT_INTERCEPT_TARGET,
            base: DEFAULT_BASE,
            patrol_route: DEFAULT_PATROL_ROUTE.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StrategyError {
    #[error("unit `{id}` has a non-finite position or heading")]
    InvalidUnitState { id: String },
    #[error("intercept target is not a finite point")]
    InvalidTarget,
    #[error("patrol route has no waypoints")]
    EmptyPatrolRoute,
    #[error("{strategy} produced a non-finite patch for unit `{id}`")]
    MalformedPatch { strategy: StrategyKind, id: String },
}

/// Compute this tick's movement for one unit.
pub fn apply_strategy<R: Rng + ?Sized>(
    kind: StrategyKind,
    unit: &Unit,
    ctx: &StrategyContext,
    rng: &mut R,
) -> Result<MovementPatch, StrategyError> {
    if !unit.position.is_finite() || !unit.heading.is_finite() {
        return Err(StrategyError::InvalidUnitState {
            id: unit.id.clone(),
        });
    }

    let patch = match kind {
        StrategyKind::RandomWalk => random_walk(unit, rng),
        StrategyKind::HostileIntercept => hostile_intercept(unit, &ctx.target),
        StrategyKind::ReturnToBase => return_to_base(unit, &ctx.base),
        StrategyKind::PatrolPattern => patrol(unit, &ctx.patrol_route)?,
    };

    if !patch.position.is_finite() || !patch.heading.is_finite() {
        return Err(StrategyError::MalformedPatch {
            strategy: kind,
            id: unit.id.clone(),
        });
    }
    Ok(patch)
}

/// Write a movement patch into a unit.
pub fn apply_patch(unit: &mut Unit, patch: &MovementPatch) {
    unit.position = patch.position;
    unit.heading = normalize_heading(patch.heading);
    if let Some(status) = patch.status {
        unit.status = status;
    }
    if let Some(index) = patch.waypoint_index {
        unit.waypoint_index = index;
    }
}

fn random_walk<R: Rng + ?Sized>(unit: &Unit, rng: &mut R) -> MovementPatch {
    let d_lat = rng.gen_range(-RANDOM_WALK_DELTA..=RANDOM_WALK_DELTA);
    let d_lng = rng.gen_range(-RANDOM_WALK_DELTA..=RANDOM_WALK_DELTA);
    let d_heading = rng.gen_range(-RANDOM_WALK_HEADING_JITTER..=RANDOM_WALK_HEADING_JITTER);

    MovementPatch {
        position: GeoPoint::new(unit.position.lat + d_lat, unit.position.lng + d_lng),
        heading: normalize_heading(unit.heading + d_heading),
        status: None,
        waypoint_index: None,
        arrived: false,
    }
}

fn hostile_intercept(unit: &Unit, target: &GeoPoint) -> MovementPatch {
    let steer = steer_toward(&unit.position, target, INTERCEPT_STEP);
    MovementPatch {
        position: steer.position,
        heading: steer.heading,
        status: None,
        waypoint_index: None,
        arrived: steer.arrived,
    }
}

fn return_to_base(unit: &Unit, base: &GeoPoint) -> MovementPatch {
    let steer = steer_toward(&unit.position, base, RETURN_TO_BASE_STEP);
    let status = if steer.arrived {
        UnitStatus::Maintenance
    } else {
        UnitStatus::Returning
    };
    MovementPatch {
        position: steer.position,
        heading: steer.heading,
        status: Some(status),
        waypoint_index: None,
        arrived: steer.arrived,
    }
}

fn patrol(unit: &Unit, route: &[GeoPoint]) -> Result<MovementPatch, StrategyError> {
    if route.is_empty() {
        return Err(StrategyError::EmptyPatrolRoute);
    }
    let index = unit.waypoint_index % route.len();
    let steer = steer_toward(&unit.position, &route[index], PATROL_STEP);
    // The next waypoint is targeted from the following tick on.
    let next_index = if steer.arrived {
        (index + 1) % route.len()
    } else {
        index
    };
    Ok(MovementPatch {
        position: steer.position,
        heading: steer.heading,
        status: None,
        waypoint_index: Some(next_index),
        arrived: steer.arrived,
    })
}

struct Steer {
    position: GeoPoint,
    heading: f64,
    arrived: bool,
}

/// Planar step of at most `step` degrees toward `to`.
///
/// Within the arrival threshold the position is kept and only the heading
/// is refreshed.
fn steer_toward(from: &GeoPoint, to: &GeoPoint, step: f64) -> Steer {
    let delta = to.as_dvec2() - from.as_dvec2();
    let distance = delta.length();
    let heading = normalize_heading(delta.x.atan2(delta.y).to_degrees());

    if distance < ARRIVAL_THRESHOLD {
        return Steer {
            position: *from,
            heading,
            arrived: true,
        };
    }

    let rad = heading.to_radians();
    let direction = DVec2::new(rad.sin(), rad.cos());
    let moved = from.as_dvec2() + direction * step.min(distance);
    Steer {
        position: GeoPoint::from_dvec2(moved),
        heading,
        arrived: false,
    }
}
