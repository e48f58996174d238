//! Battery decay, signal drift, and low-battery status transition.
//!
//! Runs after movement on every unit regardless of the active strategy.

use rand::Rng;

use aerosight_core::components::Unit;
use aerosight_core::constants::*;
use aerosight_core::enums::UnitStatus;

/// Apply one tick of decay to `unit`.
///
/// `strategy_set_status` is true when the movement strategy already decided
/// the unit's status this tick; that decision wins over the low-battery rule.
pub fn run<R: Rng + ?Sized>(unit: &mut Unit, strategy_set_status: bool, rng: &mut R) {
    unit.battery = (unit.battery - BATTERY_DECAY_PER_TICK).clamp(0.0, GAUGE_MAX);

    let jitter = rng.gen_range(-SIGNAL_JITTER..SIGNAL_JITTER);
    unit.signal = (unit.signal + jitter).clamp(0.0, GAUGE_MAX);

    if !strategy_set_status
        && unit.status == UnitStatus::Active
        && unit.battery < LOW_BATTERY_THRESHOLD
    {
        unit.status = UnitStatus::Returning;
    }
}
