//! Fleet setup: seeds the store with a generated batch of units.
//!
//! Only the fields the simulation reads are meaningful; model names and
//! payload kinds are there so the dashboard has something to show.

use rand::seq::{index, SliceRandom};
use rand::Rng;

use aerosight_core::components::{PayloadConfig, Unit};
use aerosight_core::enums::UnitStatus;
use aerosight_core::types::GeoPoint;

/// Default operating area centre.
pub const DEFAULT_AREA_CENTER: GeoPoint = GeoPoint::new(52.1986, 8.5911);

/// Units spawn within this many degrees of the area centre on each axis.
pub const SPAWN_SPREAD_DEG: f64 = 0.1;

const MODELS: [&str; 5] = [
    "Raven-X",
    "Raven-II",
    "Predator-Mini",
    "Reaper-Lite",
    "Global Hawk",
];

/// Payload kinds and the modes each supports. The first mode is the default.
const PAYLOADS: [(&str, &[&str]); 4] = [
    ("EO/IR_MK4", &["Thermal", "Night", "RGB"]),
    ("EO/IR_MK3", &["Thermal", "RGB"]),
    ("RADAR_X1", &["Ground", "Air", "Maritime"]),
    ("SIGINT_A2", &["COMINT", "ELINT"]),
];

/// First and one-past-last number of the `UA-` id range drawn from at random.
const ID_RANGE: (usize, usize) = (100, 300);

/// Generate `count` units with unique ids around `center`.
pub fn generate_fleet<R: Rng + ?Sized>(rng: &mut R, count: usize, center: GeoPoint) -> Vec<Unit> {
    let (first, end) = ID_RANGE;
    let span = end - first;
    let drawn = count.min(span);

    let mut numbers: Vec<usize> = index::sample(rng, span, drawn)
        .into_iter()
        .map(|n| first + n)
        .collect();
    // Past the random range, keep counting upward.
    numbers.extend((end..).take(count - drawn));

    numbers
        .into_iter()
        .map(|n| spawn_unit(rng, format!("UA-{n}"), center))
        .collect()
}

/// Generate one active unit with the given id.
pub fn spawn_unit<R: Rng + ?Sized>(rng: &mut R, id: String, center: GeoPoint) -> Unit {
    let (kind, modes) = PAYLOADS[rng.gen_range(0..PAYLOADS.len())];
    let modes: Vec<String> = modes.iter().map(|m| m.to_string()).collect();
    let model = MODELS.choose(rng).copied().unwrap_or(MODELS[0]);

    Unit {
        id,
        model: model.to_string(),
        status: UnitStatus::Active,
        battery: rng.gen_range(60.0..=100.0),
        signal: rng.gen_range(80.0..=100.0),
        position: GeoPoint::new(
            center.lat + rng.gen_range(-SPAWN_SPREAD_DEG..=SPAWN_SPREAD_DEG),
            center.lng + rng.gen_range(-SPAWN_SPREAD_DEG..=SPAWN_SPREAD_DEG),
        ),
        heading: rng.gen_range(0.0..360.0),
        altitude: rng.gen_range(1000.0..6000.0),
        speed: rng.gen_range(20.0..70.0),
        payload: PayloadConfig {
            kind: kind.to_string(),
            current_mode: modes[0].clone(),
            modes,
        },
        waypoint_index: 0,
    }
}
