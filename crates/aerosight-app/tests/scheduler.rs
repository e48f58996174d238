//! Wall-clock scheduler tests. Periods are short and assertions are loose
//! lower bounds so a loaded machine does not make them flaky.

use std::sync::Arc;
use std::time::{Duration, Instant};

use aerosight_app::FleetController;
use aerosight_core::commands::FleetCommand;
use aerosight_core::components::{PayloadConfig, Unit};
use aerosight_core::enums::{SchedulerState, StrategyKind, UnitStatus};
use aerosight_core::state::FleetSnapshot;
use aerosight_core::types::GeoPoint;
use aerosight_sim::SimConfig;

const PERIOD: Duration = Duration::from_millis(20);

fn unit(id: &str, lat: f64, lng: f64) -> Unit {
    Unit {
        id: id.to_string(),
        model: "Raven-X".to_string(),
        status: UnitStatus::Active,
        battery: 90.0,
        signal: 90.0,
        position: GeoPoint::new(lat, lng),
        heading: 0.0,
        altitude: 1200.0,
        speed: 40.0,
        payload: PayloadConfig {
            kind: "EO/IR_MK4".to_string(),
            modes: vec!["Thermal".to_string(), "RGB".to_string()],
            current_mode: "Thermal".to_string(),
        },
        waypoint_index: 0,
    }
}

fn controller(strategy: StrategyKind) -> FleetController {
    let config = SimConfig {
        tick_period: PERIOD,
        strategy,
        ..Default::default()
    };
    let units = vec![unit("UA-101", 48.20, 16.37), unit("UA-102", 48.19, 16.36)];
    FleetController::new(config, units).unwrap()
}

fn tick_of(ctl: &FleetController) -> u64 {
    ctl.snapshot().unwrap().time.tick
}

/// Poll until `pred` holds or the timeout expires.
fn wait_for(ctl: &FleetController, timeout: Duration, pred: impl Fn(&FleetSnapshot) -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if pred(&ctl.snapshot().unwrap()) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn test_no_ticks_until_started() {
    let ctl = controller(StrategyKind::RandomWalk);
    std::thread::sleep(PERIOD * 5);
    assert_eq!(tick_of(&ctl), 0);
    ctl.dispose();
}

#[test]
fn test_ticks_advance_while_running() {
    let ctl = controller(StrategyKind::RandomWalk);
    ctl.start().unwrap();
    assert!(wait_for(&ctl, Duration::from_secs(5), |s| s.time.tick >= 3));
    ctl.dispose();
}

#[test]
fn test_no_tick_commits_after_stop_returns() {
    let ctl = controller(StrategyKind::RandomWalk);
    ctl.start().unwrap();
    assert!(wait_for(&ctl, Duration::from_secs(5), |s| s.time.tick >= 2));

    assert_eq!(ctl.stop().unwrap(), SchedulerState::Stopped);
    let stopped_at = tick_of(&ctl);
    std::thread::sleep(PERIOD * 6);
    assert_eq!(tick_of(&ctl), stopped_at);
    ctl.dispose();
}

#[test]
fn test_stop_toggle_toggle_toggle() {
    let ctl = controller(StrategyKind::RandomWalk);
    ctl.start().unwrap();
    assert!(wait_for(&ctl, Duration::from_secs(5), |s| s.time.tick >= 1));

    ctl.stop().unwrap();
    let frozen = tick_of(&ctl);
    std::thread::sleep(PERIOD * 4);
    assert_eq!(tick_of(&ctl), frozen);

    assert_eq!(ctl.toggle().unwrap(), SchedulerState::Running);
    assert!(wait_for(&ctl, Duration::from_secs(5), |s| s.time.tick > frozen));

    assert_eq!(ctl.toggle().unwrap(), SchedulerState::Stopped);
    let frozen = tick_of(&ctl);
    std::thread::sleep(PERIOD * 4);
    assert_eq!(tick_of(&ctl), frozen);

    assert_eq!(ctl.toggle().unwrap(), SchedulerState::Running);
    assert!(wait_for(&ctl, Duration::from_secs(5), |s| s.time.tick > frozen));
    ctl.dispose();
}

#[test]
fn test_start_when_running_is_noop() {
    let ctl = controller(StrategyKind::RandomWalk);
    assert_eq!(ctl.start().unwrap(), SchedulerState::Running);
    assert_eq!(ctl.start().unwrap(), SchedulerState::Running);
    assert!(wait_for(&ctl, Duration::from_secs(5), |s| s.time.tick >= 2));
    ctl.dispose();
}

#[test]
fn test_subscriber_receives_tick_snapshots() {
    let ctl = controller(StrategyKind::HostileIntercept);
    let rx = ctl.subscribe().unwrap();
    let first = rx.recv_timeout(Duration::from_secs(1)).unwrap();
    assert_eq!(first.time.tick, 0);

    ctl.start().unwrap();
    let mut last_tick = 0;
    let deadline = Instant::now() + Duration::from_secs(5);
    while last_tick < 3 && Instant::now() < deadline {
        if let Ok(snapshot) = rx.recv_timeout(Duration::from_millis(100)) {
            assert!(snapshot.time.tick >= last_tick);
            last_tick = snapshot.time.tick;
        }
    }
    assert!(last_tick >= 3);
    ctl.dispose();
}

#[test]
fn test_held_snapshot_never_changes() {
    let ctl = controller(StrategyKind::RandomWalk);
    let held: Arc<FleetSnapshot> = ctl.snapshot().unwrap();
    let copy = (*held).clone();

    ctl.start().unwrap();
    assert!(wait_for(&ctl, Duration::from_secs(5), |s| s.time.tick >= 3));
    assert_eq!(*held, copy);
    ctl.dispose();
}

#[test]
fn test_commands_interleave_with_ticks() {
    let ctl = controller(StrategyKind::ReturnToBase);
    ctl.start().unwrap();
    ctl.send_command(FleetCommand::SelectUnit { id: "UA-101".into() }).unwrap();
    ctl.send_command(FleetCommand::SetPayloadMode {
        id: "UA-101".into(),
        mode: "RGB".into(),
    })
    .unwrap();

    assert!(wait_for(&ctl, Duration::from_secs(5), |s| s.time.tick >= 2));
    let snapshot = ctl.snapshot().unwrap();
    let selected = snapshot.selected.as_ref().unwrap();
    assert_eq!(selected.id, "UA-101");
    assert_eq!(selected.payload.current_mode, "RGB");
    assert_eq!(selected.status, UnitStatus::Returning);
    // The selected view is the same data as the list entry.
    assert_eq!(Some(selected), snapshot.unit("UA-101"));
    ctl.dispose();
}

#[test]
fn test_dispose_while_running_joins() {
    let ctl = controller(StrategyKind::PatrolPattern);
    ctl.start().unwrap();
    std::thread::sleep(PERIOD * 2);
    ctl.dispose();
}

#[test]
fn test_drop_joins_thread() {
    let ctl = controller(StrategyKind::RandomWalk);
    ctl.start().unwrap();
    drop(ctl);
}
