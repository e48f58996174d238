//! Scheduler thread: fires engine ticks on a wall-clock period while running.
//!
//! The thread blocks on its signal channel. While armed it waits with a
//! deadline and ticks when the deadline passes; while disarmed it sleeps until
//! the control surface arms it again. Each tick holds the engine lock from
//! the running check to the commit, so a `stop()` that has returned can never
//! be followed by another tick.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, error};

use crate::state::{store_snapshot, LoopSignal, RuntimeError, SharedEngine, SnapshotCell};

/// Spawns the scheduler thread.
///
/// Returns the signal sender for the control surface and the thread handle.
pub fn spawn_game_loop(
    engine: SharedEngine,
    latest_snapshot: SnapshotCell,
    period: Duration,
    armed: bool,
) -> Result<(mpsc::Sender<LoopSignal>, JoinHandle<()>), RuntimeError> {
    let (signal_tx, signal_rx) = mpsc::channel::<LoopSignal>();

    let handle = std::thread::Builder::new()
        .name("aerosight-scheduler".into())
        .spawn(move || {
            run_game_loop(&engine, &latest_snapshot, signal_rx, period, armed);
        })?;

    Ok((signal_tx, handle))
}

/// The scheduler loop. Runs until Shutdown or channel disconnect.
fn run_game_loop(
    engine: &SharedEngine,
    latest_snapshot: &SnapshotCell,
    signal_rx: mpsc::Receiver<LoopSignal>,
    period: Duration,
    armed: bool,
) {
    let mut next_tick_time = armed.then(|| Instant::now() + period);

    loop {
        // 1. Wait for a signal or the deadline, whichever comes first
        let signal = match next_tick_time {
            Some(deadline) => {
                match signal_rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                    Ok(signal) => Some(signal),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => return,
                }
            }
            None => match signal_rx.recv() {
                Ok(signal) => Some(signal),
                Err(_) => return,
            },
        };

        match signal {
            Some(LoopSignal::Arm) => {
                next_tick_time = Some(Instant::now() + period);
                continue;
            }
            Some(LoopSignal::Disarm) => {
                next_tick_time = None;
                continue;
            }
            Some(LoopSignal::Shutdown) => return,
            None => {}
        }

        // 2. Deadline passed: tick if still running
        match fire_tick(engine, latest_snapshot) {
            Ok(true) => {}
            Ok(false) => {
                next_tick_time = None;
                continue;
            }
            Err(err) => {
                error!(error = %err, "scheduler thread exiting");
                return;
            }
        }

        // 3. Schedule the next tick. Ticks missed while the thread was
        // starved are dropped, not replayed in a burst.
        let deadline = next_tick_time.unwrap_or_else(Instant::now) + period;
        let now = Instant::now();
        next_tick_time = if now > deadline + period {
            debug!(behind_ms = (now - deadline).as_millis() as u64, "scheduler behind, skipping missed ticks");
            Some(now + period)
        } else {
            Some(deadline)
        };
    }
}

/// Run one tick under the engine lock. Returns `false` when the scheduler
/// was stopped before the deadline fired.
fn fire_tick(engine: &SharedEngine, latest_snapshot: &SnapshotCell) -> Result<bool, RuntimeError> {
    let mut engine = engine.lock().map_err(|_| RuntimeError::Poisoned)?;
    if !engine.is_running() {
        return Ok(false);
    }
    let snapshot = engine.tick();
    store_snapshot(latest_snapshot, snapshot)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use aerosight_sim::{SimConfig, SimulationEngine};

    use super::*;
    use crate::state::load_snapshot;

    fn shared(start_running: bool) -> (SharedEngine, SnapshotCell) {
        let config = SimConfig {
            start_running,
            ..Default::default()
        };
        let engine = SimulationEngine::new(config, Vec::new()).unwrap();
        let cell = Arc::new(Mutex::new(engine.snapshot()));
        (Arc::new(Mutex::new(engine)), cell)
    }

    #[test]
    fn test_fire_tick_skips_when_stopped() {
        let (engine, cell) = shared(false);
        assert!(!fire_tick(&engine, &cell).unwrap());
        assert_eq!(load_snapshot(&cell).unwrap().time.tick, 0);
    }

    #[test]
    fn test_fire_tick_publishes_when_running() {
        let (engine, cell) = shared(true);
        assert!(fire_tick(&engine, &cell).unwrap());
        assert!(fire_tick(&engine, &cell).unwrap());
        assert_eq!(load_snapshot(&cell).unwrap().time.tick, 2);
    }

    #[test]
    fn test_loop_exits_on_shutdown() {
        let (engine, cell) = shared(false);
        let (tx, handle) = spawn_game_loop(engine, cell, Duration::from_millis(10), false).unwrap();
        tx.send(LoopSignal::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_loop_exits_when_sender_dropped() {
        let (engine, cell) = shared(true);
        let (tx, handle) = spawn_game_loop(engine, cell, Duration::from_millis(10), true).unwrap();
        drop(tx);
        handle.join().unwrap();
    }

    #[test]
    fn test_armed_loop_ticks() {
        let (engine, cell) = shared(true);
        let (tx, handle) =
            spawn_game_loop(engine, Arc::clone(&cell), Duration::from_millis(5), true).unwrap();
        std::thread::sleep(Duration::from_millis(200));
        tx.send(LoopSignal::Shutdown).unwrap();
        handle.join().unwrap();
        assert!(load_snapshot(&cell).unwrap().time.tick >= 2);
    }
}
