//! Control surface for the running simulation.
//!
//! `FleetController` is what a dashboard talks to. Every command takes the
//! engine lock, applies the change, refreshes the latest-snapshot cell, and
//! then arms or disarms the scheduler thread if the scheduler state moved.
//! Reads go through the snapshot cell and never wait on a tick.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use tracing::{debug, info, warn};

use aerosight_core::commands::FleetCommand;
use aerosight_core::components::{Unit, UnitPatch};
use aerosight_core::enums::{SchedulerState, StrategyKind, UnitStatus};
use aerosight_core::state::FleetSnapshot;
use aerosight_core::types::GeoPoint;
use aerosight_sim::{SimConfig, SimulationEngine, StrategyContext};

use crate::game_loop::spawn_game_loop;
use crate::state::{load_snapshot, store_snapshot, LoopSignal, RuntimeError, SharedEngine, SnapshotCell};

pub struct FleetController {
    engine: SharedEngine,
    latest_snapshot: SnapshotCell,
    signal_tx: mpsc::Sender<LoopSignal>,
    handle: Option<JoinHandle<()>>,
}

impl FleetController {
    /// Build the engine over `units` and spawn the scheduler thread.
    pub fn new(config: SimConfig, units: Vec<Unit>) -> Result<Self, RuntimeError> {
        let period = config.tick_period;
        let engine = SimulationEngine::new(config, units)?;
        let armed = engine.is_running();
        let latest_snapshot = Arc::new(Mutex::new(engine.snapshot()));
        let engine = Arc::new(Mutex::new(engine));

        let (signal_tx, handle) =
            spawn_game_loop(Arc::clone(&engine), Arc::clone(&latest_snapshot), period, armed)?;
        info!(period_ms = period.as_millis() as u64, "fleet controller ready");

        Ok(Self {
            engine,
            latest_snapshot,
            signal_tx,
            handle: Some(handle),
        })
    }

    // --- Scheduler ---

    pub fn start(&self) -> Result<SchedulerState, RuntimeError> {
        self.with_engine(|engine| engine.start())
    }

    /// Once this returns, no further tick will commit until the next start.
    pub fn stop(&self) -> Result<SchedulerState, RuntimeError> {
        self.with_engine(|engine| engine.stop())
    }

    pub fn toggle(&self) -> Result<SchedulerState, RuntimeError> {
        self.with_engine(|engine| engine.toggle())
    }

    pub fn scheduler_state(&self) -> Result<SchedulerState, RuntimeError> {
        Ok(self.snapshot()?.scheduler)
    }

    pub fn is_running(&self) -> Result<bool, RuntimeError> {
        Ok(self.snapshot()?.is_running())
    }

    // --- Strategy ---

    pub fn set_strategy(&self, strategy: StrategyKind) -> Result<(), RuntimeError> {
        self.with_engine(|engine| engine.set_strategy(strategy))
    }

    pub fn set_context(&self, context: StrategyContext) -> Result<(), RuntimeError> {
        self.with_engine(|engine| engine.set_context(context))
    }

    pub fn set_target(&self, target: GeoPoint) -> Result<(), RuntimeError> {
        self.with_engine(|engine| engine.set_target(target))?
            .map_err(RuntimeError::from)
    }

    // --- Units ---

    pub fn select(&self, id: &str) -> Result<(), RuntimeError> {
        self.with_engine(|engine| engine.select(id))?
            .map_err(RuntimeError::from)
    }

    pub fn deselect(&self) -> Result<(), RuntimeError> {
        self.with_engine(|engine| engine.deselect())
    }

    pub fn set_payload_mode(&self, id: &str, mode: &str) -> Result<(), RuntimeError> {
        self.with_engine(|engine| engine.set_payload_mode(id, mode))?
            .map_err(RuntimeError::from)
    }

    pub fn set_status(&self, id: &str, status: UnitStatus) -> Result<(), RuntimeError> {
        self.with_engine(|engine| engine.set_status(id, status))?
            .map_err(RuntimeError::from)
    }

    pub fn merge_update(&self, id: &str, patch: &UnitPatch) -> Result<(), RuntimeError> {
        self.with_engine(|engine| engine.merge_update(id, patch))?
            .map_err(RuntimeError::from)
    }

    pub fn bulk_replace(&self, units: Vec<Unit>) -> Result<(), RuntimeError> {
        self.with_engine(|engine| engine.bulk_replace(units))?
            .map_err(RuntimeError::from)
    }

    /// Apply a serialized operator command. Invalid targets are ignored.
    pub fn send_command(&self, command: FleetCommand) -> Result<(), RuntimeError> {
        debug!(?command, "command received");
        self.with_engine(|engine| engine.apply_command(command))
    }

    // --- Reads ---

    /// The latest published snapshot.
    pub fn snapshot(&self) -> Result<Arc<FleetSnapshot>, RuntimeError> {
        load_snapshot(&self.latest_snapshot)
    }

    pub fn selected(&self) -> Result<Option<Unit>, RuntimeError> {
        Ok(self.snapshot()?.selected.clone())
    }

    /// Receive every snapshot published from now on, starting with the
    /// current one.
    pub fn subscribe(&self) -> Result<mpsc::Receiver<Arc<FleetSnapshot>>, RuntimeError> {
        self.with_engine(|engine| engine.subscribe())
    }

    /// Stop the scheduler and join its thread.
    pub fn dispose(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.signal_tx.send(LoopSignal::Shutdown);
            if handle.join().is_err() {
                warn!("scheduler thread panicked");
            }
            debug!("scheduler thread joined");
        }
    }

    /// Run `f` under the engine lock, refresh the snapshot cell, and arm or
    /// disarm the scheduler thread if the run state changed.
    fn with_engine<T>(&self, f: impl FnOnce(&mut SimulationEngine) -> T) -> Result<T, RuntimeError> {
        let mut engine = self.engine.lock().map_err(|_| RuntimeError::Poisoned)?;
        let was_running = engine.is_running();
        let out = f(&mut engine);
        let is_running = engine.is_running();
        store_snapshot(&self.latest_snapshot, engine.snapshot())?;
        drop(engine);

        let signal = match (was_running, is_running) {
            (false, true) => Some(LoopSignal::Arm),
            (true, false) => Some(LoopSignal::Disarm),
            _ => None,
        };
        if let Some(signal) = signal {
            let _ = self.signal_tx.send(signal);
        }
        Ok(out)
    }
}

impl Drop for FleetController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
