//! Runtime state shared between the control surface and the scheduler thread.

use std::sync::{Arc, Mutex};

use aerosight_core::state::FleetSnapshot;
use aerosight_sim::{SimulationEngine, StoreError, StrategyError};

/// The engine, locked for the whole of every tick and every command, which
/// makes commands and tick commits mutually exclusive.
pub type SharedEngine = Arc<Mutex<SimulationEngine>>;

/// Latest published snapshot. Only ever locked to swap or clone the `Arc`,
/// never while a tick is being computed by readers.
pub type SnapshotCell = Arc<Mutex<Arc<FleetSnapshot>>>;

/// Signals sent from the control surface to the scheduler thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopSignal {
    /// The scheduler was started: fire one period from now, then repeat.
    Arm,
    /// The scheduler was stopped: stop waking up.
    Disarm,
    /// Exit the thread.
    Shutdown,
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("failed to spawn scheduler thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("simulation state lock poisoned")]
    Poisoned,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Strategy(#[from] StrategyError),
}

/// Swap a new snapshot into the cell.
pub fn store_snapshot(cell: &SnapshotCell, snapshot: Arc<FleetSnapshot>) -> Result<(), RuntimeError> {
    let mut lock = cell.lock().map_err(|_| RuntimeError::Poisoned)?;
    *lock = snapshot;
    Ok(())
}

/// Clone the current snapshot out of the cell.
pub fn load_snapshot(cell: &SnapshotCell) -> Result<Arc<FleetSnapshot>, RuntimeError> {
    let lock = cell.lock().map_err(|_| RuntimeError::Poisoned)?;
    Ok(Arc::clone(&lock))
}
