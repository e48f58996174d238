//! Simulation engine: the fleet simulation core.
//!
//! `SimulationEngine` owns the entity store, the scheduler state and the
//! active movement strategy, applies operator commands, and advances the
//! fleet one tick at a time. Completely headless (no timer, no threads), so
//! tests drive it tick by tick in simulated time; `aerosight-app` wraps it
//! in a wall-clock scheduler.

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use aerosight_core::commands::FleetCommand;
use aerosight_core::components::{Unit, UnitPatch};
use aerosight_core::constants::TICK_PERIOD_MS;
use aerosight_core::enums::{SchedulerState, StrategyKind, UnitStatus};
use aerosight_core::events::FleetEvent;
use aerosight_core::state::FleetSnapshot;
use aerosight_core::types::{GeoPoint, SimTime};

use crate::store::{EntityStore, StoreError};
use crate::systems;
use crate::systems::movement::{StrategyContext, StrategyError};

/// Snapshots buffered per subscriber. A subscriber that falls this far
/// behind misses publications until it drains its channel.
pub const OBSERVER_BUFFER: usize = 16;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Wall-clock period between ticks.
    pub tick_period: Duration,
    /// Strategy active from the first tick.
    pub strategy: StrategyKind,
    pub context: StrategyContext,
    /// Whether the scheduler starts in `Running`.
    pub start_running: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_period: Duration::from_millis(TICK_PERIOD_MS),
            strategy: StrategyKind::default(),
            context: StrategyContext::default(),
            start_running: false,
        }
    }
}

/// The simulation engine. Owns the fleet and all sim state.
pub struct SimulationEngine {
    store: EntityStore,
    time: SimTime,
    scheduler: SchedulerState,
    strategy: StrategyKind,
    context: StrategyContext,
    tick_period: Duration,
    rng: ChaCha8Rng,
    /// Events raised since the last published snapshot.
    events: Vec<FleetEvent>,
    observers: Vec<mpsc::SyncSender<Arc<FleetSnapshot>>>,
    latest: Arc<FleetSnapshot>,
}

impl SimulationEngine {
    /// Create an engine over an initial fleet. Fails if unit ids repeat.
    pub fn new(config: SimConfig, units: Vec<Unit>) -> Result<Self, StoreError> {
        let store = EntityStore::new(units)?;
        let scheduler = if config.start_running {
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        };
        info!(
            seed = config.seed,
            units = store.len(),
            strategy = %config.strategy,
            "simulation engine created"
        );

        let mut engine = Self {
            store,
            time: SimTime::default(),
            scheduler,
            strategy: config.strategy,
            context: config.context,
            tick_period: config.tick_period,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            events: Vec::new(),
            observers: Vec::new(),
            latest: Arc::default(),
        };
        engine.publish();
        Ok(engine)
    }

    // --- Scheduler control ---

    /// Stopped -> Running. No-op when already running.
    pub fn start(&mut self) -> SchedulerState {
        self.set_scheduler(SchedulerState::Running)
    }

    /// Running -> Stopped. No-op when already stopped.
    pub fn stop(&mut self) -> SchedulerState {
        self.set_scheduler(SchedulerState::Stopped)
    }

    pub fn toggle(&mut self) -> SchedulerState {
        match self.scheduler {
            SchedulerState::Running => self.stop(),
            SchedulerState::Stopped => self.start(),
        }
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler
    }

    pub fn is_running(&self) -> bool {
        self.scheduler == SchedulerState::Running
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    /// Swap the movement strategy. Takes effect on the next tick.
    pub fn set_strategy(&mut self, strategy: StrategyKind) {
        if strategy == self.strategy {
            return;
        }
        info!(from = %self.strategy, to = %strategy, "movement strategy changed");
        self.strategy = strategy;
        self.events.push(FleetEvent::StrategyChanged { strategy });
        self.publish();
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    /// Replace the target/base/patrol geometry. Takes effect on the next tick.
    pub fn set_context(&mut self, context: StrategyContext) {
        if context == self.context {
            return;
        }
        info!(
            target_lat = context.target.lat,
            target_lng = context.target.lng,
            waypoints = context.patrol_route.len(),
            "strategy context changed"
        );
        self.events.push(FleetEvent::ContextChanged {
            target: context.target,
            base: context.base,
        });
        self.context = context;
        self.publish();
    }

    /// Move only the hostile-intercept target.
    pub fn set_target(&mut self, target: GeoPoint) -> Result<(), StrategyError> {
        if !target.is_finite() {
            return Err(StrategyError::InvalidTarget);
        }
        let context = StrategyContext {
            target,
            ..self.context.clone()
        };
        self.set_context(context);
        Ok(())
    }

    pub fn context(&self) -> &StrategyContext {
        &self.context
    }

    // --- Ticking ---

    /// Advance the fleet by one tick and return the resulting snapshot.
    ///
    /// While stopped this is a no-op that returns the current snapshot.
    pub fn tick(&mut self) -> Arc<FleetSnapshot> {
        if self.scheduler == SchedulerState::Running {
            self.step_units();
            self.time.advance(self.tick_period.as_secs_f64());
            self.publish();
        }
        self.snapshot()
    }

    /// Compute every unit from the same pre-tick state, then commit the new
    /// list in one replace.
    fn step_units(&mut self) {
        let strategy = self.strategy;
        let mut next = Vec::with_capacity(self.store.len());
        let mut failures = 0usize;

        for unit in self.store.units() {
            let patch = match systems::movement::apply_strategy(
                strategy,
                unit,
                &self.context,
                &mut self.rng,
            ) {
                Ok(patch) => patch,
                Err(err) => {
                    warn!(unit = %unit.id, %strategy, error = %err, "strategy failed, unit skipped this tick");
                    self.events.push(FleetEvent::StrategyFailed {
                        id: unit.id.clone(),
                        reason: err.to_string(),
                    });
                    failures += 1;
                    next.push(unit.clone());
                    continue;
                }
            };

            let mut updated = unit.clone();
            systems::movement::apply_patch(&mut updated, &patch);
            systems::decay::run(&mut updated, patch.status.is_some(), &mut self.rng);

            if strategy == StrategyKind::PatrolPattern && patch.arrived {
                let route_len = self.context.patrol_route.len().max(1);
                self.events.push(FleetEvent::WaypointReached {
                    id: unit.id.clone(),
                    index: unit.waypoint_index % route_len,
                });
            }
            if updated.status != unit.status {
                self.events.push(FleetEvent::StatusChanged {
                    id: unit.id.clone(),
                    from: unit.status,
                    to: updated.status,
                });
            }
            next.push(updated);
        }

        // Ids are carried over unchanged, so the replace cannot collide.
        if let Err(err) = self.store.bulk_replace(next) {
            warn!(error = %err, "tick commit rejected");
        }
        debug!(
            tick = self.time.tick + 1,
            units = self.store.len(),
            failures,
            "tick committed"
        );
    }

    // --- Commands ---

    /// Apply one operator command. Invalid targets are logged and ignored.
    pub fn apply_command(&mut self, command: FleetCommand) {
        let result = match command {
            FleetCommand::SelectUnit { id } => self.select(&id),
            FleetCommand::DeselectUnit => {
                self.deselect();
                Ok(())
            }
            FleetCommand::SetPayloadMode { id, mode } => self.set_payload_mode(&id, &mode),
            FleetCommand::SetUnitStatus { id, status } => self.set_status(&id, status),
            FleetCommand::UpdateUnit { id, patch } => self.merge_update(&id, &patch),
            FleetCommand::Start => {
                self.start();
                Ok(())
            }
            FleetCommand::Stop => {
                self.stop();
                Ok(())
            }
            FleetCommand::Toggle => {
                self.toggle();
                Ok(())
            }
            FleetCommand::SetStrategy { strategy } => {
                self.set_strategy(strategy);
                Ok(())
            }
            FleetCommand::SetTarget { target } => {
                if let Err(err) = self.set_target(target) {
                    debug!(error = %err, "command ignored");
                }
                Ok(())
            }
        };

        if let Err(err) = result {
            debug!(error = %err, "command ignored");
        }
    }

    /// Apply a batch of commands in order.
    pub fn apply_commands(&mut self, commands: impl IntoIterator<Item = FleetCommand>) {
        for command in commands {
            self.apply_command(command);
        }
    }

    /// Toggle selection of a unit.
    pub fn select(&mut self, id: &str) -> Result<(), StoreError> {
        self.store.select(id)?;
        self.publish();
        Ok(())
    }

    pub fn deselect(&mut self) {
        if self.store.selected_id().is_some() {
            self.store.deselect();
            self.publish();
        }
    }

    pub fn merge_update(&mut self, id: &str, patch: &UnitPatch) -> Result<(), StoreError> {
        self.store.merge_update(id, patch)?;
        self.publish();
        Ok(())
    }

    /// Merge several patches at once; returns how many applied.
    pub fn merge_updates<'a>(
        &mut self,
        patches: impl IntoIterator<Item = (&'a str, &'a UnitPatch)>,
    ) -> usize {
        let applied = self.store.merge_updates(patches);
        if applied > 0 {
            self.publish();
        }
        applied
    }

    /// Replace the whole fleet, e.g. with a list computed elsewhere.
    pub fn bulk_replace(&mut self, units: Vec<Unit>) -> Result<(), StoreError> {
        self.store.bulk_replace(units)?;
        self.publish();
        Ok(())
    }

    pub fn set_payload_mode(&mut self, id: &str, mode: &str) -> Result<(), StoreError> {
        self.store.set_payload_mode(id, mode)?;
        self.publish();
        Ok(())
    }

    pub fn set_status(&mut self, id: &str, status: UnitStatus) -> Result<(), StoreError> {
        self.store.set_status(id, status)?;
        self.publish();
        Ok(())
    }

    // --- Reads ---

    /// The latest published snapshot.
    pub fn snapshot(&self) -> Arc<FleetSnapshot> {
        Arc::clone(&self.latest)
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn units(&self) -> &[Unit] {
        self.store.units()
    }

    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.store.get(id)
    }

    pub fn selected(&self) -> Option<&Unit> {
        self.store.selected()
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Receive snapshots published from now on, starting with the current
    /// one. At most [`OBSERVER_BUFFER`] undelivered snapshots are held.
    pub fn subscribe(&mut self) -> mpsc::Receiver<Arc<FleetSnapshot>> {
        let (tx, rx) = mpsc::sync_channel(OBSERVER_BUFFER);
        if tx.try_send(self.snapshot()).is_ok() {
            self.observers.push(tx);
        }
        rx
    }

    /// Number of live snapshot subscribers (for testing).
    #[cfg(test)]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn set_scheduler(&mut self, state: SchedulerState) -> SchedulerState {
        if self.scheduler != state {
            info!(?state, tick = self.time.tick, "scheduler state changed");
            self.scheduler = state;
            self.events.push(FleetEvent::SchedulerChanged { state });
            self.publish();
        }
        self.scheduler
    }

    /// Build a fresh snapshot, swap it in, and fan it out to observers.
    /// A full observer skips this snapshot; one whose receiver is gone is
    /// dropped.
    fn publish(&mut self) {
        let events = std::mem::take(&mut self.events);
        self.latest = Arc::new(systems::snapshot::build_snapshot(
            &self.store,
            &self.time,
            self.scheduler,
            self.strategy,
            events,
        ));
        let latest = &self.latest;
        self.observers.retain(|tx| {
            !matches!(
                tx.try_send(Arc::clone(latest)),
                Err(mpsc::TrySendError::Disconnected(_))
            )
        });
    }
}
