//! Entity store: the authoritative unit collection and the selection.
//!
//! Units keep the order they were handed in, so UI lists stay stable.
//! Invalid targets (unknown id, unsupported payload mode, duplicate ids on
//! replace) leave the store untouched and report a [`StoreError`].

use std::collections::HashMap;

use aerosight_core::components::{Unit, UnitPatch};
use aerosight_core::constants::GAUGE_MAX;
use aerosight_core::enums::UnitStatus;
use aerosight_core::types::normalize_heading;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("no unit with id `{0}`")]
    UnknownUnit(String),
    #[error("duplicate unit id `{0}`")]
    DuplicateId(String),
    #[error("unit `{id}` does not support payload mode `{mode}`")]
    InvalidPayloadMode { id: String, mode: String },
}

#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    units: Vec<Unit>,
    /// id -> position in `units`.
    index: HashMap<String, usize>,
    selected: Option<String>,
}

impl EntityStore {
    /// Seed a store. Fails if two units share an id.
    pub fn new(mut units: Vec<Unit>) -> Result<Self, StoreError> {
        let index = build_index(&units)?;
        units.iter_mut().for_each(normalize_unit);
        Ok(Self {
            units,
            index,
            selected: None,
        })
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Unit> {
        self.index.get(id).map(|&i| &self.units[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Units currently in `status`, in store order.
    pub fn with_status(&self, status: UnitStatus) -> impl Iterator<Item = &Unit> + '_ {
        self.units.iter().filter(move |u| u.status == status)
    }

    /// The selected unit as of the latest commit.
    pub fn selected(&self) -> Option<&Unit> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Merge a partial update into one unit.
    ///
    /// Gauges are clamped and the heading wrapped, so a merged unit holds the
    /// same invariants as a ticked one. A patch with an unsupported payload
    /// mode is rejected as a whole.
    pub fn merge_update(&mut self, id: &str, patch: &UnitPatch) -> Result<&Unit, StoreError> {
        let &i = self
            .index
            .get(id)
            .ok_or_else(|| StoreError::UnknownUnit(id.to_string()))?;
        let unit = &mut self.units[i];

        if let Some(mode) = &patch.payload_mode {
            if !unit.payload.modes.contains(mode) {
                return Err(StoreError::InvalidPayloadMode {
                    id: id.to_string(),
                    mode: mode.clone(),
                });
            }
        }

        merge_patch(unit, patch);
        Ok(unit)
    }

    /// Merge a batch of per-unit patches. Unknown ids and invalid patches
    /// are skipped; returns how many were applied.
    pub fn merge_updates<'a>(
        &mut self,
        patches: impl IntoIterator<Item = (&'a str, &'a UnitPatch)>,
    ) -> usize {
        patches
            .into_iter()
            .filter(|&(id, patch)| self.merge_update(id, patch).is_ok())
            .count()
    }

    /// Replace the whole collection.
    ///
    /// Rejected without changes if the new list repeats an id. The selection
    /// survives if its id is still present.
    pub fn bulk_replace(&mut self, mut units: Vec<Unit>) -> Result<(), StoreError> {
        let index = build_index(&units)?;
        units.iter_mut().for_each(normalize_unit);
        if let Some(id) = &self.selected {
            if !index.contains_key(id) {
                self.selected = None;
            }
        }
        self.units = units;
        self.index = index;
        Ok(())
    }

    /// Toggle selection of `id`. Returns the selected unit after the toggle.
    pub fn select(&mut self, id: &str) -> Result<Option<&Unit>, StoreError> {
        if !self.contains(id) {
            return Err(StoreError::UnknownUnit(id.to_string()));
        }
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        } else {
            self.selected = Some(id.to_string());
        }
        Ok(self.selected())
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Switch a unit's payload mode; the mode must be one the payload offers.
    pub fn set_payload_mode(&mut self, id: &str, mode: &str) -> Result<(), StoreError> {
        let patch = UnitPatch {
            payload_mode: Some(mode.to_string()),
            ..Default::default()
        };
        self.merge_update(id, &patch).map(|_| ())
    }

    pub fn set_status(&mut self, id: &str, status: UnitStatus) -> Result<(), StoreError> {
        let patch = UnitPatch {
            status: Some(status),
            ..Default::default()
        };
        self.merge_update(id, &patch).map(|_| ())
    }
}

fn build_index(units: &[Unit]) -> Result<HashMap<String, usize>, StoreError> {
    let mut index = HashMap::with_capacity(units.len());
    for (i, unit) in units.iter().enumerate() {
        if index.insert(unit.id.clone(), i).is_some() {
            return Err(StoreError::DuplicateId(unit.id.clone()));
        }
    }
    Ok(index)
}

/// Bring an incoming unit's gauges into range and wrap its heading.
/// Non-finite gauges read as empty, a non-finite heading as north.
fn normalize_unit(unit: &mut Unit) {
    let gauge = |v: f64| if v.is_finite() { v.clamp(0.0, GAUGE_MAX) } else { 0.0 };
    unit.battery = gauge(unit.battery);
    unit.signal = gauge(unit.signal);
    unit.heading = if unit.heading.is_finite() {
        normalize_heading(unit.heading)
    } else {
        0.0
    };
}

/// Non-finite numbers in a patch are ignored.
fn merge_patch(unit: &mut Unit, patch: &UnitPatch) {
    let finite = |v: Option<f64>| v.filter(|x| x.is_finite());

    if let Some(status) = patch.status {
        unit.status = status;
    }
    if let Some(battery) = finite(patch.battery) {
        unit.battery = battery.clamp(0.0, GAUGE_MAX);
    }
    if let Some(signal) = finite(patch.signal) {
        unit.signal = signal.clamp(0.0, GAUGE_MAX);
    }
    if let Some(position) = patch.position.filter(|p| p.is_finite()) {
        unit.position = position;
    }
    if let Some(heading) = finite(patch.heading) {
        unit.heading = normalize_heading(heading);
    }
    if let Some(altitude) = finite(patch.altitude) {
        unit.altitude = altitude;
    }
    if let Some(speed) = finite(patch.speed) {
        unit.speed = speed;
    }
    if let Some(mode) = &patch.payload_mode {
        unit.payload.current_mode = mode.clone();
    }
    if let Some(index) = patch.waypoint_index {
        unit.waypoint_index = index;
    }
}
