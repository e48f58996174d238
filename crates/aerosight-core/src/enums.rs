//! Enumeration types used throughout the simulation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Operational status of a unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    #[default]
    Active,
    /// Heading home, either ordered or because the battery ran low.
    Returning,
    /// Grounded. Only set by operators or by arriving at base.
    Maintenance,
}

/// Scheduler run state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerState {
    #[default]
    Stopped,
    Running,
}

/// Movement strategy applied to every unit on each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Small stochastic drift.
    #[default]
    RandomWalk,
    /// Vector toward the hostile target point.
    HostileIntercept,
    /// Vector toward base, then stand down for maintenance.
    ReturnToBase,
    /// Cycle a fixed waypoint route.
    PatrolPattern,
}

impl StrategyKind {
    /// All strategies in menu order.
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::RandomWalk,
        StrategyKind::HostileIntercept,
        StrategyKind::ReturnToBase,
        StrategyKind::PatrolPattern,
    ];

    /// Stable identifier used by UI bridges.
    pub fn id(&self) -> &'static str {
        match self {
            StrategyKind::RandomWalk => "random_walk",
            StrategyKind::HostileIntercept => "hostile_intercept",
            StrategyKind::ReturnToBase => "return_to_base",
            StrategyKind::PatrolPattern => "patrol_pattern",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::RandomWalk => "Random Walk",
            StrategyKind::HostileIntercept => "Hostile Intercept",
            StrategyKind::ReturnToBase => "Return to Base",
            StrategyKind::PatrolPattern => "Patrol Pattern",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StrategyKind::RandomWalk => "Default state; units move stochastically",
            StrategyKind::HostileIntercept => "Vectors units toward target coordinates",
            StrategyKind::ReturnToBase => "All units return to base coordinates",
            StrategyKind::PatrolPattern => "Units follow a rectangular patrol route",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Returned when parsing an unrecognised strategy id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown strategy id `{0}`")]
pub struct UnknownStrategy(pub String);

impl FromStr for StrategyKind {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}
