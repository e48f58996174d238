//! Per-tick systems over the unit collection.
//!
//! Systems are pure functions over plain data. They do not own state; the
//! engine threads the store, the RNG and the strategy context through them.

pub mod decay;
pub mod movement;
pub mod snapshot;
