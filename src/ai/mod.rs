//! AI decision making for non-player combatants.
//!
//! Decisions are pure functions of `(engine, state)`: the same snapshot
//! always yields the same action. Every tie-break is explicit.

mod driver;
mod policy;

pub use driver::play_out;
pub use policy::{decide, ActionPolicy, TacticalPolicy};
