//! The combat state machine.
//!
//! `CombatEngine` validates and resolves one `CombatAction` against one
//! `CombatState`, producing a new state and an ordered event list. Each
//! action variant has its own resolver module; the engine dispatches to
//! them with a single exhaustive match.
//!
//! - `engine`: public entry points (`begin`, `validate`, `resolve`, `legal_actions`)
//! - `validate`: read-only legality checks and AP costs
//! - `attack`: hit math, interception, cleave, blasts, overwatch reactions
//! - `prepare`: defend, overwatch, aimed shot, mark
//! - `movement`, `items`, `flee`: the remaining verbs
//! - `turn`: initiative, turn start/end, turn advance
//! - `outcome`: victory, defeat and flight

mod attack;
mod context;
pub mod engine;
mod flee;
mod items;
mod movement;
mod outcome;
mod prepare;
mod turn;
mod validate;

pub use engine::{CombatEngine, Resolution};
