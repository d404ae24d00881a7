//! Core combat types: identities, combatants, state, actions, dice, configuration.
//!
//! These are plain data. Behavior lives in `rules`; the types here only
//! answer questions about themselves and check their own invariants.

pub mod entity;
pub mod combatant;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;

pub use entity::{CombatantId, Controller, Side};
pub use combatant::{Buff, Combatant, ItemStack, StatusFlags};
pub use rng::{Dice, GameRng, ScriptedDice};
pub use config::{CleaveTieBreak, CombatConfig};
pub use action::{ActionKind, AttackTarget, CombatAction};
pub use state::{CombatResult, CombatState, Mark, Outcome, Phase, Rewards};
