//! # grid-tactics
//!
//! A deterministic turn-based tactical combat engine with a cooperative
//! animation scheduler.
//!
//! ## Design Principles
//!
//! 1. **Pure Transitions**: `CombatEngine::resolve(state, action, dice)`
//!    returns a new state plus the events that explain it. Nothing is
//!    mutated in place and no global state exists.
//!
//! 2. **Explicit Randomness**: every roll comes from the `Dice` passed in.
//!    The same state, action and dice always give the same result.
//!
//! 3. **Configuration Over Convention**: every tunable number lives in
//!    `CombatConfig`, every piece of gear in the `Armory`.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) snapshot cloning via `im-rs`, so
//!   callers can keep every intermediate state for replay or undo.
//!
//! - **Commit Before Playback**: the scheduler only ever sees the event
//!   list of an already-committed transition. Cancelling an animation never
//!   touches `CombatState`.
//!
//! ## Modules
//!
//! - `core`: Combatant ids, combatants, actions, state, dice, configuration
//! - `stats`: Level-to-stat derivation
//! - `battlefield`: The two-row grid, line of sight and targeting
//! - `equipment`: Weapon and item definitions
//! - `events`: Combat events and the combat log
//! - `rules`: The `CombatEngine` reducer
//! - `encounter`: Building the initial state
//! - `ai`: Decision policies for non-player combatants
//! - `playback`: The animation scheduler
//!
//! ```
//! use grid_tactics::{CombatEngine, CombatantSpec, Encounter, GameRng, TacticalPolicy};
//!
//! let engine = CombatEngine::default();
//! let start = Encounter::new(CombatantSpec::new("Aria", 5))
//!     .with_enemy(CombatantSpec::new("Goblin", 1))
//!     .build(&engine)
//!     .unwrap();
//!
//! let mut dice = GameRng::new(7);
//! let end = grid_tactics::ai::play_out(&engine, &start, &mut dice, &TacticalPolicy, 500);
//! assert!(end.is_over());
//! ```

pub mod ai;
pub mod battlefield;
pub mod core;
pub mod encounter;
pub mod equipment;
pub mod error;
pub mod events;
pub mod playback;
pub mod rules;
pub mod stats;

// Re-export commonly used types
pub use crate::core::{
    ActionKind, AttackTarget, CleaveTieBreak, CombatAction, CombatConfig, CombatResult,
    CombatState, Combatant, CombatantId, Controller, Dice, GameRng, Outcome, Phase,
    ScriptedDice, Side,
};

pub use crate::stats::{derive_stats, StatBlock};

pub use crate::battlefield::{Battlefield, SlotRef};

pub use crate::equipment::{Armory, ItemDef, ItemEffect, ItemId, WeaponClass, WeaponDef, WeaponId};

pub use crate::events::{CombatEvent, CombatLogEntry, HitQuality};

pub use crate::rules::{CombatEngine, Resolution};

pub use crate::encounter::{CombatantSpec, Encounter};

pub use crate::ai::{ActionPolicy, TacticalPolicy};

pub use crate::playback::{Animation, AnimationScheduler, PlaybackHandle};

pub use crate::error::{
    AnimationError, EncounterError, InvariantViolation, NarrationError, PlaybackError,
    SnapshotError, ValidationError,
};
