//! Error types surfaced by the engine.
//!
//! - [`ValidationError`]: an illegal action. Recovered locally, the state is
//!   left untouched.
//! - [`InvariantViolation`]: a corrupted state. Indicates a bug in an earlier
//!   transition; the reducer treats it as fatal.
//! - [`EncounterError`]: bad initialization data.
//! - [`NarrationError`]: a narrator tried to annotate a missing log entry.
//! - [`SnapshotError`]: a binary checkpoint failed to encode or decode.
//! - [`AnimationError`], [`PlaybackError`]: scheduler-only failures. They
//!   never touch combat state.

use thiserror::Error;

use crate::battlefield::SlotRef;
use crate::core::{CombatantId, Phase};
use crate::equipment::{ItemId, WeaponId};

/// Why an action was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("combat is not awaiting input (phase {phase:?})")]
    NotAwaitingInput { phase: Phase },

    #[error("unknown combatant {0}")]
    UnknownCombatant(CombatantId),

    #[error("it is not {actor}'s turn (current actor {expected:?})")]
    NotYourTurn {
        actor: CombatantId,
        expected: Option<CombatantId>,
    },

    #[error("{0} is down and cannot act")]
    ActorDown(CombatantId),

    #[error("{actor} has {available} AP but the action costs {required}")]
    InsufficientAp {
        actor: CombatantId,
        required: u8,
        available: u8,
    },

    #[error("{target} is not a valid target for {actor}")]
    InvalidTarget {
        actor: CombatantId,
        target: CombatantId,
    },

    #[error("{tile} is not a valid blast centre for {actor}")]
    InvalidTile { actor: CombatantId, tile: SlotRef },

    #[error("slot {index} is not a legal destination for {actor}")]
    InvalidSlot { actor: CombatantId, index: u8 },

    #[error("{actor} has used all light weapon attacks this turn")]
    LightAttackLimit { actor: CombatantId },

    #[error("{actor} needs a ranged weapon ({weapon} is not)")]
    RequiresRangedWeapon { actor: CombatantId, weapon: WeaponId },

    #[error("{actor} already has an aimed shot ready")]
    AlreadyAiming { actor: CombatantId },

    #[error("{actor} carries no usable {item}")]
    ItemUnavailable { actor: CombatantId, item: ItemId },

    #[error("{actor} cannot guard {ward}")]
    InvalidGuard {
        actor: CombatantId,
        ward: CombatantId,
    },
}

/// A broken structural invariant of `CombatState`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("{side} row holds {actual} slots, expected {expected}")]
    MalformedRow {
        side: crate::core::Side,
        expected: u8,
        actual: usize,
    },

    #[error("{id} occupies both {first} and {second}")]
    DuplicateOccupancy {
        id: CombatantId,
        first: SlotRef,
        second: SlotRef,
    },

    #[error("{slot} holds unknown combatant {id}")]
    DanglingSlot { slot: SlotRef, id: CombatantId },

    #[error("{id} records slot {recorded:?} but the battlefield says {actual:?}")]
    SlotMismatch {
        id: CombatantId,
        recorded: Option<SlotRef>,
        actual: Option<SlotRef>,
    },

    #[error("{id} is down but still holds {slot}")]
    DownedOnField { id: CombatantId, slot: SlotRef },

    #[error("{from} links to missing or inconsistent combatant {to}")]
    DanglingLink { from: CombatantId, to: CombatantId },

    #[error("{id} has {ap} AP, above the per-turn maximum {max}")]
    ApOutOfRange { id: CombatantId, ap: u8, max: u8 },

    #[error("initiative order is not a permutation of the combatants")]
    InitiativeNotPermutation,

    #[error("turn pointer rests on downed combatant {0}")]
    TurnOnDowned(CombatantId),
}

/// Bad encounter initialization data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncounterError {
    #[error("encounter has no enemies")]
    NoEnemies,

    #[error("{side} row holds {width} slots but {count} combatants were placed")]
    RowFull {
        side: crate::core::Side,
        width: u8,
        count: usize,
    },

    #[error("{name} requests slot {index}, outside the {width}-slot row")]
    SlotOutOfBounds { name: String, index: u8, width: u8 },

    #[error("{name} requests occupied slot {index}")]
    SlotTaken { name: String, index: u8 },

    #[error("{name} wields unknown {weapon}")]
    UnknownWeapon { name: String, weapon: WeaponId },

    #[error("{name} carries unknown {item}")]
    UnknownItem { name: String, item: ItemId },
}

/// Narration could not be attached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NarrationError {
    #[error("no log entry with sequence {0}")]
    UnknownEntry(u32),
}

/// A binary snapshot could not be written or read back.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot codec failed: {0}")]
    Codec(#[from] bincode::Error),

    #[error("restored snapshot is corrupted: {0}")]
    Corrupted(#[from] InvariantViolation),
}

/// An animation failed while updating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("animation failed: {reason}")]
pub struct AnimationError {
    pub reason: String,
}

impl AnimationError {
    /// Create an error with a reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Why a playback handle resolved without completing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("playback cancelled")]
    Cancelled,

    #[error(transparent)]
    Failed(#[from] AnimationError),

    #[error("scheduler dropped before playback finished")]
    Dropped,
}
