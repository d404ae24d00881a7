//! Combat state snapshots.
//!
//! `CombatState` is a value. The reducer never edits a snapshot it was
//! handed: it clones it (cheap, thanks to `im` persistent collections for
//! the combatant map, marks and log) and returns the edited copy.
//!
//! ## Phases
//!
//! ```text
//! PreBattle → Initiative → TurnStart → AwaitingInput → Resolving → TurnEnd
//!                              ↑                                      │
//!                              └──────────────────────────────────────┤
//!                                                  Victory | Defeat | Fled
//! ```

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use super::combatant::Combatant;
use super::entity::{CombatantId, Side};
use crate::battlefield::Battlefield;
use crate::error::{InvariantViolation, NarrationError, SnapshotError};
use crate::events::{CombatEvent, CombatLogEntry};

/// Where the combat state machine stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Built from encounter data, initiative not rolled yet.
    PreBattle,
    /// Initiative is being rolled.
    Initiative,
    /// Start-of-turn upkeep for the current actor.
    TurnStart,
    /// Waiting for the current actor's action.
    AwaitingInput,
    /// An action is being resolved.
    Resolving,
    /// End-of-turn upkeep and terminal evaluation.
    TurnEnd,
    /// All hostiles are down.
    Victory,
    /// All friendlies are down.
    Defeat,
    /// The player left the battle.
    Fled,
}

impl Phase {
    /// Whether combat is over.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Phase::Victory | Phase::Defeat | Phase::Fled)
    }
}

/// A mark placed on an opponent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mark {
    /// Marked combatant.
    pub target: CombatantId,
    /// Who placed it.
    pub placed_by: CombatantId,
    /// Round at whose start the mark lapses.
    pub expires_turn: u32,
}

/// How combat ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Victory,
    Defeat,
    Fled,
}

/// Rewards granted on victory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rewards {
    /// Experience earned from defeated hostiles.
    pub experience: u32,
}

/// Final result, set once a terminal phase is reached.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatResult {
    /// How combat ended.
    pub outcome: Outcome,
    /// Rewards (zero unless victorious).
    pub rewards: Rewards,
    /// Friendly combatants still standing, by id.
    pub survivors: Vec<CombatantId>,
    /// Combatants of either side that ended dead or knocked out, by id.
    pub defeated: Vec<CombatantId>,
    /// The player was knocked out and revived because allies won the fight.
    pub carried: bool,
}

/// A complete snapshot of one encounter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatState {
    // === Progression ===
    /// Current phase.
    pub phase: Phase,
    /// Round counter, starting at 1. Increments when initiative wraps.
    pub turn: u32,

    // === Participants ===
    /// Every combatant, ordered by id.
    pub combatants: OrdMap<CombatantId, Combatant>,
    /// Slot occupancy.
    pub battlefield: Battlefield,
    /// Turn order, fixed at initiative. A permutation of `combatants`.
    pub initiative: Vec<CombatantId>,
    /// Index into `initiative` of the acting combatant.
    pub current: usize,

    // === Per-turn bookkeeping ===
    /// Active marks.
    pub marks: Vector<Mark>,
    /// Overwatch reactions fired during the current turn.
    pub overwatch_reactions: u32,

    // === History ===
    /// One entry per resolved action.
    pub log: Vector<CombatLogEntry>,
    /// Events of the last transition, awaiting playback.
    pub pending_events: Vec<CombatEvent>,

    // === Encounter metadata ===
    /// Opaque room description for display.
    pub room: Option<String>,
    /// Side holding the initiative advantage.
    pub advantage: Option<Side>,

    /// Set only once a terminal phase is reached.
    pub result: Option<CombatResult>,
}

impl CombatState {
    /// Create an empty pre-battle state.
    #[must_use]
    pub fn new(width: u8) -> Self {
        Self {
            phase: Phase::PreBattle,
            turn: 1,
            combatants: OrdMap::new(),
            battlefield: Battlefield::new(width),
            initiative: Vec::new(),
            current: 0,
            marks: Vector::new(),
            overwatch_reactions: 0,
            log: Vector::new(),
            pending_events: Vec::new(),
            room: None,
            advantage: None,
            result: None,
        }
    }

    // === Queries ===

    /// Look up a combatant.
    #[must_use]
    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.get(&id)
    }

    /// Whose turn it is. `None` before initiative and after combat ends.
    #[must_use]
    pub fn current_actor(&self) -> Option<CombatantId> {
        match self.phase {
            Phase::PreBattle | Phase::Initiative => None,
            p if p.is_terminal() => None,
            _ => self.initiative.get(self.current).copied(),
        }
    }

    /// Standing combatants of one side, by id.
    pub fn standing(&self, side: Side) -> impl Iterator<Item = &Combatant> + '_ {
        self.combatants
            .values()
            .filter(move |c| c.side() == side && c.is_standing())
    }

    /// Whether a combatant carries an active mark.
    #[must_use]
    pub fn is_marked(&self, id: CombatantId) -> bool {
        self.marks.iter().any(|m| m.target == id)
    }

    /// The final result. `None` until combat is over.
    #[must_use]
    pub fn result(&self) -> Option<&CombatResult> {
        self.result.as_ref()
    }

    /// Whether combat is over.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Find a log entry by sequence number.
    #[must_use]
    pub fn log_entry(&self, sequence: u32) -> Option<&CombatLogEntry> {
        self.log.iter().find(|e| e.sequence == sequence)
    }

    // === Derived snapshots ===

    /// Encode the snapshot as compact bytes for checkpoints and replays.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a checkpoint written by [`CombatState::to_bytes`].
    ///
    /// The restored state is verified, so a tampered checkpoint is rejected
    /// here instead of panicking inside the reducer later.
    pub fn from_bytes(bytes: &[u8], ap_per_turn: u8) -> Result<Self, SnapshotError> {
        let state: CombatState = bincode::deserialize(bytes)?;
        state.verify(ap_per_turn)?;
        Ok(state)
    }

    /// A copy with narrator text appended to one log entry.
    ///
    /// Mechanical fields are never touched. Text is appended after any
    /// narration already present.
    pub fn append_narration(
        &self,
        sequence: u32,
        text: impl Into<String>,
    ) -> Result<CombatState, NarrationError> {
        let index = self
            .log
            .iter()
            .position(|e| e.sequence == sequence)
            .ok_or(NarrationError::UnknownEntry(sequence))?;

        let mut next = self.clone();
        let entry = next.log[index].clone().with_narration(text);
        next.log[index] = entry;
        Ok(next)
    }

    /// A copy with the pending-event buffer emptied, once playback is done.
    #[must_use]
    pub fn clear_pending_events(&self) -> CombatState {
        let mut next = self.clone();
        next.pending_events.clear();
        next
    }

    // === Mutation (reducer only) ===

    pub(crate) fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.get_mut(&id)
    }

    // === Invariants ===

    /// Check the structural invariants.
    ///
    /// A failure means an earlier transition produced a corrupted state.
    pub fn verify(&self, ap_per_turn: u8) -> Result<(), InvariantViolation> {
        self.battlefield.check_shape()?;
        self.battlefield.check_unique()?;

        for (slot, id) in self.battlefield.occupied() {
            let Some(c) = self.combatant(id) else {
                return Err(InvariantViolation::DanglingSlot { slot, id });
            };
            if c.slot != Some(slot) {
                return Err(InvariantViolation::SlotMismatch {
                    id,
                    recorded: c.slot,
                    actual: Some(slot),
                });
            }
        }

        for c in self.combatants.values() {
            if let Some(slot) = c.slot {
                if c.is_down() {
                    return Err(InvariantViolation::DownedOnField { id: c.id, slot });
                }
                if self.battlefield.occupant(slot) != Some(c.id) {
                    return Err(InvariantViolation::SlotMismatch {
                        id: c.id,
                        recorded: Some(slot),
                        actual: self.battlefield.slot_of(c.id),
                    });
                }
            }
            if c.ap_remaining > ap_per_turn {
                return Err(InvariantViolation::ApOutOfRange {
                    id: c.id,
                    ap: c.ap_remaining,
                    max: ap_per_turn,
                });
            }
            if let Some(ward) = c.guarding {
                if self.combatant(ward).and_then(|w| w.guarded_by) != Some(c.id) {
                    return Err(InvariantViolation::DanglingLink { from: c.id, to: ward });
                }
            }
            if let Some(guard) = c.guarded_by {
                if self.combatant(guard).and_then(|g| g.guarding) != Some(c.id) {
                    return Err(InvariantViolation::DanglingLink { from: c.id, to: guard });
                }
            }
        }

        for mark in &self.marks {
            if self.combatant(mark.target).is_none() {
                return Err(InvariantViolation::DanglingLink {
                    from: mark.placed_by,
                    to: mark.target,
                });
            }
        }

        if self.phase != Phase::PreBattle {
            let mut order = self.initiative.clone();
            order.sort_unstable();
            if !order.iter().copied().eq(self.combatants.keys().copied()) {
                return Err(InvariantViolation::InitiativeNotPermutation);
            }
        }

        if self.phase == Phase::AwaitingInput {
            if let Some(id) = self.current_actor() {
                if self.combatant(id).map_or(true, Combatant::is_down) {
                    return Err(InvariantViolation::TurnOnDowned(id));
                }
            }
        }

        Ok(())
    }
}
