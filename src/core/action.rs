//! Combat actions.
//!
//! `CombatAction` is a closed sum type: one variant per verb, each carrying
//! the acting combatant plus its own operands. The reducer dispatches on it
//! with a single exhaustive `match`.
//!
//! ```
//! use grid_tactics::core::{ActionKind, CombatAction, CombatantId};
//!
//! let action = CombatAction::Move { actor: CombatantId(0), to: 3 };
//! assert_eq!(action.actor(), CombatantId(0));
//! assert_eq!(action.kind(), ActionKind::Move);
//! ```

use serde::{Deserialize, Serialize};

use super::entity::CombatantId;
use crate::battlefield::SlotRef;
use crate::equipment::ItemId;

/// What an attack is aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackTarget {
    /// A combatant. Area weapons centre their blast on its tile.
    Combatant(CombatantId),
    /// A tile. Only area weapons may target an empty tile.
    Tile(SlotRef),
}

/// A player, ally or enemy decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatAction {
    /// Strike with the equipped weapon.
    Attack {
        actor: CombatantId,
        target: AttackTarget,
    },
    /// Raise defense until the next turn, optionally guarding an ally.
    Defend {
        actor: CombatantId,
        guard: Option<CombatantId>,
    },
    /// Reserve a reaction shot.
    Overwatch { actor: CombatantId },
    /// Store an aimed-shot charge for the next ranged attack.
    AimedShot { actor: CombatantId },
    /// Mark an opponent for ranged follow-ups.
    MarkTarget {
        actor: CombatantId,
        target: CombatantId,
    },
    /// Step to an empty slot of the actor's own row.
    Move { actor: CombatantId, to: u8 },
    /// Trade places with an adjacent ally.
    Swap { actor: CombatantId, with: u8 },
    /// Use a carried consumable on self or an adjacent ally.
    UseItem {
        actor: CombatantId,
        item: ItemId,
        target: Option<CombatantId>,
    },
    /// Try to leave the battle.
    Flee { actor: CombatantId },
    /// Give up the rest of the turn.
    EndTurn { actor: CombatantId },
}

impl CombatAction {
    /// The combatant performing the action.
    #[must_use]
    pub fn actor(&self) -> CombatantId {
        match *self {
            CombatAction::Attack { actor, .. }
            | CombatAction::Defend { actor, .. }
            | CombatAction::Overwatch { actor }
            | CombatAction::AimedShot { actor }
            | CombatAction::MarkTarget { actor, .. }
            | CombatAction::Move { actor, .. }
            | CombatAction::Swap { actor, .. }
            | CombatAction::UseItem { actor, .. }
            | CombatAction::Flee { actor }
            | CombatAction::EndTurn { actor } => actor,
        }
    }

    /// The verb, without operands.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            CombatAction::Attack { .. } => ActionKind::Attack,
            CombatAction::Defend { .. } => ActionKind::Defend,
            CombatAction::Overwatch { .. } => ActionKind::Overwatch,
            CombatAction::AimedShot { .. } => ActionKind::AimedShot,
            CombatAction::MarkTarget { .. } => ActionKind::MarkTarget,
            CombatAction::Move { .. } => ActionKind::Move,
            CombatAction::Swap { .. } => ActionKind::Swap,
            CombatAction::UseItem { .. } => ActionKind::UseItem,
            CombatAction::Flee { .. } => ActionKind::Flee,
            CombatAction::EndTurn { .. } => ActionKind::EndTurn,
        }
    }

    /// The combatant the action is aimed at, if it names one.
    #[must_use]
    pub fn target(&self) -> Option<CombatantId> {
        match *self {
            CombatAction::Attack {
                target: AttackTarget::Combatant(id),
                ..
            } => Some(id),
            CombatAction::Defend { guard, .. } => guard,
            CombatAction::MarkTarget { target, .. } => Some(target),
            CombatAction::UseItem { target, .. } => target,
            _ => None,
        }
    }
}

/// Action verb tags, used in log entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Attack,
    Defend,
    Overwatch,
    AimedShot,
    MarkTarget,
    Move,
    Swap,
    UseItem,
    Flee,
    EndTurn,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActionKind::Attack => "attack",
            ActionKind::Defend => "defend",
            ActionKind::Overwatch => "overwatch",
            ActionKind::AimedShot => "aimed_shot",
            ActionKind::MarkTarget => "mark_target",
            ActionKind::Move => "move",
            ActionKind::Swap => "swap",
            ActionKind::UseItem => "use_item",
            ActionKind::Flee => "flee",
            ActionKind::EndTurn => "end_turn",
        };
        f.write_str(name)
    }
}
