//! Typed combat events.
//!
//! Events are the reducer's only rendering-facing output. Each transition
//! emits them in the order the effects happened, and playback consumes
//! them in that same order.

use serde::{Deserialize, Serialize};

use crate::battlefield::SlotRef;
use crate::core::CombatantId;
use crate::equipment::{BuffKind, ItemId, WeaponId};

/// Classification of an attack by its margin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitQuality {
    /// Margin below zero. No damage.
    Miss,
    /// Margin below the solid threshold.
    Marginal,
    /// Margin at or above the solid threshold.
    Solid,
    /// Margin at or above the crushing threshold.
    Crushing,
    /// The hit landed but armor absorbed nearly all of it.
    ArmorSoak,
}

impl HitQuality {
    /// Whether the attack connected.
    #[must_use]
    pub fn is_hit(self) -> bool {
        !matches!(self, HitQuality::Miss)
    }
}

impl std::fmt::Display for HitQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HitQuality::Miss => "miss",
            HitQuality::Marginal => "marginal",
            HitQuality::Solid => "solid",
            HitQuality::Crushing => "crushing",
            HitQuality::ArmorSoak => "armor_soak",
        };
        f.write_str(name)
    }
}

/// How an attack came about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    /// The actor's own attack action.
    Normal,
    /// An overwatch reaction.
    Reaction,
    /// A free follow-up after a killing blow.
    Cleave,
    /// One victim of an area blast.
    Blast,
}

/// Full arithmetic of one resolved attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttackReport {
    pub attacker: CombatantId,
    pub target: CombatantId,
    pub weapon: WeaponId,
    pub kind: AttackKind,
    /// Natural d20.
    pub roll: u32,
    /// Roll plus every modifier.
    pub attack_value: i32,
    /// Target defense including bonuses.
    pub defense: i32,
    /// `attack_value - defense`.
    pub margin: i32,
    /// Damage before armor.
    pub raw_damage: u32,
    /// Damage after armor and friendly-fire scaling.
    pub final_damage: u32,
    pub quality: HitQuality,
    /// The target dropped to 0 HP.
    pub killing_blow: bool,
    /// Damage beyond what the target had left, on an overkill.
    pub overkill: Option<u32>,
    /// The victim is on the attacker's own side.
    pub friendly_fire: bool,
}

/// Something that happened during a transition.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatEvent {
    // === Turn flow ===
    InitiativeRolled {
        order: Vec<CombatantId>,
    },
    TurnStarted {
        actor: CombatantId,
        turn: u32,
        ap: u8,
    },
    TurnEnded {
        actor: CombatantId,
    },

    // === Attacks ===
    AttackResolved(AttackReport),
    DamageIntercepted {
        guard: CombatantId,
        ward: CombatantId,
        intercepted: u32,
    },
    CharacterDefeated {
        target: CombatantId,
        by: Option<CombatantId>,
        knocked_out: bool,
    },
    OverwatchTriggered {
        watcher: CombatantId,
        trigger: CombatantId,
        penalty: i32,
    },
    CleaveTriggered {
        attacker: CombatantId,
        target: CombatantId,
    },

    // === Positioning ===
    MoveCompleted {
        actor: CombatantId,
        from: SlotRef,
        to: SlotRef,
    },
    SwapCompleted {
        actor: CombatantId,
        other: CombatantId,
        from: SlotRef,
        to: SlotRef,
    },

    // === Preparation ===
    DefendActivated {
        actor: CombatantId,
        guarding: Option<CombatantId>,
    },
    OverwatchSet {
        actor: CombatantId,
    },
    AimedShotReady {
        actor: CombatantId,
    },
    TargetMarked {
        actor: CombatantId,
        target: CombatantId,
        expires_turn: u32,
    },
    MarkExpired {
        target: CombatantId,
    },

    // === Items ===
    ItemUsed {
        actor: CombatantId,
        target: CombatantId,
        item: ItemId,
        healed: u32,
        buff: Option<BuffKind>,
    },
    BuffExpired {
        target: CombatantId,
        kind: BuffKind,
    },

    // === Flee and outcome ===
    FleeAttempted {
        actor: CombatantId,
        roll: u32,
        total: u32,
        dc: u32,
        success: bool,
    },
    Revived {
        target: CombatantId,
        hp: u32,
    },
    CombatVictory {
        experience: u32,
    },
    CombatDefeat,
    CombatFled {
        actor: CombatantId,
    },
}

impl CombatEvent {
    /// Whether this event ends combat.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CombatEvent::CombatVictory { .. }
                | CombatEvent::CombatDefeat
                | CombatEvent::CombatFled { .. }
        )
    }
}
