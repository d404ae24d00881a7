//! Narrative log entries.
//!
//! Every resolved action appends exactly one `CombatLogEntry`. Its
//! mechanical fields are derived from the action's events alone, so the
//! same events always produce the same entry and the same text. Narrators
//! may later append flavor text, nothing else.

use serde::{Deserialize, Serialize};

use super::event::{AttackKind, CombatEvent, HitQuality};
use crate::core::{ActionKind, CombatAction, CombatState, CombatantId};

/// Mechanical summary of one action.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Quality of the actor's primary attack.
    pub quality: Option<HitQuality>,
    /// Damage dealt by the actor's attacks (cleave and blast included).
    pub damage_dealt: u32,
    /// Part of that damage taken by guards instead of their wards.
    pub intercepted_damage: u32,
    /// HP restored by an item.
    pub healed: u32,
    /// Combatants taken down during the action, reactions included.
    pub defeated: Vec<CombatantId>,
    /// Result of a flee attempt.
    pub flee_success: Option<bool>,
}

/// Immutable record of one resolved action.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatLogEntry {
    /// Position in the log, starting at 0.
    pub sequence: u32,
    /// Round in which the action happened.
    pub turn: u32,
    pub actor: CombatantId,
    pub action: ActionKind,
    pub target: Option<CombatantId>,
    pub outcome: ActionOutcome,
    /// Deterministic description of what happened.
    pub mechanical_text: String,
    /// Flavor text appended by a narrator.
    pub narration: Option<String>,
}

impl CombatLogEntry {
    /// Build the entry for an action from the events it produced.
    ///
    /// `state` supplies display names; any snapshot containing the
    /// combatants works since names never change.
    #[must_use]
    pub fn from_events(
        sequence: u32,
        turn: u32,
        action: &CombatAction,
        events: &[CombatEvent],
        state: &CombatState,
    ) -> Self {
        let actor = action.actor();
        let outcome = summarize(actor, events);
        let name = |id: CombatantId| -> String {
            state
                .combatant(id)
                .map_or_else(|| id.to_string(), |c| c.name.clone())
        };

        let mut lines: Vec<String> = Vec::new();
        if let CombatAction::EndTurn { .. } = action {
            lines.push(format!("{} ends the turn.", name(actor)));
        }
        lines.extend(events.iter().filter_map(|e| describe(e, &name)));

        Self {
            sequence,
            turn,
            actor,
            action: action.kind(),
            target: action.target(),
            outcome,
            mechanical_text: lines.join(" "),
            narration: None,
        }
    }

    /// Append narrator text (builder pattern).
    #[must_use]
    pub fn with_narration(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.narration = Some(match self.narration.take() {
            Some(existing) => format!("{existing}\n{text}"),
            None => text,
        });
        self
    }
}

fn summarize(actor: CombatantId, events: &[CombatEvent]) -> ActionOutcome {
    let mut outcome = ActionOutcome::default();
    // Interceptions directly follow the attack they split.
    let mut last_attacker: Option<CombatantId> = None;

    for event in events {
        match event {
            CombatEvent::AttackResolved(report) => {
                last_attacker = Some(report.attacker);
                if report.attacker != actor {
                    continue;
                }
                if outcome.quality.is_none()
                    && matches!(report.kind, AttackKind::Normal | AttackKind::Blast)
                {
                    outcome.quality = Some(report.quality);
                }
                outcome.damage_dealt += report.final_damage;
            }
            CombatEvent::DamageIntercepted { intercepted, .. } if last_attacker == Some(actor) => {
                outcome.intercepted_damage += intercepted;
            }
            CombatEvent::CharacterDefeated { target, .. } => outcome.defeated.push(*target),
            CombatEvent::ItemUsed { healed, .. } => outcome.healed += healed,
            CombatEvent::FleeAttempted { success, .. } => outcome.flee_success = Some(*success),
            _ => {}
        }
    }

    outcome
}

fn describe(event: &CombatEvent, name: &dyn Fn(CombatantId) -> String) -> Option<String> {
    let text = match event {
        CombatEvent::InitiativeRolled { .. }
        | CombatEvent::TurnStarted { .. }
        | CombatEvent::TurnEnded { .. } => return None,

        CombatEvent::AttackResolved(r) => {
            let lead = match r.kind {
                AttackKind::Reaction => "reacts against",
                AttackKind::Cleave => "cleaves into",
                AttackKind::Normal | AttackKind::Blast => "attacks",
            };
            let result = match r.quality {
                HitQuality::Miss => "miss".to_string(),
                HitQuality::ArmorSoak => {
                    format!("armor soaks the blow, {} damage", r.final_damage)
                }
                q => format!("{q} hit for {} damage", r.final_damage),
            };
            let mut text = format!(
                "{} {} {}: {} (roll {}, {} vs {}).",
                name(r.attacker),
                lead,
                name(r.target),
                result,
                r.roll,
                r.attack_value,
                r.defense
            );
            if r.friendly_fire {
                text.push_str(" Friendly fire!");
            }
            if let Some(excess) = r.overkill {
                text.push_str(&format!(" Overkill by {excess}."));
            }
            text
        }
        CombatEvent::DamageIntercepted { guard, ward, intercepted } => format!(
            "{} intercepts {} damage meant for {}.",
            name(*guard),
            intercepted,
            name(*ward)
        ),
        CombatEvent::CharacterDefeated { target, knocked_out, .. } => {
            if *knocked_out {
                format!("{} is knocked out.", name(*target))
            } else {
                format!("{} is slain.", name(*target))
            }
        }
        CombatEvent::OverwatchTriggered { watcher, trigger, penalty } => format!(
            "{} fires on {} from overwatch (-{}).",
            name(*watcher),
            name(*trigger),
            penalty
        ),
        CombatEvent::CleaveTriggered { attacker, target } => {
            format!("{} follows through toward {}.", name(*attacker), name(*target))
        }
        CombatEvent::MoveCompleted { actor, from, to } => {
            format!("{} moves from {} to {}.", name(*actor), from, to)
        }
        CombatEvent::SwapCompleted { actor, other, .. } => {
            format!("{} swaps places with {}.", name(*actor), name(*other))
        }
        CombatEvent::DefendActivated { actor, guarding } => match guarding {
            Some(ward) => format!("{} defends, guarding {}.", name(*actor), name(*ward)),
            None => format!("{} takes a defensive stance.", name(*actor)),
        },
        CombatEvent::OverwatchSet { actor } => format!("{} watches for movement.", name(*actor)),
        CombatEvent::AimedShotReady { actor } => format!("{} takes careful aim.", name(*actor)),
        CombatEvent::TargetMarked { actor, target, expires_turn } => format!(
            "{} marks {} until turn {}.",
            name(*actor),
            name(*target),
            expires_turn
        ),
        CombatEvent::MarkExpired { target } => format!("The mark on {} fades.", name(*target)),
        CombatEvent::ItemUsed { actor, target, healed, buff, .. } => match buff {
            Some(kind) => {
                format!("{} uses an item on {} ({kind:?} up).", name(*actor), name(*target))
            }
            None => format!(
                "{} uses an item on {}, restoring {} HP.",
                name(*actor),
                name(*target),
                healed
            ),
        },
        CombatEvent::BuffExpired { target, kind } => {
            format!("{}'s {kind:?} bonus wears off.", name(*target))
        }
        CombatEvent::FleeAttempted { actor, total, dc, success, .. } => {
            if *success {
                format!("{} flees ({} vs {}).", name(*actor), total, dc)
            } else {
                format!("{} fails to escape ({} vs {}).", name(*actor), total, dc)
            }
        }
        CombatEvent::Revived { target, hp } => {
            format!("{} comes to with {} HP.", name(*target), hp)
        }
        CombatEvent::CombatVictory { experience } => format!("Victory! {experience} XP earned."),
        CombatEvent::CombatDefeat => "Defeat.".to_string(),
        CombatEvent::CombatFled { actor } => format!("{} escapes the battle.", name(*actor)),
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::AttackReport;
    use crate::equipment::WeaponId;

    fn report(attacker: u32, target: u32, final_damage: u32, kind: AttackKind) -> AttackReport {
        AttackReport {
            attacker: CombatantId(attacker),
            target: CombatantId(target),
            weapon: WeaponId::UNARMED,
            kind,
            roll: 12,
            attack_value: 12,
            defense: 5,
            margin: 7,
            raw_damage: final_damage,
            final_damage,
            quality: HitQuality::Solid,
            killing_blow: false,
            overkill: None,
            friendly_fire: false,
        }
    }

    fn attack(actor: u32, target: u32) -> CombatAction {
        CombatAction::Attack {
            actor: CombatantId(actor),
            target: crate::core::AttackTarget::Combatant(CombatantId(target)),
        }
    }

    #[test]
    fn test_outcome_counts_only_actor_damage() {
        let events = vec![
            CombatEvent::AttackResolved(report(0, 1, 6, AttackKind::Normal)),
            CombatEvent::DamageIntercepted {
                guard: CombatantId(2),
                ward: CombatantId(1),
                intercepted: 3,
            },
            CombatEvent::AttackResolved(report(3, 0, 4, AttackKind::Reaction)),
            CombatEvent::DamageIntercepted {
                guard: CombatantId(4),
                ward: CombatantId(0),
                intercepted: 2,
            },
        ];
        let state = CombatState::new(3);
        let entry = CombatLogEntry::from_events(0, 1, &attack(0, 1), &events, &state);

        assert_eq!(entry.outcome.quality, Some(HitQuality::Solid));
        assert_eq!(entry.outcome.damage_dealt, 6);
        assert_eq!(entry.outcome.intercepted_damage, 3);
        assert_eq!(entry.action, ActionKind::Attack);
        assert_eq!(entry.target, Some(CombatantId(1)));
    }

    #[test]
    fn test_text_is_deterministic() {
        let events = vec![
            CombatEvent::AttackResolved(report(0, 1, 6, AttackKind::Normal)),
            CombatEvent::CharacterDefeated {
                target: CombatantId(1),
                by: Some(CombatantId(0)),
                knocked_out: false,
            },
        ];
        let state = CombatState::new(3);
        let a = CombatLogEntry::from_events(0, 1, &attack(0, 1), &events, &state);
        let b = CombatLogEntry::from_events(0, 1, &attack(0, 1), &events, &state);

        assert_eq!(a, b);
        assert_eq!(
            a.mechanical_text,
            "Combatant(0) attacks Combatant(1): solid hit for 6 damage (roll 12, 12 vs 5). \
             Combatant(1) is slain."
        );
        assert_eq!(a.outcome.defeated, vec![CombatantId(1)]);
    }

    #[test]
    fn test_narration_appends() {
        let state = CombatState::new(3);
        let entry = CombatLogEntry::from_events(
            0,
            1,
            &CombatAction::EndTurn { actor: CombatantId(0) },
            &[],
            &state,
        );
        assert_eq!(entry.mechanical_text, "Combatant(0) ends the turn.");

        let entry = entry.with_narration("A pause.").with_narration("Silence.");
        assert_eq!(entry.narration.as_deref(), Some("A pause.\nSilence."));
        assert_eq!(entry.mechanical_text, "Combatant(0) ends the turn.");
    }
}
