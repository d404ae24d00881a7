//! Initiative and turn bookkeeping.

use super::context::Resolver;
use crate::core::{CombatantId, Phase};
use crate::events::CombatEvent;

/// Fix the turn order: effective speed descending, then lowest id.
///
/// The advantaged side adds `initiative_advantage_bonus` to its speed.
/// Every combatant present is ordered, so the result is a permutation of
/// the combatant map.
pub(super) fn roll_initiative(r: &mut Resolver<'_>) {
    r.state.phase = Phase::Initiative;
    let bonus = r.config.initiative_advantage_bonus;
    let advantage = r.state.advantage;

    let mut order: Vec<(u32, CombatantId)> = r
        .state
        .combatants
        .values()
        .map(|c| {
            let edge = if advantage == Some(c.side()) { bonus } else { 0 };
            (c.stats.speed + edge, c.id)
        })
        .collect();
    order.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    r.state.initiative = order.into_iter().map(|(_, id)| id).collect();
    r.state.current = r
        .state
        .initiative
        .iter()
        .position(|&id| r.is_standing(id))
        .unwrap_or(0);
    r.emit(CombatEvent::InitiativeRolled {
        order: r.state.initiative.clone(),
    });
}

/// Upkeep for the combatant at the turn pointer.
///
/// Refreshes AP, resets per-turn counters, drops the actor's defend stance
/// and unused overwatch, and lapses expired marks.
pub(super) fn start_turn(r: &mut Resolver<'_>) {
    r.state.phase = Phase::TurnStart;
    let Some(&actor) = r.state.initiative.get(r.state.current) else {
        return;
    };

    let ap = r.config.ap_per_turn;
    let ward = r.get(actor).guarding;
    if let Some(ward) = ward {
        r.update(ward, |w| w.guarded_by = None);
    }
    r.update(actor, |c| {
        c.ap_remaining = ap;
        c.light_attacks_this_turn = 0;
        c.status.defending = false;
        c.status.overwatching = false;
        c.guarding = None;
    });
    r.state.overwatch_reactions = 0;

    let turn = r.state.turn;
    let expired: Vec<CombatantId> = r
        .state
        .marks
        .iter()
        .filter(|m| turn >= m.expires_turn)
        .map(|m| m.target)
        .collect();
    if !expired.is_empty() {
        r.state.marks.retain(|m| turn < m.expires_turn);
        for target in expired {
            r.emit(CombatEvent::MarkExpired { target });
        }
    }

    r.emit(CombatEvent::TurnStarted { actor, turn, ap });
    r.state.phase = Phase::AwaitingInput;
}

/// Close the actor's turn: tick its buffs.
pub(super) fn end_turn(r: &mut Resolver<'_>, actor: CombatantId) {
    let mut expired = Vec::new();
    r.update(actor, |c| {
        for buff in c.buffs.iter_mut() {
            buff.turns_remaining = buff.turns_remaining.saturating_sub(1);
            if buff.turns_remaining == 0 {
                expired.push(buff.kind);
            }
        }
        c.buffs.retain(|b| b.turns_remaining > 0);
    });
    for kind in expired {
        r.emit(CombatEvent::BuffExpired { target: actor, kind });
    }
    r.emit(CombatEvent::TurnEnded { actor });
}

/// Move the pointer to the next standing combatant and start its turn.
///
/// Downed combatants are skipped. Passing the end of the order wraps to
/// the front and increments the round counter.
pub(super) fn advance(r: &mut Resolver<'_>) {
    let len = r.state.initiative.len();
    if len == 0 {
        return;
    }
    let mut index = r.state.current;
    for _ in 0..len {
        index += 1;
        if index >= len {
            index = 0;
            r.state.turn += 1;
        }
        if r.is_standing(r.state.initiative[index]) {
            break;
        }
    }
    r.state.current = index;
    start_turn(r);
}
