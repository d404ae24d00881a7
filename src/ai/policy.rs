//! Decision policies for AI-controlled combatants.
//!
//! Policies are trait-based so callers can swap in their own:
//! - `ActionPolicy`: choose one action for the current actor, or pass
//! - `TacticalPolicy`: attack, else close in, else defend

use crate::battlefield::{can_reach, valid_attack_targets, Battlefield, SlotRef};
use crate::core::{AttackTarget, CombatAction, CombatState, Combatant, CombatantId};
use crate::equipment::WeaponDef;
use crate::rules::CombatEngine;

// =============================================================================
// Policy Trait
// =============================================================================

/// Chooses an action for the combatant whose turn it is.
pub trait ActionPolicy: Send + Sync {
    /// Pick an action, or `None` to end the turn.
    ///
    /// Implementations must only return actions that pass
    /// `CombatEngine::validate`.
    fn decide(&self, engine: &CombatEngine, state: &CombatState) -> Option<CombatAction>;
}

// =============================================================================
// Tactical Policy
// =============================================================================

/// Fixed-priority policy:
///
/// 1. attack the reachable opponent with the lowest HP (then lowest id)
/// 2. move to the own-row slot that enables an attack, or else strictly
///    closes the distance to the nearest opponent (then lowest column)
/// 3. defend, guarding the weakest adjacent ally if one can be guarded
/// 4. end the turn
///
/// Every choice is checked with `validate`, so AP is never overspent.
#[derive(Clone, Copy, Debug, Default)]
pub struct TacticalPolicy;

impl ActionPolicy for TacticalPolicy {
    fn decide(&self, engine: &CombatEngine, state: &CombatState) -> Option<CombatAction> {
        let actor = state.current_actor()?;
        let c = state.combatant(actor)?;
        let legal =
            |action: CombatAction| engine.validate(state, &action).is_ok().then_some(action);

        let action = attack(engine, state, c)
            .and_then(legal)
            .or_else(|| advance(engine, state, c).and_then(legal))
            .or_else(|| defend(state, c).and_then(legal))
            .or_else(|| legal(CombatAction::Defend { actor, guard: None }));

        tracing::debug!("{} decided {:?}", actor, action);
        action
    }
}

fn attack(engine: &CombatEngine, state: &CombatState, c: &Combatant) -> Option<CombatAction> {
    let target = valid_attack_targets(state, engine.armory(), c.id)
        .into_iter()
        .filter_map(|id| state.combatant(id))
        .min_by_key(|t| (t.hp, t.id))?;
    Some(CombatAction::Attack {
        actor: c.id,
        target: AttackTarget::Combatant(target.id),
    })
}

fn advance(engine: &CombatEngine, state: &CombatState, c: &Combatant) -> Option<CombatAction> {
    let from = c.slot?;
    if !valid_attack_targets(state, engine.armory(), c.id).is_empty() {
        return None;
    }
    let weapon = engine.armory().weapon(c.weapon);
    let can_follow_up = c.ap_remaining >= engine.config().move_cost + weapon.ap_cost;
    let foes: Vec<SlotRef> = state
        .standing(c.side().opponent())
        .filter_map(|foe| foe.slot)
        .collect();
    let nearest = |slot: SlotRef| foes.iter().map(|&f| slot.distance(f)).min();
    let current = nearest(from)?;

    // (enables no attack, distance, column): lower is better.
    let best = state
        .battlefield
        .free_slots(c.side())
        .filter_map(|slot| {
            let distance = nearest(slot)?;
            let enables = can_follow_up
                && enables_attack(&state.battlefield, weapon, c.id, slot, &foes);
            (enables || distance < current).then_some(((!enables, distance, slot.index), slot))
        })
        .min_by_key(|&(key, _)| key)?;

    Some(CombatAction::Move {
        actor: c.id,
        to: best.1.index,
    })
}

fn enables_attack(
    field: &Battlefield,
    weapon: &WeaponDef,
    actor: CombatantId,
    slot: SlotRef,
    foes: &[SlotRef],
) -> bool {
    let mut moved = field.clone();
    if !moved.relocate(actor, slot) {
        return false;
    }
    foes.iter().any(|&foe| can_reach(&moved, weapon, slot, foe))
}

fn defend(state: &CombatState, c: &Combatant) -> Option<CombatAction> {
    let own = c.slot?;
    let ward = state
        .standing(c.side())
        .filter(|a| a.id != c.id && a.guarded_by.is_none())
        .filter(|a| a.slot.is_some_and(|s| s.side == own.side && s.column_distance(own) == 1))
        .min_by_key(|a| (a.hp, a.id))?;
    Some(CombatAction::Defend {
        actor: c.id,
        guard: Some(ward.id),
    })
}

/// Decide for the current actor if it is AI-controlled.
///
/// Returns `None` on the player's turn, before initiative and after combat.
#[must_use]
pub fn decide(engine: &CombatEngine, state: &CombatState) -> Option<CombatAction> {
    let actor = state.current_actor()?;
    if state.combatant(actor)?.controller.is_player() {
        return None;
    }
    TacticalPolicy.decide(engine, state)
}
