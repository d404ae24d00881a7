//! Action validation.
//!
//! Validation is read-only. A `ValidationError` means the action is
//! rejected and the state stays exactly as it was.

use crate::battlefield::{is_valid_blast_center, valid_attack_targets, SlotRef};
use crate::core::{AttackTarget, CombatAction, CombatConfig, CombatState, Combatant, Phase};
use crate::equipment::{Armory, WeaponClass, WeaponWeight};
use crate::error::ValidationError;

/// Check an action against the state. Returns its AP cost.
pub(crate) fn validate(
    config: &CombatConfig,
    armory: &Armory,
    state: &CombatState,
    action: &CombatAction,
) -> Result<u8, ValidationError> {
    if state.phase != Phase::AwaitingInput {
        return Err(ValidationError::NotAwaitingInput { phase: state.phase });
    }

    let actor = action.actor();
    let c = state
        .combatant(actor)
        .ok_or(ValidationError::UnknownCombatant(actor))?;
    let expected = state.current_actor();
    if expected != Some(actor) {
        return Err(ValidationError::NotYourTurn { actor, expected });
    }
    if c.is_down() {
        return Err(ValidationError::ActorDown(actor));
    }

    let cost = action_cost(config, armory, c, action);
    if cost > c.ap_remaining {
        return Err(ValidationError::InsufficientAp {
            actor,
            required: cost,
            available: c.ap_remaining,
        });
    }

    match *action {
        CombatAction::Attack { target, .. } => check_attack(config, armory, state, c, target)?,
        CombatAction::Defend { guard, .. } => {
            if let Some(ward) = guard {
                check_guard(state, c, ward)?;
            }
        }
        CombatAction::Overwatch { .. }
        | CombatAction::Flee { .. }
        | CombatAction::EndTurn { .. } => {}
        CombatAction::AimedShot { .. } => {
            let weapon = armory.weapon(c.weapon);
            if weapon.class != WeaponClass::Ranged {
                return Err(ValidationError::RequiresRangedWeapon { actor, weapon: weapon.id });
            }
            if c.status.aimed_shot_ready {
                return Err(ValidationError::AlreadyAiming { actor });
            }
        }
        CombatAction::MarkTarget { target, .. } => {
            if !valid_attack_targets(state, armory, actor).contains(&target) {
                return Err(ValidationError::InvalidTarget { actor, target });
            }
        }
        CombatAction::Move { to, .. } => {
            let slot = SlotRef::new(c.side(), to);
            if !state.battlefield.is_free(slot) {
                return Err(ValidationError::InvalidSlot { actor, index: to });
            }
        }
        CombatAction::Swap { with, .. } => {
            let slot = SlotRef::new(c.side(), with);
            let adjacent = c.slot.is_some_and(|own| own.column_distance(slot) == 1);
            let partner_ok = state
                .battlefield
                .occupant(slot)
                .and_then(|id| state.combatant(id))
                .is_some_and(|p| p.is_standing() && p.side() == c.side());
            if !adjacent || !partner_ok {
                return Err(ValidationError::InvalidSlot { actor, index: with });
            }
        }
        CombatAction::UseItem { item, target, .. } => {
            if armory.item(item).is_none() || c.charges(item) == 0 {
                return Err(ValidationError::ItemUnavailable { actor, item });
            }
            if let Some(recipient) = target {
                if recipient != actor && !is_adjacent_ally(state, c, recipient) {
                    return Err(ValidationError::InvalidTarget { actor, target: recipient });
                }
            }
        }
    }

    Ok(cost)
}

/// AP an action costs `actor`, assuming it is otherwise legal.
pub(crate) fn action_cost(
    config: &CombatConfig,
    armory: &Armory,
    actor: &Combatant,
    action: &CombatAction,
) -> u8 {
    match *action {
        CombatAction::Attack { .. } => armory.weapon(actor.weapon).ap_cost,
        CombatAction::Defend { .. } => config.defend_cost,
        CombatAction::Overwatch { .. } => config.overwatch_cost,
        CombatAction::AimedShot { .. } => config.aimed_shot_cost,
        CombatAction::MarkTarget { .. } => config.mark_cost,
        CombatAction::Move { .. } => config.move_cost,
        CombatAction::Swap { .. } => config.swap_cost,
        CombatAction::UseItem { item, .. } => armory.item(item).map_or(0, |def| def.ap_cost),
        CombatAction::Flee { .. } => config.flee_cost,
        CombatAction::EndTurn { .. } => 0,
    }
}

fn check_attack(
    config: &CombatConfig,
    armory: &Armory,
    state: &CombatState,
    c: &Combatant,
    target: AttackTarget,
) -> Result<(), ValidationError> {
    let actor = c.id;
    let weapon = armory.weapon(c.weapon);

    let light_spent = c.light_attacks_this_turn >= config.light_attacks_per_turn;
    if weapon.weight == WeaponWeight::Light && light_spent {
        return Err(ValidationError::LightAttackLimit { actor });
    }

    match target {
        AttackTarget::Combatant(id) => {
            if !valid_attack_targets(state, armory, actor).contains(&id) {
                return Err(ValidationError::InvalidTarget { actor, target: id });
            }
        }
        AttackTarget::Tile(tile) => {
            let legal = c
                .slot
                .is_some_and(|from| is_valid_blast_center(&state.battlefield, weapon, from, tile));
            if !legal {
                return Err(ValidationError::InvalidTile { actor, tile });
            }
        }
    }
    Ok(())
}

fn check_guard(
    state: &CombatState,
    c: &Combatant,
    ward: crate::core::CombatantId,
) -> Result<(), ValidationError> {
    let free = state
        .combatant(ward)
        .is_some_and(|w| w.guarded_by.is_none() || w.guarded_by == Some(c.id));
    if ward == c.id || !is_adjacent_ally(state, c, ward) || !free {
        return Err(ValidationError::InvalidGuard { actor: c.id, ward });
    }
    Ok(())
}

/// A standing same-side combatant one column away in the actor's row.
fn is_adjacent_ally(state: &CombatState, c: &Combatant, other: crate::core::CombatantId) -> bool {
    let Some(own) = c.slot else {
        return false;
    };
    state.combatant(other).is_some_and(|o| {
        o.is_standing()
            && o.side() == c.side()
            && o.slot.is_some_and(|slot| slot.side == own.side && slot.column_distance(own) == 1)
    })
}
