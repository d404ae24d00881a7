//! Whole-battle simulation.

use super::policy::ActionPolicy;
use crate::core::{CombatAction, CombatState, Dice, Phase};
use crate::rules::CombatEngine;

/// Drive a battle with `policy` deciding for every combatant.
///
/// Begins the battle if needed. A `None` decision or a rejected action
/// ends the actor's turn. Stops when combat ends or after `max_actions`
/// resolved actions, returning the last state.
pub fn play_out<D: Dice + ?Sized>(
    engine: &CombatEngine,
    state: &CombatState,
    dice: &mut D,
    policy: &dyn ActionPolicy,
    max_actions: usize,
) -> CombatState {
    let mut state = if state.phase == Phase::PreBattle {
        engine.begin(state).0
    } else {
        state.clone()
    };

    for _ in 0..max_actions {
        let Some(actor) = state.current_actor() else {
            break;
        };
        let action = policy
            .decide(engine, &state)
            .unwrap_or(CombatAction::EndTurn { actor });

        state = match engine.try_resolve(&state, &action, dice) {
            Ok(resolution) => resolution.state,
            Err(err) => {
                tracing::debug!("policy proposed an illegal action: {}", err);
                engine.resolve(&state, &CombatAction::EndTurn { actor }, dice).0
            }
        };
    }

    state
}
