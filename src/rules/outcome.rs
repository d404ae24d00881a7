//! Terminal evaluation.

use super::context::Resolver;
use crate::core::{CombatResult, Controller, Outcome, Phase, Rewards, Side};
use crate::events::CombatEvent;

/// Check for the end of combat. Returns `true` if a terminal phase was
/// entered.
///
/// A fleeing player ends combat even with both sides standing, and a
/// simultaneous wipe counts as a defeat.
pub(super) fn evaluate(r: &mut Resolver<'_>) -> bool {
    let fled_player = r
        .state
        .combatants
        .values()
        .find(|c| c.controller == Controller::Player && c.status.fled)
        .map(|c| c.id);
    let friendlies_standing = r.state.standing(Side::Friendly).next().is_some();
    let hostiles_standing = r.state.standing(Side::Hostile).next().is_some();

    let (outcome, experience, carried) = if let Some(actor) = fled_player {
        r.emit(CombatEvent::CombatFled { actor });
        (Outcome::Fled, 0, false)
    } else if !friendlies_standing {
        r.emit(CombatEvent::CombatDefeat);
        (Outcome::Defeat, 0, false)
    } else if !hostiles_standing {
        let carried = revive(r);
        let experience = experience(r);
        r.emit(CombatEvent::CombatVictory { experience });
        (Outcome::Victory, experience, carried)
    } else {
        return false;
    };

    let survivors = r.state.standing(Side::Friendly).map(|c| c.id).collect();
    let defeated = r
        .state
        .combatants
        .values()
        .filter(|c| c.status.dead || c.status.knocked_out)
        .map(|c| c.id)
        .collect();

    r.state.phase = match outcome {
        Outcome::Victory => Phase::Victory,
        Outcome::Defeat => Phase::Defeat,
        Outcome::Fled => Phase::Fled,
    };
    r.state.result = Some(CombatResult {
        outcome,
        rewards: Rewards { experience },
        survivors,
        defeated,
        carried,
    });
    tracing::info!("combat ended: {:?} ({} XP)", outcome, experience);
    true
}

/// Bring knocked-out friendlies back to `revive_pct` of max HP.
///
/// Allies always get up. The player only does if an ally is still standing
/// to carry them; returns whether that happened.
fn revive(r: &mut Resolver<'_>) -> bool {
    let revive_pct = r.config.revive_pct;
    let ally_standing = r
        .state
        .standing(Side::Friendly)
        .any(|c| c.controller == Controller::Ally);

    let revivals: Vec<_> = r
        .state
        .combatants
        .values()
        .filter(|c| c.status.knocked_out)
        .filter(|c| c.controller == Controller::Ally || ally_standing)
        .map(|c| (c.id, c.controller, (c.stats.max_hp * revive_pct / 100).max(1)))
        .collect();

    let mut carried = false;
    for (id, controller, hp) in revivals {
        r.update(id, |c| {
            c.status.knocked_out = false;
            c.hp = hp;
        });
        carried |= controller == Controller::Player;
        r.emit(CombatEvent::Revived { target: id, hp });
    }
    carried
}

/// `xp_per_level` for every level of every slain hostile.
fn experience(r: &Resolver<'_>) -> u32 {
    let levels: u32 = r
        .state
        .combatants
        .values()
        .filter(|c| c.side() == Side::Hostile && c.status.dead)
        .map(|c| c.level)
        .sum();
    levels * r.config.xp_per_level
}
