//! Preparatory actions: defend, overwatch, aimed shot, mark.

use super::context::Resolver;
use crate::core::{CombatantId, Mark};
use crate::events::CombatEvent;

pub(super) fn resolve_defend(r: &mut Resolver<'_>, actor: CombatantId, guard: Option<CombatantId>) {
    r.update(actor, |c| {
        c.status.defending = true;
        c.guarding = guard;
    });
    if let Some(ward) = guard {
        r.update(ward, |w| w.guarded_by = Some(actor));
    }
    r.emit(CombatEvent::DefendActivated {
        actor,
        guarding: guard,
    });
}

pub(super) fn resolve_overwatch(r: &mut Resolver<'_>, actor: CombatantId) {
    r.update(actor, |c| c.status.overwatching = true);
    r.emit(CombatEvent::OverwatchSet { actor });
}

pub(super) fn resolve_aimed_shot(r: &mut Resolver<'_>, actor: CombatantId) {
    r.update(actor, |c| c.status.aimed_shot_ready = true);
    r.emit(CombatEvent::AimedShotReady { actor });
}

/// Place a mark. Re-marking a target refreshes its expiry.
pub(super) fn resolve_mark(r: &mut Resolver<'_>, actor: CombatantId, target: CombatantId) {
    let expires_turn = r.state.turn + r.config.mark_duration;
    r.state.marks.retain(|m| m.target != target);
    r.state.marks.push_back(Mark {
        target,
        placed_by: actor,
        expires_turn,
    });
    r.emit(CombatEvent::TargetMarked {
        actor,
        target,
        expires_turn,
    });
}
