//! Flee checks.

use super::context::Resolver;
use crate::core::CombatantId;
use crate::events::CombatEvent;

/// `d20 + speed / 2` against the flee difficulty.
///
/// Success takes the actor off the battlefield. Failure changes nothing
/// beyond the spent turn.
pub(super) fn resolve_flee(r: &mut Resolver<'_>, actor: CombatantId) {
    let speed = r.get(actor).stats.speed;
    let roll = r.d20();
    let total = roll + speed / 2;
    let dc = r.config.flee_dc;
    let success = total >= dc;

    tracing::debug!("{} flee attempt: {} vs {}", actor, total, dc);
    r.emit(CombatEvent::FleeAttempted {
        actor,
        roll,
        total,
        dc,
        success,
    });

    if success {
        r.update(actor, |c| c.status.fled = true);
        r.withdraw(actor);
    }
}
