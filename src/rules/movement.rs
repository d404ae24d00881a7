//! Move and swap within the actor's own row.

use super::attack::trigger_overwatch;
use super::context::Resolver;
use crate::battlefield::SlotRef;
use crate::core::CombatantId;
use crate::events::CombatEvent;

pub(super) fn resolve_move(r: &mut Resolver<'_>, actor: CombatantId, to: u8) {
    let c = r.get(actor);
    let Some(from) = c.slot else {
        return;
    };
    let to = SlotRef::new(c.side(), to);
    if !r.state.battlefield.relocate(actor, to) {
        return;
    }
    r.update(actor, |c| c.slot = Some(to));
    r.emit(CombatEvent::MoveCompleted { actor, from, to });
    trigger_overwatch(r, actor);
}

pub(super) fn resolve_swap(r: &mut Resolver<'_>, actor: CombatantId, with: u8) {
    let c = r.get(actor);
    let Some(from) = c.slot else {
        return;
    };
    let to = SlotRef::new(c.side(), with);
    let Some(other) = r.state.battlefield.occupant(to) else {
        return;
    };
    if !r.state.battlefield.swap(from, to) {
        return;
    }
    r.update(actor, |c| c.slot = Some(to));
    r.update(other, |c| c.slot = Some(from));
    r.emit(CombatEvent::SwapCompleted {
        actor,
        other,
        from,
        to,
    });
    trigger_overwatch(r, actor);
}
