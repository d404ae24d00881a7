//! Consumable use.

use super::attack::trigger_overwatch;
use super::context::Resolver;
use crate::core::{Buff, CombatantId};
use crate::equipment::{ItemEffect, ItemId};
use crate::events::CombatEvent;

pub(super) fn resolve_use_item(
    r: &mut Resolver<'_>,
    actor: CombatantId,
    item: ItemId,
    target: Option<CombatantId>,
) {
    let armory = r.armory;
    let Some(def) = armory.item(item) else {
        return;
    };
    let recipient = target.unwrap_or(actor);
    let mut consumed = false;
    r.update(actor, |c| consumed = c.consume_charge(item));
    if !consumed {
        return;
    }

    let (healed, buff) = match def.effect {
        ItemEffect::Heal { pct, min } => {
            let c = r.get(recipient);
            let amount = (c.stats.max_hp * pct / 100).max(min);
            let healed = amount.min(c.stats.max_hp.saturating_sub(c.hp));
            r.update(recipient, |c| c.hp += healed);
            (healed, None)
        }
        ItemEffect::Buff { kind, amount, turns } => {
            r.update(recipient, |c| {
                c.buffs.push(Buff {
                    kind,
                    amount,
                    turns_remaining: turns,
                });
            });
            (0, Some(kind))
        }
    };

    r.emit(CombatEvent::ItemUsed {
        actor,
        target: recipient,
        item,
        healed,
        buff,
    });
    trigger_overwatch(r, actor);
}
