//! Combatant records.
//!
//! A `Combatant` is a plain value stored inside `CombatState`. The reducer
//! edits combatants only on its private working copy of the state.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::entity::{CombatantId, Controller, Side};
use crate::battlefield::SlotRef;
use crate::equipment::{BuffKind, ItemId, WeaponId};
use crate::stats::{clamp_level, derive_stats, StatBlock};

/// Status flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusFlags {
    /// Defense bonus active until the combatant's next turn.
    pub defending: bool,
    /// A reaction shot is reserved.
    pub overwatching: bool,
    /// The next ranged attack is aimed.
    pub aimed_shot_ready: bool,
    /// At 0 HP, recoverable.
    pub knocked_out: bool,
    /// At 0 HP, permanent.
    pub dead: bool,
    /// Left the battlefield.
    pub fled: bool,
}

/// A timed stat modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Buff {
    /// Which stat it modifies.
    pub kind: BuffKind,
    /// Bonus amount.
    pub amount: u32,
    /// Owner turn-ends left before it expires.
    pub turns_remaining: u32,
}

/// Carried consumables of one kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item definition.
    pub item: ItemId,
    /// Uses left.
    pub charges: u32,
}

/// One participant in an encounter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Combatant {
    /// Unique identifier.
    pub id: CombatantId,
    /// Display name.
    pub name: String,
    /// Decision source.
    pub controller: Controller,
    /// Level, clamped to the stat model's range.
    pub level: u32,
    /// Stats derived from `level`.
    pub stats: StatBlock,
    /// Current hit points.
    pub hp: u32,
    /// Equipped weapon.
    pub weapon: WeaponId,
    /// Where the combatant stands. `None` once down or fled.
    pub slot: Option<SlotRef>,
    /// Action points left this turn.
    pub ap_remaining: u8,
    /// Status flags.
    pub status: StatusFlags,
    /// The ally this combatant is guarding.
    pub guarding: Option<CombatantId>,
    /// The defender guarding this combatant.
    pub guarded_by: Option<CombatantId>,
    /// Active timed buffs.
    pub buffs: SmallVec<[Buff; 2]>,
    /// Carried consumables.
    pub items: SmallVec<[ItemStack; 2]>,
    /// Light weapon attacks made this turn.
    pub light_attacks_this_turn: u8,
}

impl Combatant {
    /// Create a combatant at full health with stats derived from `level`.
    pub fn new(
        id: CombatantId,
        name: impl Into<String>,
        controller: Controller,
        level: u32,
        weapon: WeaponId,
    ) -> Self {
        let level = clamp_level(level);
        let stats = derive_stats(level);
        Self {
            id,
            name: name.into(),
            controller,
            level,
            stats,
            hp: stats.max_hp,
            weapon,
            slot: None,
            ap_remaining: 0,
            status: StatusFlags::default(),
            guarding: None,
            guarded_by: None,
            buffs: SmallVec::new(),
            items: SmallVec::new(),
            light_attacks_this_turn: 0,
        }
    }

    /// The side this combatant fights for.
    #[must_use]
    pub fn side(&self) -> Side {
        self.controller.side()
    }

    /// Knocked out, dead, or fled.
    #[must_use]
    pub fn is_down(&self) -> bool {
        self.status.knocked_out || self.status.dead || self.status.fled
    }

    /// Still in the fight.
    #[must_use]
    pub fn is_standing(&self) -> bool {
        !self.is_down()
    }

    /// Sum of active buffs of one kind.
    #[must_use]
    pub fn buff_total(&self, kind: BuffKind) -> u32 {
        self.buffs.iter().filter(|b| b.kind == kind).map(|b| b.amount).sum()
    }

    /// Charges left of an item.
    #[must_use]
    pub fn charges(&self, item: ItemId) -> u32 {
        self.items.iter().filter(|s| s.item == item).map(|s| s.charges).sum()
    }

    /// Consume one charge of an item. Empty stacks are dropped.
    ///
    /// Returns `false` if no charge was available.
    pub fn consume_charge(&mut self, item: ItemId) -> bool {
        let Some(pos) = self.items.iter().position(|s| s.item == item && s.charges > 0) else {
            return false;
        };
        self.items[pos].charges -= 1;
        if self.items[pos].charges == 0 {
            self.items.remove(pos);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Combatant {
        Combatant::new(CombatantId(1), "Aria", Controller::Player, 10, WeaponId::UNARMED)
    }

    #[test]
    fn test_new_derives_stats() {
        let c = sample();
        assert_eq!(c.stats, derive_stats(10));
        assert_eq!(c.hp, c.stats.max_hp);
        assert_eq!(c.side(), Side::Friendly);
        assert!(c.is_standing());
        assert!(c.slot.is_none());
    }

    #[test]
    fn test_level_clamped() {
        let c = Combatant::new(CombatantId(1), "Boss", Controller::Enemy, 99, WeaponId::UNARMED);
        assert_eq!(c.level, 60);
    }

    #[test]
    fn test_down_states() {
        let mut c = sample();
        c.status.knocked_out = true;
        assert!(c.is_down());

        let mut c = sample();
        c.status.fled = true;
        assert!(c.is_down());
    }

    #[test]
    fn test_buff_total() {
        let mut c = sample();
        c.buffs.push(Buff { kind: BuffKind::Attack, amount: 2, turns_remaining: 1 });
        c.buffs.push(Buff { kind: BuffKind::Attack, amount: 1, turns_remaining: 3 });
        c.buffs.push(Buff { kind: BuffKind::Defense, amount: 4, turns_remaining: 1 });

        assert_eq!(c.buff_total(BuffKind::Attack), 3);
        assert_eq!(c.buff_total(BuffKind::Defense), 4);
        assert_eq!(c.buff_total(BuffKind::Damage), 0);
    }

    #[test]
    fn test_consume_charge() {
        let mut c = sample();
        c.items.push(ItemStack { item: ItemId(1), charges: 2 });

        assert!(c.consume_charge(ItemId(1)));
        assert_eq!(c.charges(ItemId(1)), 1);
        assert!(c.consume_charge(ItemId(1)));
        assert!(c.items.is_empty());
        assert!(!c.consume_charge(ItemId(1)));
    }
}
