//! Slot storage and occupancy.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{CombatantId, Side};
use crate::error::InvariantViolation;

/// A slot on the battlefield: a row plus a column index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotRef {
    /// Row.
    pub side: Side,
    /// Column.
    pub index: u8,
}

impl SlotRef {
    /// Create a slot reference.
    #[must_use]
    pub const fn new(side: Side, index: u8) -> Self {
        Self { side, index }
    }

    /// Grid column.
    #[must_use]
    pub const fn x(self) -> i32 {
        self.index as i32
    }

    /// Grid row.
    #[must_use]
    pub const fn y(self) -> i32 {
        self.side.row_y()
    }

    /// Absolute column difference.
    #[must_use]
    pub const fn column_distance(self, other: SlotRef) -> u32 {
        (self.x() - other.x()).unsigned_abs()
    }

    /// Chebyshev distance.
    #[must_use]
    pub const fn distance(self, other: SlotRef) -> u32 {
        let dx = (self.x() - other.x()).unsigned_abs();
        let dy = (self.y() - other.y()).unsigned_abs();
        if dx > dy { dx } else { dy }
    }
}

impl std::fmt::Display for SlotRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.side, self.index)
    }
}

/// Two facing rows of equally many slots.
///
/// Each slot holds at most one combatant, and a combatant appears in at most
/// one slot. Mutators keep the second property by construction: `place`
/// refuses occupied slots and ids already on the field.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Battlefield {
    width: u8,
    hostile: Vec<Option<CombatantId>>,
    friendly: Vec<Option<CombatantId>>,
}

impl Battlefield {
    /// Create an empty battlefield.
    #[must_use]
    pub fn new(width: u8) -> Self {
        let width = width.max(1);
        Self {
            width,
            hostile: vec![None; width as usize],
            friendly: vec![None; width as usize],
        }
    }

    /// Slots per row.
    #[must_use]
    pub fn width(&self) -> u8 {
        self.width
    }

    /// The slots of one row.
    #[must_use]
    pub fn row(&self, side: Side) -> &[Option<CombatantId>] {
        match side {
            Side::Hostile => &self.hostile,
            Side::Friendly => &self.friendly,
        }
    }

    fn row_mut(&mut self, side: Side) -> &mut Vec<Option<CombatantId>> {
        match side {
            Side::Hostile => &mut self.hostile,
            Side::Friendly => &mut self.friendly,
        }
    }

    /// Whether the slot exists.
    #[must_use]
    pub fn contains(&self, slot: SlotRef) -> bool {
        slot.index < self.width
    }

    /// The combatant in a slot, if any.
    #[must_use]
    pub fn occupant(&self, slot: SlotRef) -> Option<CombatantId> {
        self.row(slot.side).get(slot.index as usize).copied().flatten()
    }

    /// Whether a slot exists and is empty.
    #[must_use]
    pub fn is_free(&self, slot: SlotRef) -> bool {
        self.contains(slot) && self.occupant(slot).is_none()
    }

    /// Find the slot holding a combatant.
    #[must_use]
    pub fn slot_of(&self, id: CombatantId) -> Option<SlotRef> {
        self.occupied().find(|&(_, occupant)| occupant == id).map(|(slot, _)| slot)
    }

    /// Iterate occupied slots, hostile row first, by column.
    pub fn occupied(&self) -> impl Iterator<Item = (SlotRef, CombatantId)> + '_ {
        let hostile = self
            .hostile
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.map(|id| (SlotRef::new(Side::Hostile, i as u8), id)));
        let friendly = self
            .friendly
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.map(|id| (SlotRef::new(Side::Friendly, i as u8), id)));
        hostile.chain(friendly)
    }

    /// Empty slots of one row, by column.
    pub fn free_slots(&self, side: Side) -> impl Iterator<Item = SlotRef> + '_ {
        self.row(side)
            .iter()
            .enumerate()
            .filter(|(_, o)| o.is_none())
            .map(move |(i, _)| SlotRef::new(side, i as u8))
    }

    /// Put a combatant into an empty slot.
    ///
    /// Returns `false` (and changes nothing) if the slot is missing or
    /// occupied, or the combatant already stands elsewhere.
    pub fn place(&mut self, id: CombatantId, slot: SlotRef) -> bool {
        if !self.is_free(slot) || self.slot_of(id).is_some() {
            return false;
        }
        self.row_mut(slot.side)[slot.index as usize] = Some(id);
        true
    }

    /// Remove a combatant from the field, returning the slot it held.
    pub fn remove(&mut self, id: CombatantId) -> Option<SlotRef> {
        let slot = self.slot_of(id)?;
        self.row_mut(slot.side)[slot.index as usize] = None;
        Some(slot)
    }

    /// Relocate a combatant to an empty slot.
    pub fn relocate(&mut self, id: CombatantId, to: SlotRef) -> bool {
        if !self.is_free(to) {
            return false;
        }
        match self.remove(id) {
            Some(_) => self.place(id, to),
            None => false,
        }
    }

    /// Exchange the contents of two slots in the same row.
    pub fn swap(&mut self, a: SlotRef, b: SlotRef) -> bool {
        if a.side != b.side || !self.contains(a) || !self.contains(b) {
            return false;
        }
        self.row_mut(a.side).swap(a.index as usize, b.index as usize);
        true
    }

    /// Verify that both rows hold exactly `width` slots.
    ///
    /// Rows built through `new` always do; a hand-edited or tampered
    /// snapshot may not, and indexing a short row would panic.
    pub fn check_shape(&self) -> Result<(), InvariantViolation> {
        for side in [Side::Hostile, Side::Friendly] {
            let len = self.row(side).len();
            if len != self.width as usize {
                return Err(InvariantViolation::MalformedRow {
                    side,
                    expected: self.width,
                    actual: len,
                });
            }
        }
        Ok(())
    }

    /// Verify that no combatant occupies two slots.
    pub fn check_unique(&self) -> Result<(), InvariantViolation> {
        let mut seen: FxHashMap<CombatantId, SlotRef> = FxHashMap::default();
        for (slot, id) in self.occupied() {
            if let Some(&first) = seen.get(&id) {
                return Err(InvariantViolation::DuplicateOccupancy {
                    id,
                    first,
                    second: slot,
                });
            }
            seen.insert(id, slot);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(i: u8) -> SlotRef {
        SlotRef::new(Side::Hostile, i)
    }

    fn f(i: u8) -> SlotRef {
        SlotRef::new(Side::Friendly, i)
    }

    #[test]
    fn test_distance() {
        assert_eq!(f(2).distance(h(2)), 1);
        assert_eq!(f(0).distance(h(3)), 3);
        assert_eq!(f(0).distance(f(4)), 4);
        assert_eq!(f(1).column_distance(h(3)), 2);
    }

    #[test]
    fn test_place_and_remove() {
        let mut field = Battlefield::new(4);
        assert!(field.place(CombatantId(1), f(0)));
        assert!(!field.place(CombatantId(2), f(0)), "occupied");
        assert!(!field.place(CombatantId(1), f(1)), "already on field");
        assert!(!field.place(CombatantId(3), f(9)), "out of bounds");

        assert_eq!(field.slot_of(CombatantId(1)), Some(f(0)));
        assert_eq!(field.remove(CombatantId(1)), Some(f(0)));
        assert!(field.is_free(f(0)));
        assert_eq!(field.remove(CombatantId(1)), None);
    }

    #[test]
    fn test_relocate_and_swap() {
        let mut field = Battlefield::new(4);
        field.place(CombatantId(1), f(0));
        field.place(CombatantId(2), f(1));

        assert!(!field.relocate(CombatantId(1), f(1)));
        assert!(field.relocate(CombatantId(1), f(3)));
        assert_eq!(field.slot_of(CombatantId(1)), Some(f(3)));

        assert!(field.swap(f(1), f(3)));
        assert_eq!(field.occupant(f(1)), Some(CombatantId(1)));
        assert_eq!(field.occupant(f(3)), Some(CombatantId(2)));
        assert!(!field.swap(f(1), h(1)));
    }

    #[test]
    fn test_occupied_order() {
        let mut field = Battlefield::new(3);
        field.place(CombatantId(5), f(2));
        field.place(CombatantId(7), h(1));
        field.place(CombatantId(6), f(0));

        let order: Vec<_> = field.occupied().map(|(_, id)| id).collect();
        assert_eq!(order, vec![CombatantId(7), CombatantId(6), CombatantId(5)]);

        let free: Vec<_> = field.free_slots(Side::Friendly).collect();
        assert_eq!(free, vec![f(1)]);
    }

    #[test]
    fn test_check_shape() {
        assert!(Battlefield::new(4).check_shape().is_ok());

        let short = Battlefield {
            width: 5,
            hostile: vec![None; 5],
            friendly: vec![Some(CombatantId(0)), None],
        };
        assert_eq!(
            short.check_shape(),
            Err(InvariantViolation::MalformedRow {
                side: Side::Friendly,
                expected: 5,
                actual: 2,
            })
        );
    }

    #[test]
    fn test_check_unique() {
        let field = Battlefield::new(3);
        assert!(field.check_unique().is_ok());

        let corrupted = Battlefield {
            width: 2,
            hostile: vec![Some(CombatantId(1)), None],
            friendly: vec![None, Some(CombatantId(1))],
        };
        assert!(matches!(
            corrupted.check_unique(),
            Err(InvariantViolation::DuplicateOccupancy { .. })
        ));
    }
}
