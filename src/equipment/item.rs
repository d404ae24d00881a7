//! Consumable item definitions.

use serde::{Deserialize, Serialize};

/// Item identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u32);

impl ItemId {
    /// Create a new item ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Item({})", self.0)
    }
}

/// Stat a timed buff modifies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuffKind {
    /// Added to attack rolls.
    Attack,
    /// Added to raw damage.
    Damage,
    /// Added to defense.
    Defense,
}

/// What using an item does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemEffect {
    /// Restore `max(max_hp * pct / 100, min)` HP, capped at max HP.
    Heal { pct: u32, min: u32 },
    /// Apply a buff for a number of the recipient's turns.
    Buff { kind: BuffKind, amount: u32, turns: u32 },
}

/// An immutable item definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDef {
    /// Unique identifier.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// AP spent per use.
    pub ap_cost: u8,
    /// Effect on the recipient.
    pub effect: ItemEffect,
}

impl ItemDef {
    /// Create a one-AP item.
    pub fn new(id: ItemId, name: impl Into<String>, effect: ItemEffect) -> Self {
        Self {
            id,
            name: name.into(),
            ap_cost: 1,
            effect,
        }
    }

    /// Set the AP cost (builder pattern).
    #[must_use]
    pub fn with_ap_cost(mut self, ap_cost: u8) -> Self {
        self.ap_cost = ap_cost;
        self
    }
}
