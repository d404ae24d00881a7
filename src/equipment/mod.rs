//! Weapon and consumable definitions.
//!
//! Definitions are opaque, immutable data supplied by the equipment
//! provider. The reducer reads them through the [`Armory`] and never
//! mutates them; per-combatant state (item charges) lives on the
//! combatant instead.

mod item;
mod registry;
mod weapon;

pub use item::{BuffKind, ItemDef, ItemEffect, ItemId};
pub use registry::Armory;
pub use weapon::{BlastPattern, WeaponClass, WeaponDef, WeaponId, WeaponWeight};
