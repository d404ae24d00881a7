//! Armory: registry of weapon and item definitions.

use rustc_hash::FxHashMap;

use super::item::{ItemDef, ItemId};
use super::weapon::{WeaponDef, WeaponId};

/// Registry of equipment definitions.
///
/// Always contains [`WeaponId::UNARMED`].
///
/// ## Example
///
/// ```
/// use grid_tactics::equipment::{Armory, WeaponDef, WeaponId};
///
/// let mut armory = Armory::new();
/// armory.register_weapon(WeaponDef::ranged(WeaponId::new(1), "Bow", 1, 4));
///
/// assert_eq!(armory.weapon(WeaponId::new(1)).name, "Bow");
/// assert_eq!(armory.weapon(WeaponId::new(99)).id, WeaponId::UNARMED);
/// ```
#[derive(Clone, Debug)]
pub struct Armory {
    unarmed: WeaponDef,
    weapons: FxHashMap<WeaponId, WeaponDef>,
    items: FxHashMap<ItemId, ItemDef>,
}

impl Default for Armory {
    fn default() -> Self {
        Self {
            unarmed: WeaponDef::unarmed(),
            weapons: FxHashMap::default(),
            items: FxHashMap::default(),
        }
    }
}

impl Armory {
    /// Create an armory holding only the unarmed weapon.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a weapon definition.
    ///
    /// Registering [`WeaponId::UNARMED`] replaces the bare-hands profile.
    /// Panics if any other weapon with the same ID already exists.
    pub fn register_weapon(&mut self, weapon: WeaponDef) {
        if weapon.id == WeaponId::UNARMED {
            self.unarmed = weapon;
            return;
        }
        if self.weapons.contains_key(&weapon.id) {
            panic!("Weapon with ID {:?} already registered", weapon.id);
        }
        self.weapons.insert(weapon.id, weapon);
    }

    /// Register an item definition.
    ///
    /// Panics if an item with the same ID already exists.
    pub fn register_item(&mut self, item: ItemDef) {
        if self.items.contains_key(&item.id) {
            panic!("Item with ID {:?} already registered", item.id);
        }
        self.items.insert(item.id, item);
    }

    /// Add a weapon (builder pattern).
    #[must_use]
    pub fn with_weapon(mut self, weapon: WeaponDef) -> Self {
        self.register_weapon(weapon);
        self
    }

    /// Add an item (builder pattern).
    #[must_use]
    pub fn with_item(mut self, item: ItemDef) -> Self {
        self.register_item(item);
        self
    }

    /// Look up a weapon, falling back to unarmed for unknown ids.
    #[must_use]
    pub fn weapon(&self, id: WeaponId) -> &WeaponDef {
        self.weapons.get(&id).unwrap_or(&self.unarmed)
    }

    /// Check if a weapon is registered.
    #[must_use]
    pub fn has_weapon(&self, id: WeaponId) -> bool {
        id == WeaponId::UNARMED || self.weapons.contains_key(&id)
    }

    /// Look up an item.
    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&ItemDef> {
        self.items.get(&id)
    }

    /// Number of registered weapons (unarmed included).
    #[must_use]
    pub fn weapon_count(&self) -> usize {
        self.weapons.len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equipment::{BuffKind, ItemEffect};

    #[test]
    fn test_new_has_unarmed() {
        let armory = Armory::new();
        assert!(armory.has_weapon(WeaponId::UNARMED));
        assert_eq!(armory.weapon_count(), 1);
    }

    #[test]
    fn test_register_and_lookup() {
        let armory = Armory::new()
            .with_weapon(WeaponDef::melee(WeaponId(1), "Sword"))
            .with_item(ItemDef::new(
                ItemId(1),
                "Tonic",
                ItemEffect::Buff { kind: BuffKind::Attack, amount: 2, turns: 2 },
            ));

        assert_eq!(armory.weapon(WeaponId(1)).name, "Sword");
        assert_eq!(armory.item(ItemId(1)).map(|i| i.name.as_str()), Some("Tonic"));
        assert!(armory.item(ItemId(2)).is_none());
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_weapon_panics() {
        let mut armory = Armory::new();
        armory.register_weapon(WeaponDef::melee(WeaponId(1), "Sword"));
        armory.register_weapon(WeaponDef::melee(WeaponId(1), "Other"));
    }
}
