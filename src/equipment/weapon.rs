//! Weapon definitions.

use serde::{Deserialize, Serialize};

/// Weapon identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeaponId(pub u32);

impl WeaponId {
    /// Bare hands. Every armory carries it.
    pub const UNARMED: WeaponId = WeaponId(0);

    /// Create a new weapon ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for WeaponId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Weapon({})", self.0)
    }
}

/// How a weapon reaches its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponClass {
    /// Adjacent opposing tiles only.
    Melee,
    /// A single target within range.
    Ranged,
    /// A blast centred on a tile within range.
    Area,
}

/// Weight class. Light weapons are limited per turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeaponWeight {
    /// Fast weapons, capped attacks per turn.
    Light,
    /// No special rules.
    #[default]
    Standard,
    /// Usually costs more AP.
    Heavy,
}

/// Shape of an area-of-effect blast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlastPattern {
    /// Every tile within one step, diagonals included (3×3).
    Radius,
    /// Centre plus the four orthogonal neighbours.
    Cross,
}

/// An immutable weapon definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponDef {
    /// Unique identifier.
    pub id: WeaponId,
    /// Display name.
    pub name: String,
    /// Reach class.
    pub class: WeaponClass,
    /// Weight class.
    pub weight: WeaponWeight,
    /// AP spent per attack.
    pub ap_cost: u8,
    /// Minimum Chebyshev distance (ranged/area).
    pub min_range: u32,
    /// Maximum Chebyshev distance (ranged/area).
    pub max_range: u32,
    /// Flat damage added to the wielder's base damage.
    pub damage_bonus: u32,
    /// Percentage of the target's armor ignored.
    pub armor_penetration_pct: u32,
    /// A killing blow grants one free attack on an adjacent enemy.
    pub cleave: bool,
    /// Fires over obstacles.
    pub los_exempt: bool,
    /// Blast shape for area weapons.
    pub blast: Option<BlastPattern>,
    /// Percentage of damage applied to allies caught in the blast.
    pub friendly_fire_pct: u32,
}

impl WeaponDef {
    /// A one-AP melee weapon with no special properties.
    pub fn melee(id: WeaponId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            class: WeaponClass::Melee,
            weight: WeaponWeight::Standard,
            ap_cost: 1,
            min_range: 1,
            max_range: 1,
            damage_bonus: 0,
            armor_penetration_pct: 0,
            cleave: false,
            los_exempt: false,
            blast: None,
            friendly_fire_pct: 0,
        }
    }

    /// A one-AP ranged weapon.
    pub fn ranged(id: WeaponId, name: impl Into<String>, min_range: u32, max_range: u32) -> Self {
        Self {
            class: WeaponClass::Ranged,
            min_range,
            max_range,
            ..Self::melee(id, name)
        }
    }

    /// A two-AP area weapon.
    pub fn area(
        id: WeaponId,
        name: impl Into<String>,
        max_range: u32,
        blast: BlastPattern,
        friendly_fire_pct: u32,
    ) -> Self {
        Self {
            class: WeaponClass::Area,
            ap_cost: 2,
            min_range: 1,
            max_range,
            blast: Some(blast),
            friendly_fire_pct,
            ..Self::melee(id, name)
        }
    }

    /// Bare hands.
    #[must_use]
    pub fn unarmed() -> Self {
        Self::melee(WeaponId::UNARMED, "Unarmed")
    }

    /// Set the weight class (builder pattern).
    #[must_use]
    pub fn with_weight(mut self, weight: WeaponWeight) -> Self {
        self.weight = weight;
        self
    }

    /// Set the AP cost (builder pattern).
    #[must_use]
    pub fn with_ap_cost(mut self, ap_cost: u8) -> Self {
        self.ap_cost = ap_cost;
        self
    }

    /// Set the damage bonus (builder pattern).
    #[must_use]
    pub fn with_damage_bonus(mut self, bonus: u32) -> Self {
        self.damage_bonus = bonus;
        self
    }

    /// Set the armor penetration (builder pattern).
    #[must_use]
    pub fn with_armor_penetration(mut self, pct: u32) -> Self {
        self.armor_penetration_pct = pct.min(100);
        self
    }

    /// Enable cleave (builder pattern).
    #[must_use]
    pub fn with_cleave(mut self) -> Self {
        self.cleave = true;
        self
    }

    /// Ignore line of sight (builder pattern).
    #[must_use]
    pub fn los_exempt(mut self) -> Self {
        self.los_exempt = true;
        self
    }

    /// Whether this weapon benefits from aimed shots and marks.
    #[must_use]
    pub fn is_ranged(&self) -> bool {
        matches!(self.class, WeaponClass::Ranged | WeaponClass::Area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_melee_defaults() {
        let sword = WeaponDef::melee(WeaponId(1), "Sword");
        assert_eq!(sword.class, WeaponClass::Melee);
        assert_eq!(sword.ap_cost, 1);
        assert!(!sword.is_ranged());
        assert!(sword.blast.is_none());
    }

    #[test]
    fn test_area_defaults() {
        let grenade = WeaponDef::area(WeaponId(2), "Grenade", 3, BlastPattern::Cross, 50);
        assert_eq!(grenade.class, WeaponClass::Area);
        assert_eq!(grenade.ap_cost, 2);
        assert_eq!(grenade.blast, Some(BlastPattern::Cross));
        assert_eq!(grenade.friendly_fire_pct, 50);
        assert!(grenade.is_ranged());
    }

    #[test]
    fn test_builder() {
        let axe = WeaponDef::melee(WeaponId(3), "Axe")
            .with_weight(WeaponWeight::Heavy)
            .with_ap_cost(2)
            .with_damage_bonus(3)
            .with_armor_penetration(150)
            .with_cleave();

        assert_eq!(axe.weight, WeaponWeight::Heavy);
        assert_eq!(axe.ap_cost, 2);
        assert_eq!(axe.damage_bonus, 3);
        assert_eq!(axe.armor_penetration_pct, 100);
        assert!(axe.cleave);
    }
}
