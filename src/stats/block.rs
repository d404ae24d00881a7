//! The `StatBlock` and its derivation formulas.

use serde::{Deserialize, Serialize};

/// Lowest level a combatant can have.
pub const MIN_LEVEL: u32 = 1;

/// Highest level a combatant can have.
pub const MAX_LEVEL: u32 = 60;

/// Combat stats derived from a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatBlock {
    /// Maximum hit points.
    pub max_hp: u32,
    /// Base damage of a hit before quality and armor.
    pub damage: u32,
    /// Value an attack must meet to hit.
    pub defense: u32,
    /// Initiative ordering key.
    pub speed: u32,
    /// Flat damage reduction.
    pub armor: u32,
}

/// Clamp a level into `[MIN_LEVEL, MAX_LEVEL]`.
#[must_use]
pub const fn clamp_level(level: u32) -> u32 {
    if level < MIN_LEVEL {
        MIN_LEVEL
    } else if level > MAX_LEVEL {
        MAX_LEVEL
    } else {
        level
    }
}

/// Derive the stat block for a level.
///
/// ```
/// use grid_tactics::stats::derive_stats;
///
/// let stats = derive_stats(1);
/// assert_eq!(stats.max_hp, 25);
/// assert_eq!(stats.damage, 2);
/// assert_eq!(stats.defense, 5);
/// assert_eq!(stats.speed, 3);
/// assert_eq!(stats.armor, 0);
/// ```
#[must_use]
pub const fn derive_stats(level: u32) -> StatBlock {
    let level = clamp_level(level);
    StatBlock {
        max_hp: 20 + 5 * level,
        damage: 2 + level / 2,
        defense: 5 + level / 3,
        speed: 3 + level / 10,
        armor: level / 15,
    }
}

/// Accuracy term added to every attack roll.
///
/// Grows at the same rate as defense so equal-level fights stay even.
#[must_use]
pub const fn attack_bonus(level: u32) -> u32 {
    clamp_level(level) / 3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_one() {
        let stats = derive_stats(1);
        assert_eq!(
            stats,
            StatBlock { max_hp: 25, damage: 2, defense: 5, speed: 3, armor: 0 }
        );
    }

    #[test]
    fn test_level_sixty() {
        let stats = derive_stats(60);
        assert_eq!(
            stats,
            StatBlock { max_hp: 320, damage: 32, defense: 25, speed: 9, armor: 4 }
        );
    }

    #[test]
    fn test_clamping() {
        assert_eq!(derive_stats(0), derive_stats(1));
        assert_eq!(derive_stats(61), derive_stats(60));
        assert_eq!(derive_stats(u32::MAX), derive_stats(60));
    }

    #[test]
    fn test_golden_values() {
        // (level, max_hp, damage, defense, speed, armor)
        let golden = [
            (2, 30, 3, 5, 3, 0),
            (3, 35, 3, 6, 3, 0),
            (10, 70, 7, 8, 4, 0),
            (15, 95, 9, 10, 4, 1),
            (29, 165, 16, 14, 5, 1),
            (30, 170, 17, 15, 6, 2),
            (45, 245, 24, 20, 7, 3),
        ];
        for (level, hp, dmg, def, spd, arm) in golden {
            let s = derive_stats(level);
            assert_eq!(
                (s.max_hp, s.damage, s.defense, s.speed, s.armor),
                (hp, dmg, def, spd, arm),
                "level {level}"
            );
        }
    }

    #[test]
    fn test_monotonic() {
        for level in MIN_LEVEL..MAX_LEVEL {
            let a = derive_stats(level);
            let b = derive_stats(level + 1);
            assert!(b.max_hp >= a.max_hp);
            assert!(b.damage >= a.damage);
            assert!(b.defense >= a.defense);
            assert!(b.speed >= a.speed);
            assert!(b.armor >= a.armor);
        }
    }

    #[test]
    fn test_attack_bonus() {
        assert_eq!(attack_bonus(1), 0);
        assert_eq!(attack_bonus(3), 1);
        assert_eq!(attack_bonus(60), 20);
        assert_eq!(attack_bonus(100), 20);
    }
}
