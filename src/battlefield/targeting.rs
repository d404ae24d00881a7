//! Reach, line of sight, blast patterns and target sets.
//!
//! Geometry helpers take a `Battlefield` and a `WeaponDef`; the target set
//! helpers read the whole `CombatState` because they also need combatant
//! status.

use super::grid::{Battlefield, SlotRef};
use crate::core::{CombatState, CombatantId, Side};
use crate::equipment::{Armory, BlastPattern, WeaponClass, WeaponDef};

/// Check line of sight between two tiles.
///
/// The segment between tile centres is sampled at half-tile steps
/// (`2 × distance` intervals). Each sample is rounded to a tile; samples
/// falling exactly on a tile boundary on either axis are skipped, as are
/// the shooter's and the target's own tiles. Any occupied tile left on the
/// line blocks the shot.
#[must_use]
pub fn has_line_of_sight(field: &Battlefield, from: SlotRef, to: SlotRef) -> bool {
    let dx = to.x() - from.x();
    let dy = to.y() - from.y();
    let steps = 2 * dx.abs().max(dy.abs());

    for i in 1..steps {
        let (Some(x), Some(y)) = (
            round_sample(from.x(), dx, i, steps),
            round_sample(from.y(), dy, i, steps),
        ) else {
            continue;
        };
        let Some(side) = side_at(y) else {
            continue;
        };
        let Ok(index) = u8::try_from(x) else {
            continue;
        };
        let tile = SlotRef::new(side, index);
        if tile == from || tile == to {
            continue;
        }
        if field.occupant(tile).is_some() {
            return false;
        }
    }

    true
}

/// Round `origin + delta × i / steps` to the nearest integer in exact
/// rational arithmetic. `None` when the sample sits on a half boundary.
fn round_sample(origin: i32, delta: i32, i: i32, steps: i32) -> Option<i32> {
    let num = origin * steps + delta * i;
    let floor = num.div_euclid(steps);
    let rem = num.rem_euclid(steps);
    match (2 * rem).cmp(&steps) {
        std::cmp::Ordering::Less => Some(floor),
        std::cmp::Ordering::Greater => Some(floor + 1),
        std::cmp::Ordering::Equal => None,
    }
}

fn side_at(y: i32) -> Option<Side> {
    if y == Side::Hostile.row_y() {
        Some(Side::Hostile)
    } else if y == Side::Friendly.row_y() {
        Some(Side::Friendly)
    } else {
        None
    }
}

/// Whether a weapon held at `from` can strike the tile `to`.
///
/// Melee reaches the opposing row within one column. Ranged and area
/// weapons need the Chebyshev distance inside `[min_range, max_range]` and,
/// unless exempt, line of sight.
#[must_use]
pub fn can_reach(field: &Battlefield, weapon: &WeaponDef, from: SlotRef, to: SlotRef) -> bool {
    if !field.contains(to) || from == to {
        return false;
    }
    match weapon.class {
        WeaponClass::Melee => to.side != from.side && from.column_distance(to) <= 1,
        WeaponClass::Ranged | WeaponClass::Area => {
            let distance = from.distance(to);
            if distance < weapon.min_range || distance > weapon.max_range {
                return false;
            }
            weapon.los_exempt || has_line_of_sight(field, from, to)
        }
    }
}

/// Tiles covered by a blast centred on `center`, in slot order.
#[must_use]
pub fn blast_tiles(field: &Battlefield, center: SlotRef, pattern: BlastPattern) -> Vec<SlotRef> {
    let mut tiles: Vec<SlotRef> = Vec::new();
    for side in [Side::Hostile, Side::Friendly] {
        for index in 0..field.width() {
            let tile = SlotRef::new(side, index);
            let dx = tile.column_distance(center);
            let same_row = tile.side == center.side;
            let covered = match pattern {
                BlastPattern::Radius => dx <= 1,
                BlastPattern::Cross => (same_row && dx <= 1) || dx == 0,
            };
            if covered {
                tiles.push(tile);
            }
        }
    }
    tiles
}

/// Whether an area weapon at `from` may centre its blast on `center`.
#[must_use]
pub fn is_valid_blast_center(
    field: &Battlefield,
    weapon: &WeaponDef,
    from: SlotRef,
    center: SlotRef,
) -> bool {
    weapon.class == WeaponClass::Area && can_reach(field, weapon, from, center)
}

/// Every legal blast centre for an area weapon at `from`.
#[must_use]
pub fn valid_blast_centers(field: &Battlefield, weapon: &WeaponDef, from: SlotRef) -> Vec<SlotRef> {
    [Side::Hostile, Side::Friendly]
        .into_iter()
        .flat_map(|side| (0..field.width()).map(move |i| SlotRef::new(side, i)))
        .filter(|&tile| is_valid_blast_center(field, weapon, from, tile))
        .collect()
}

/// Standing opponents `actor` can attack with its equipped weapon, by id.
///
/// Area weapons list the opponents whose tile is a legal blast centre.
/// Never contains the actor, downed combatants or its own side.
#[must_use]
pub fn valid_attack_targets(
    state: &CombatState,
    armory: &Armory,
    actor: CombatantId,
) -> Vec<CombatantId> {
    let Some(attacker) = state.combatant(actor).filter(|c| c.is_standing()) else {
        return Vec::new();
    };
    let Some(from) = attacker.slot else {
        return Vec::new();
    };
    let weapon = armory.weapon(attacker.weapon);
    let enemy_side = attacker.side().opponent();

    state
        .combatants
        .values()
        .filter(|c| c.id != actor && c.is_standing() && c.side() == enemy_side)
        .filter_map(|c| c.slot.map(|slot| (c.id, slot)))
        .filter(|&(_, slot)| can_reach(&state.battlefield, weapon, from, slot))
        .map(|(id, _)| id)
        .collect()
}

/// Standing opponents adjacent to `attacker` for a follow-up cleave, by id.
#[must_use]
pub fn cleave_candidates(state: &CombatState, attacker: CombatantId) -> Vec<CombatantId> {
    let Some(from) = state.combatant(attacker).and_then(|c| c.slot) else {
        return Vec::new();
    };
    let enemy_side = from.side.opponent();
    state
        .battlefield
        .occupied()
        .filter(|(slot, _)| slot.side == enemy_side && slot.column_distance(from) <= 1)
        .filter(|(_, id)| state.combatant(*id).is_some_and(|c| c.is_standing()))
        .map(|(_, id)| id)
        .collect()
}

/// Opposing-row tiles a watcher could attack from where it stands.
#[must_use]
pub fn overwatch_zone(state: &CombatState, armory: &Armory, watcher: CombatantId) -> Vec<SlotRef> {
    let Some(c) = state.combatant(watcher) else {
        return Vec::new();
    };
    let Some(from) = c.slot else {
        return Vec::new();
    };
    let weapon = armory.weapon(c.weapon);
    let enemy_side = c.side().opponent();
    (0..state.battlefield.width())
        .map(|i| SlotRef::new(enemy_side, i))
        .filter(|&tile| can_reach(&state.battlefield, weapon, from, tile))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equipment::WeaponId;

    fn h(i: u8) -> SlotRef {
        SlotRef::new(Side::Hostile, i)
    }

    fn f(i: u8) -> SlotRef {
        SlotRef::new(Side::Friendly, i)
    }

    fn bow() -> WeaponDef {
        WeaponDef::ranged(WeaponId(1), "Bow", 1, 4)
    }

    #[test]
    fn test_melee_reach() {
        let field = Battlefield::new(5);
        let sword = WeaponDef::melee(WeaponId(2), "Sword");

        assert!(can_reach(&field, &sword, f(2), h(1)));
        assert!(can_reach(&field, &sword, f(2), h(2)));
        assert!(can_reach(&field, &sword, f(2), h(3)));
        assert!(!can_reach(&field, &sword, f(2), h(4)));
        assert!(!can_reach(&field, &sword, f(2), f(3)), "own row");
    }

    #[test]
    fn test_ranged_window() {
        let field = Battlefield::new(5);
        let longbow = WeaponDef::ranged(WeaponId(3), "Longbow", 2, 3);

        assert!(!can_reach(&field, &longbow, f(0), h(0)), "inside min range");
        assert!(can_reach(&field, &longbow, f(0), h(2)));
        assert!(can_reach(&field, &longbow, f(0), h(3)));
        assert!(!can_reach(&field, &longbow, f(0), h(4)), "beyond max range");
        assert!(!can_reach(&field, &longbow, f(0), h(9)), "off the field");
    }

    #[test]
    fn test_line_blocked_by_occupant() {
        let mut field = Battlefield::new(5);
        // Straight along the hostile row: the middle tile sits on the line.
        assert!(has_line_of_sight(&field, h(0), h(2)));
        field.place(CombatantId(9), h(1));
        assert!(!has_line_of_sight(&field, h(0), h(2)));
    }

    #[test]
    fn test_line_across_rows() {
        let mut field = Battlefield::new(5);
        // f(0) -> h(3): samples land on f(1) and h(2).
        field.place(CombatantId(4), f(1));
        assert!(!has_line_of_sight(&field, f(0), h(3)));

        let mut field = Battlefield::new(5);
        field.place(CombatantId(4), h(2));
        assert!(!has_line_of_sight(&field, f(0), h(3)));

        // Adjacent diagonals never cross another tile.
        let mut field = Battlefield::new(5);
        field.place(CombatantId(4), f(1));
        field.place(CombatantId(5), h(0));
        assert!(has_line_of_sight(&field, f(0), h(1)));
    }

    #[test]
    fn test_endpoints_never_block() {
        let mut field = Battlefield::new(5);
        field.place(CombatantId(1), f(0));
        field.place(CombatantId(2), h(4));
        assert!(has_line_of_sight(&field, f(0), h(4)));
    }

    #[test]
    fn test_los_exempt_ignores_blockers() {
        let mut field = Battlefield::new(5);
        field.place(CombatantId(9), h(1));
        let mortar = bow().los_exempt();

        assert!(!can_reach(&field, &bow(), h(0), h(2)));
        assert!(can_reach(&field, &mortar, h(0), h(2)));
    }

    #[test]
    fn test_blast_radius() {
        let field = Battlefield::new(5);
        let tiles = blast_tiles(&field, h(0), BlastPattern::Radius);
        assert_eq!(tiles, vec![h(0), h(1), f(0), f(1)]);

        let tiles = blast_tiles(&field, f(2), BlastPattern::Radius);
        assert_eq!(tiles.len(), 6);
    }

    #[test]
    fn test_blast_cross() {
        let field = Battlefield::new(5);
        let tiles = blast_tiles(&field, h(2), BlastPattern::Cross);
        assert_eq!(tiles, vec![h(1), h(2), h(3), f(2)]);
    }

    #[test]
    fn test_blast_centers() {
        let field = Battlefield::new(3);
        let grenade = WeaponDef::area(WeaponId(5), "Grenade", 1, BlastPattern::Radius, 0);

        let centers = valid_blast_centers(&field, &grenade, f(0));
        assert_eq!(centers, vec![h(0), h(1), f(1)]);
        assert!(!is_valid_blast_center(&field, &bow(), f(0), h(0)), "not an area weapon");
    }
}
