//! Attack resolution: hit math, interception, cleave, blasts and overwatch.

use super::context::Resolver;
use crate::battlefield::{blast_tiles, cleave_candidates, overwatch_zone, SlotRef};
use crate::core::{AttackTarget, CleaveTieBreak, CombatantId};
use crate::equipment::{BuffKind, WeaponClass, WeaponDef, WeaponWeight};
use crate::events::{AttackKind, AttackReport, CombatEvent, HitQuality};
use crate::stats::attack_bonus;

/// Modifiers that differ between a normal attack and its derivatives.
#[derive(Clone, Copy, Debug)]
struct Strike {
    kind: AttackKind,
    /// Subtracted from the attack value.
    penalty: i32,
    /// Shared roll for blasts. `None` rolls a fresh d20.
    roll: Option<u32>,
    /// Damage percentage kept after the hit (friendly fire).
    damage_pct: Option<u32>,
}

impl Strike {
    const NORMAL: Strike = Strike {
        kind: AttackKind::Normal,
        penalty: 0,
        roll: None,
        damage_pct: None,
    };
}

/// Resolve an `Attack` action.
pub(super) fn resolve_attack(r: &mut Resolver<'_>, actor: CombatantId, target: AttackTarget) {
    let attacker = r.get(actor);
    let weapon = r.armory.weapon(attacker.weapon).clone();

    if weapon.weight == WeaponWeight::Light {
        r.update(actor, |c| c.light_attacks_this_turn += 1);
    }

    match weapon.class {
        WeaponClass::Area => {
            let center = match target {
                AttackTarget::Tile(tile) => Some(tile),
                AttackTarget::Combatant(id) => r.state.combatant(id).and_then(|c| c.slot),
            };
            if let Some(center) = center {
                resolve_blast(r, actor, &weapon, center);
            }
        }
        WeaponClass::Melee | WeaponClass::Ranged => {
            let AttackTarget::Combatant(victim) = target else {
                return;
            };
            let report = strike(r, actor, victim, &weapon, Strike::NORMAL);
            if weapon.class == WeaponClass::Melee && weapon.cleave && report.killing_blow {
                resolve_cleave(r, actor, &weapon);
            }
            if weapon.class == WeaponClass::Ranged {
                r.update(actor, |c| c.status.aimed_shot_ready = false);
            }
        }
    }

    trigger_overwatch(r, actor);
}

/// Roll (or reuse a roll), apply damage and emit the resulting events.
fn strike(
    r: &mut Resolver<'_>,
    attacker_id: CombatantId,
    target_id: CombatantId,
    weapon: &WeaponDef,
    mode: Strike,
) -> AttackReport {
    let attacker = r.get(attacker_id);
    let target = r.get(target_id);
    let config = r.config;

    let roll = match mode.roll {
        Some(roll) => roll,
        None => r.d20(),
    };

    let marked = weapon.is_ranged() && r.state.is_marked(target_id);
    let aimed = mode.kind == AttackKind::Normal
        && weapon.class == WeaponClass::Ranged
        && attacker.status.aimed_shot_ready;

    let mut attack_value = roll as i32
        + attack_bonus(attacker.level) as i32
        + attacker.buff_total(BuffKind::Attack) as i32
        - mode.penalty;
    if marked {
        attack_value += config.mark_attack_bonus;
        r.state.marks.retain(|m| m.target != target_id);
    }
    if aimed {
        attack_value += config.aimed_attack_bonus;
    }

    let mut defense = target.stats.defense as i32 + target.buff_total(BuffKind::Defense) as i32;
    if target.status.defending {
        defense += config.defend_bonus;
    }
    let margin = attack_value - defense;

    let mut quality = if margin < 0 {
        HitQuality::Miss
    } else if margin >= config.crushing_margin {
        HitQuality::Crushing
    } else if margin >= config.solid_margin {
        HitQuality::Solid
    } else {
        HitQuality::Marginal
    };

    let (raw_damage, final_damage) = if quality.is_hit() {
        let pct = match quality {
            HitQuality::Crushing => config.crushing_damage_pct,
            HitQuality::Solid => config.solid_damage_pct,
            _ => config.marginal_damage_pct,
        };
        let mut base = attacker.stats.damage
            + weapon.damage_bonus
            + attacker.buff_total(BuffKind::Damage);
        if aimed {
            base += config.aimed_damage_bonus;
        }
        let raw = (base * pct / 100).max(1);

        let armor = target.stats.armor;
        let armor = armor - armor * weapon.armor_penetration_pct.min(100) / 100;
        let mut final_damage = raw.saturating_sub(armor);
        if raw > 2 && final_damage <= 1 {
            quality = HitQuality::ArmorSoak;
        }
        if let Some(pct) = mode.damage_pct {
            final_damage = final_damage * pct / 100;
        }
        (raw, final_damage)
    } else {
        (0, 0)
    };

    // Split with a standing guard.
    let guard = target.guarded_by.filter(|&g| r.is_standing(g));
    let intercepted = match guard {
        Some(_) => final_damage * config.intercept_pct / 100,
        None => 0,
    };
    let ward_damage = final_damage - intercepted;

    let hp_before = target.hp;
    let hp_after = hp_before.saturating_sub(ward_damage);
    let killing_blow = ward_damage > 0 && hp_after == 0;
    let overkill_threshold = target.stats.max_hp * config.overkill_pct / 100;
    let overkill = (killing_blow && final_damage >= overkill_threshold)
        .then(|| ward_damage.saturating_sub(hp_before))
        .filter(|&excess| excess > 0);

    r.update(target_id, |c| c.hp = hp_after);

    let report = AttackReport {
        attacker: attacker_id,
        target: target_id,
        weapon: weapon.id,
        kind: mode.kind,
        roll,
        attack_value,
        defense,
        margin,
        raw_damage,
        final_damage,
        quality,
        killing_blow,
        overkill,
        friendly_fire: attacker.side() == target.side(),
    };
    tracing::trace!(
        "{} vs {}: roll {} value {} defense {} -> {} for {}",
        attacker_id,
        target_id,
        roll,
        attack_value,
        defense,
        quality,
        final_damage
    );
    r.emit(CombatEvent::AttackResolved(report));

    if let Some(guard) = guard.filter(|_| intercepted > 0) {
        let guard_hp = r.get(guard).hp.saturating_sub(intercepted);
        r.update(guard, |c| c.hp = guard_hp);
        r.emit(CombatEvent::DamageIntercepted {
            guard,
            ward: target_id,
            intercepted,
        });
        if guard_hp == 0 {
            r.defeat(guard, Some(attacker_id));
        }
    }

    if killing_blow {
        r.defeat(target_id, Some(attacker_id));
    }

    report
}

/// One free melee attack after a killing blow.
fn resolve_cleave(r: &mut Resolver<'_>, actor: CombatantId, weapon: &WeaponDef) {
    let Some(from) = r.state.combatant(actor).and_then(|c| c.slot) else {
        return;
    };
    let candidates = cleave_candidates(&r.state, actor);
    let pick = match r.config.cleave_tie_break {
        CleaveTieBreak::LowestHp => candidates
            .into_iter()
            .min_by_key(|&id| (r.state.combatant(id).map_or(u32::MAX, |c| c.hp), id)),
        CleaveTieBreak::Nearest => candidates.into_iter().min_by_key(|&id| {
            let distance = r
                .state
                .combatant(id)
                .and_then(|c| c.slot)
                .map_or(u32::MAX, |slot| slot.column_distance(from));
            (distance, id)
        }),
        CleaveTieBreak::LowestId => candidates.into_iter().min(),
    };

    if let Some(victim) = pick {
        r.emit(CombatEvent::CleaveTriggered {
            attacker: actor,
            target: victim,
        });
        strike(
            r,
            actor,
            victim,
            weapon,
            Strike {
                kind: AttackKind::Cleave,
                ..Strike::NORMAL
            },
        );
    }
}

/// One shared roll against every combatant under the blast.
fn resolve_blast(r: &mut Resolver<'_>, actor: CombatantId, weapon: &WeaponDef, center: SlotRef) {
    let Some(pattern) = weapon.blast else {
        return;
    };
    let side = r.get(actor).side();
    let victims: Vec<CombatantId> = blast_tiles(&r.state.battlefield, center, pattern)
        .into_iter()
        .filter_map(|tile| r.state.battlefield.occupant(tile))
        .filter(|&id| id != actor)
        .collect();

    let roll = r.d20();
    for victim in victims {
        if !r.is_standing(victim) {
            continue;
        }
        let friendly = r.get(victim).side() == side;
        if friendly && weapon.friendly_fire_pct == 0 {
            continue;
        }
        strike(
            r,
            actor,
            victim,
            weapon,
            Strike {
                kind: AttackKind::Blast,
                roll: Some(roll),
                damage_pct: friendly.then_some(weapon.friendly_fire_pct),
                ..Strike::NORMAL
            },
        );
    }
}

/// Fire every overwatching opponent whose zone contains `mover`.
///
/// Watchers fire once each, in id order. The accuracy penalty grows with
/// every reaction already fired this turn.
pub(super) fn trigger_overwatch(r: &mut Resolver<'_>, mover: CombatantId) {
    let side = r.get(mover).side();
    let watchers: Vec<CombatantId> = r
        .state
        .standing(side.opponent())
        .filter(|c| c.status.overwatching)
        .map(|c| c.id)
        .collect();

    for watcher in watchers {
        let mover_slot = r.state.combatant(mover).filter(|c| c.is_standing()).and_then(|c| c.slot);
        let Some(slot) = mover_slot else {
            break;
        };
        if !r.is_standing(watcher) || !overwatch_zone(&r.state, r.armory, watcher).contains(&slot) {
            continue;
        }

        let penalty = r.config.overwatch_penalty_base
            + r.config.overwatch_penalty_step * r.state.overwatch_reactions as i32;
        r.state.overwatch_reactions += 1;
        r.update(watcher, |c| c.status.overwatching = false);
        r.emit(CombatEvent::OverwatchTriggered {
            watcher,
            trigger: mover,
            penalty,
        });

        let weapon = r.armory.weapon(r.get(watcher).weapon).clone();
        strike(
            r,
            watcher,
            mover,
            &weapon,
            Strike {
                kind: AttackKind::Reaction,
                penalty,
                ..Strike::NORMAL
            },
        );
    }
}
