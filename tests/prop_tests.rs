//! Property tests over random encounters and random legal action streams.

use proptest::prelude::*;

use grid_tactics::battlefield::{can_reach, valid_attack_targets};
use grid_tactics::core::{CombatAction, CombatState, GameRng, Side};
use grid_tactics::encounter::{CombatantSpec, Encounter};
use grid_tactics::equipment::{
    Armory, BlastPattern, BuffKind, ItemDef, ItemEffect, ItemId, WeaponDef, WeaponId, WeaponWeight,
};
use grid_tactics::rules::CombatEngine;
use grid_tactics::stats::derive_stats;
use grid_tactics::CombatConfig;

fn engine() -> CombatEngine {
    let mut longbow = WeaponDef::ranged(WeaponId(4), "Longbow", 2, 4);
    longbow.los_exempt = true;
    let armory = Armory::new()
        .with_weapon(WeaponDef::melee(WeaponId(1), "Axe").with_cleave().with_damage_bonus(2))
        .with_weapon(WeaponDef::ranged(WeaponId(2), "Bow", 1, 3))
        .with_weapon(WeaponDef::area(WeaponId(3), "Bomb", 3, BlastPattern::Radius, 50))
        .with_weapon(longbow)
        .with_weapon(WeaponDef::melee(WeaponId(5), "Dagger").with_weight(WeaponWeight::Light))
        .with_item(ItemDef::new(ItemId(1), "Potion", ItemEffect::Heal { pct: 30, min: 5 }))
        .with_item(ItemDef::new(
            ItemId(2),
            "Tonic",
            ItemEffect::Buff {
                kind: BuffKind::Attack,
                amount: 2,
                turns: 2,
            },
        ));
    CombatEngine::new(CombatConfig::default(), armory)
}

fn spec(name: &str, (level, weapon): (u32, u32)) -> CombatantSpec {
    CombatantSpec::new(name, level)
        .with_weapon(WeaponId(weapon))
        .with_item(ItemId(1), 1)
        .with_item(ItemId(2), 1)
}

fn fighter() -> impl Strategy<Value = (u32, u32)> {
    (1u32..=20, 0u32..=5)
}

prop_compose! {
    fn encounter()(
        player in fighter(),
        allies in prop::collection::vec(fighter(), 0..=2),
        enemies in prop::collection::vec(fighter(), 1..=3),
        advantage in prop::option::of(prop_oneof![Just(Side::Friendly), Just(Side::Hostile)]),
    ) -> Encounter {
        let mut encounter = Encounter::new(spec("Player", player));
        for (i, ally) in allies.into_iter().enumerate() {
            encounter = encounter.with_ally(spec(&format!("Ally{i}"), ally));
        }
        for (i, enemy) in enemies.into_iter().enumerate() {
            encounter = encounter.with_enemy(spec(&format!("Enemy{i}"), enemy));
        }
        if let Some(side) = advantage {
            encounter = encounter.with_advantage(side);
        }
        encounter
    }
}

/// AP an action should cost, restated from the rules configuration.
fn expected_cost(engine: &CombatEngine, state: &CombatState, action: &CombatAction) -> u8 {
    let config = engine.config();
    match *action {
        CombatAction::Attack { actor, .. } => state
            .combatant(actor)
            .map_or(0, |c| engine.armory().weapon(c.weapon).ap_cost),
        CombatAction::Defend { .. } => config.defend_cost,
        CombatAction::Overwatch { .. } => config.overwatch_cost,
        CombatAction::AimedShot { .. } => config.aimed_shot_cost,
        CombatAction::MarkTarget { .. } => config.mark_cost,
        CombatAction::Move { .. } => config.move_cost,
        CombatAction::Swap { .. } => config.swap_cost,
        CombatAction::UseItem { item, .. } => engine.armory().item(item).map_or(0, |d| d.ap_cost),
        CombatAction::Flee { .. } => config.flee_cost,
        CombatAction::EndTurn { .. } => 0,
    }
}

fn check_targets(engine: &CombatEngine, state: &CombatState) -> Result<(), TestCaseError> {
    let Some(actor) = state.current_actor() else {
        return Ok(());
    };
    let attacker = state.combatant(actor).unwrap();
    let weapon = engine.armory().weapon(attacker.weapon);
    for id in valid_attack_targets(state, engine.armory(), actor) {
        let target = state.combatant(id).unwrap();
        prop_assert_ne!(id, actor);
        prop_assert!(target.is_standing());
        prop_assert_ne!(target.side(), attacker.side());
        let (from, to) = (attacker.slot.unwrap(), target.slot.unwrap());
        prop_assert!(can_reach(&state.battlefield, weapon, from, to));
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_stats_monotonic(a in 1u32..=60, b in 1u32..=60) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let (lo, hi) = (derive_stats(lo), derive_stats(hi));
        prop_assert!(lo.max_hp <= hi.max_hp);
        prop_assert!(lo.damage <= hi.damage);
        prop_assert!(lo.defense <= hi.defense);
        prop_assert!(lo.speed <= hi.speed);
        prop_assert!(lo.armor <= hi.armor);
    }

    #[test]
    fn prop_resolve_is_pure(
        encounter in encounter(),
        seed in any::<u64>(),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 1..20),
    ) {
        let engine = engine();
        let mut state = engine.begin(&encounter.build(&engine).unwrap()).0;
        let mut rng = GameRng::new(seed);

        for pick in picks {
            let legal = engine.legal_actions(&state);
            if legal.is_empty() {
                break;
            }
            let action = legal[pick.index(legal.len())];
            let fork = rng.fork();
            let first = engine.resolve(&state, &action, &mut fork.clone());
            let second = engine.resolve(&state, &action, &mut fork.clone());
            prop_assert_eq!(&first, &second);
            state = engine.resolve(&state, &action, &mut rng).0;
        }
    }

    #[test]
    fn prop_invariants_hold(
        encounter in encounter(),
        seed in any::<u64>(),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 1..60),
    ) {
        let engine = engine();
        let ap_per_turn = engine.config().ap_per_turn;
        let start = encounter.build(&engine).unwrap();
        let mut ids: Vec<_> = start.combatants.keys().copied().collect();
        ids.sort();
        let mut state = engine.begin(&start).0;
        let mut rng = GameRng::new(seed);

        for pick in picks {
            prop_assert_eq!(state.verify(ap_per_turn), Ok(()));
            check_targets(&engine, &state)?;

            let mut order = state.initiative.clone();
            order.sort();
            prop_assert_eq!(&order, &ids);
            if let Some(actor) = state.current_actor() {
                prop_assert!(state.combatant(actor).unwrap().is_standing());
            }

            let legal = engine.legal_actions(&state);
            if legal.is_empty() {
                prop_assert!(state.is_over());
                break;
            }
            let action = legal[pick.index(legal.len())];
            let actor = action.actor();
            let before = state.combatant(actor).unwrap().ap_remaining;
            let cost = expected_cost(&engine, &state, &action);

            let (next, events) = engine.resolve(&state, &action, &mut rng);
            let is_end_turn = matches!(action, CombatAction::EndTurn { .. });
            prop_assert!(!events.is_empty() || is_end_turn);
            prop_assert_eq!(next.log.len(), state.log.len() + 1);

            // AP only moves by the declared cost until the actor's next turn.
            let same_turn = next.turn == state.turn && next.current == state.current;
            if same_turn || next.current_actor() != Some(actor) {
                prop_assert_eq!(next.combatant(actor).unwrap().ap_remaining, before - cost);
            }

            // Terminal detection is never skipped.
            let friendlies = next.standing(Side::Friendly).count();
            let hostiles = next.standing(Side::Hostile).count();
            if friendlies == 0 || hostiles == 0 {
                prop_assert!(next.is_over());
            }
            if next.is_over() {
                prop_assert!(next.result().is_some());
                prop_assert_eq!(next.current_actor(), None);
            } else {
                prop_assert!(next.result().is_none());
            }

            state = next;
        }
    }

    #[test]
    fn prop_snapshots_round_trip(encounter in encounter(), seed in any::<u64>()) {
        let engine = engine();
        let state = engine.begin(&encounter.build(&engine).unwrap()).0;
        let state = grid_tactics::ai::play_out(
            &engine,
            &state,
            &mut GameRng::new(seed),
            &grid_tactics::TacticalPolicy,
            40,
        );

        let json = serde_json::to_string(&state).unwrap();
        let from_json: CombatState = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(&from_json, &state);

        let bytes = state.to_bytes().unwrap();
        let restored = CombatState::from_bytes(&bytes, engine.config().ap_per_turn).unwrap();
        prop_assert_eq!(restored, state);
    }
}
