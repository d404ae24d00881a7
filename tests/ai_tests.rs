//! AI policy integration tests.
//!
//! Decisions must be reproducible for a fixed state and must never
//! propose an action the engine would reject.

use grid_tactics::ai::{decide, play_out, ActionPolicy, TacticalPolicy};
use grid_tactics::battlefield::valid_attack_targets;
use grid_tactics::core::{AttackTarget, CombatAction, CombatState, CombatantId, Dice, ScriptedDice};
use grid_tactics::encounter::{CombatantSpec, Encounter};
use grid_tactics::equipment::{Armory, WeaponDef, WeaponId};
use grid_tactics::rules::CombatEngine;
use grid_tactics::{CombatConfig, GameRng};

const PLAYER: CombatantId = CombatantId(0);

/// Resolve end-turn actions until `actor` is up.
fn skip_to(engine: &CombatEngine, mut state: CombatState, actor: CombatantId) -> CombatState {
    let mut dice = ScriptedDice::always(10);
    while let Some(current) = state.current_actor() {
        if current == actor {
            break;
        }
        state = engine.resolve(&state, &CombatAction::EndTurn { actor: current }, &mut dice).0;
    }
    state
}

// =============================================================================
// Decisions
// =============================================================================

#[test]
fn test_no_decision_for_player() {
    let engine = CombatEngine::default();
    let start = Encounter::new(CombatantSpec::new("Aria", 1))
        .with_enemy(CombatantSpec::new("Goblin", 1))
        .build(&engine)
        .unwrap();

    assert_eq!(decide(&engine, &start), None);
    let state = engine.begin(&start).0;
    assert_eq!(state.current_actor(), Some(PLAYER));
    assert_eq!(decide(&engine, &state), None);
}

#[test]
fn test_attacks_weakest_then_lowest_id() {
    let engine = CombatEngine::default();
    let bram = CombatantId(1);
    let cora = CombatantId(2);
    let goblin = CombatantId(3);
    let start = Encounter::new(CombatantSpec::new("Aria", 1).at_slot(0))
        .with_ally(CombatantSpec::new("Bram", 1).at_slot(1))
        .with_ally(CombatantSpec::new("Cora", 1).at_slot(2))
        .with_enemy(CombatantSpec::new("Goblin", 1).at_slot(1))
        .build(&engine)
        .unwrap();
    let state = skip_to(&engine, engine.begin(&start).0, goblin);

    // Everyone at full HP: lowest id wins.
    assert_eq!(
        decide(&engine, &state),
        Some(CombatAction::Attack {
            actor: goblin,
            target: AttackTarget::Combatant(PLAYER),
        })
    );

    let mut wounded = state.clone();
    for (id, hp) in [(bram, 10), (cora, 10)] {
        if let Some(c) = wounded.combatants.get_mut(&id) {
            c.hp = hp;
        }
    }
    assert_eq!(
        decide(&engine, &wounded),
        Some(CombatAction::Attack {
            actor: goblin,
            target: AttackTarget::Combatant(bram),
        })
    );
}

#[test]
fn test_closes_distance_to_attack() {
    let engine = CombatEngine::default();
    let goblin = CombatantId(1);
    let start = Encounter::new(CombatantSpec::new("Aria", 1).at_slot(0))
        .with_enemy(CombatantSpec::new("Goblin", 1).at_slot(4))
        .build(&engine)
        .unwrap();
    let state = skip_to(&engine, engine.begin(&start).0, goblin);
    assert!(valid_attack_targets(&state, engine.armory(), goblin).is_empty());

    let action = decide(&engine, &state).unwrap();
    assert_eq!(action, CombatAction::Move { actor: goblin, to: 0 });

    let (moved, _) = engine.resolve(&state, &action, &mut ScriptedDice::always(10));
    assert_eq!(valid_attack_targets(&moved, engine.armory(), goblin), vec![PLAYER]);
    assert!(matches!(decide(&engine, &moved), Some(CombatAction::Attack { .. })));
}

#[test]
fn test_defends_when_attack_unaffordable() {
    let armory = Armory::new().with_weapon(WeaponDef::melee(WeaponId(1), "Maul").with_ap_cost(2));
    let engine = CombatEngine::new(CombatConfig::default().with_ap_per_turn(1), armory);
    let goblin = CombatantId(1);
    let start = Encounter::new(CombatantSpec::new("Aria", 1).at_slot(0))
        .with_enemy(CombatantSpec::new("Goblin", 1).with_weapon(WeaponId(1)).at_slot(0))
        .build(&engine)
        .unwrap();
    let state = skip_to(&engine, engine.begin(&start).0, goblin);

    assert_eq!(
        decide(&engine, &state),
        Some(CombatAction::Defend {
            actor: goblin,
            guard: None,
        })
    );
}

#[test]
fn test_decisions_are_always_legal() {
    let engine = CombatEngine::default();
    let start = Encounter::new(CombatantSpec::new("Aria", 4))
        .with_ally(CombatantSpec::new("Bram", 3).at_slot(3))
        .with_enemy(CombatantSpec::new("Goblin", 2).at_slot(4))
        .with_enemy(CombatantSpec::new("Orc", 5))
        .build(&engine)
        .unwrap();

    let mut state = engine.begin(&start).0;
    let mut dice = GameRng::new(99);
    for _ in 0..200 {
        let Some(actor) = state.current_actor() else {
            break;
        };
        let action = TacticalPolicy
            .decide(&engine, &state)
            .unwrap_or(CombatAction::EndTurn { actor });
        assert_eq!(engine.validate(&state, &action), Ok(()), "{action:?}");
        state = engine.resolve(&state, &action, &mut dice).0;
    }
}

// =============================================================================
// Simulation
// =============================================================================

#[test]
fn test_play_out_reaches_an_outcome() {
    let engine = CombatEngine::default();
    let start = Encounter::new(CombatantSpec::new("Aria", 8))
        .with_ally(CombatantSpec::new("Bram", 6))
        .with_enemy(CombatantSpec::new("Goblin", 2))
        .with_enemy(CombatantSpec::new("Goblin", 2))
        .build(&engine)
        .unwrap();

    let end = play_out(&engine, &start, &mut GameRng::new(7), &TacticalPolicy, 1_000);
    assert!(end.is_over());
    assert!(end.result().is_some());
    assert_eq!(end.verify(engine.config().ap_per_turn), Ok(()));
}

#[test]
fn test_play_out_is_deterministic() {
    let engine = CombatEngine::default();
    let start = Encounter::new(CombatantSpec::new("Aria", 3))
        .with_enemy(CombatantSpec::new("Orc", 3))
        .build(&engine)
        .unwrap();

    let run = |seed| play_out(&engine, &start, &mut GameRng::new(seed), &TacticalPolicy, 1_000);
    assert_eq!(run(11), run(11));
}

/// A policy that always passes still lets the battle advance turn by turn.
#[test]
fn test_passive_policy_ends_turns() {
    struct Passive;

    impl ActionPolicy for Passive {
        fn decide(&self, _engine: &CombatEngine, _state: &CombatState) -> Option<CombatAction> {
            None
        }
    }

    let engine = CombatEngine::default();
    let start = Encounter::new(CombatantSpec::new("Aria", 1))
        .with_enemy(CombatantSpec::new("Goblin", 1))
        .build(&engine)
        .unwrap();

    let mut dice: Box<dyn Dice> = Box::new(ScriptedDice::always(10));
    let end = play_out(&engine, &start, dice.as_mut(), &Passive, 4);
    assert_eq!(end.turn, 3);
    assert_eq!(end.log.len(), 4);
    assert!(!end.is_over());
}
