//! The combat reducer.
//!
//! `CombatEngine` is immutable rules data (configuration plus the armory).
//! Its `resolve` is the only way to produce a new `CombatState`:
//!
//! 1. verify the incoming snapshot (a corrupted state is fatal)
//! 2. validate the action (an illegal action returns the state unchanged)
//! 3. resolve it on a private copy through one exhaustive `match`
//! 4. append exactly one log entry
//! 5. evaluate terminal conditions at turn end, then end or continue the turn
//!
//! Given the same state, action and dice, the result is always identical.

use super::attack::resolve_attack;
use super::context::Resolver;
use super::flee::resolve_flee;
use super::items::resolve_use_item;
use super::movement::{resolve_move, resolve_swap};
use super::outcome::evaluate;
use super::prepare::{resolve_aimed_shot, resolve_defend, resolve_mark, resolve_overwatch};
use super::turn::{advance, end_turn, roll_initiative, start_turn};
use super::validate::validate;
use crate::battlefield::{valid_blast_centers, SlotRef};
use crate::core::{AttackTarget, CombatAction, CombatConfig, CombatState, CombatantId, Dice, Phase};
use crate::equipment::{Armory, WeaponClass};
use crate::error::ValidationError;
use crate::events::{CombatEvent, CombatLogEntry};

/// A successful transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// The new snapshot.
    pub state: CombatState,
    /// What happened, in order.
    pub events: Vec<CombatEvent>,
}

/// Immutable combat rules.
#[derive(Clone, Debug, Default)]
pub struct CombatEngine {
    config: CombatConfig,
    armory: Armory,
}

impl CombatEngine {
    /// Create an engine.
    #[must_use]
    pub fn new(config: CombatConfig, armory: Armory) -> Self {
        Self { config, armory }
    }

    /// Rules configuration.
    #[must_use]
    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Weapon and item definitions.
    #[must_use]
    pub fn armory(&self) -> &Armory {
        &self.armory
    }

    /// Roll initiative and start the first turn.
    ///
    /// Only a `PreBattle` state advances; anything else is returned as is
    /// with no events. Initiative is deterministic, so no dice are needed.
    #[must_use]
    pub fn begin(&self, state: &CombatState) -> (CombatState, Vec<CombatEvent>) {
        if state.phase != Phase::PreBattle {
            return (state.clone(), Vec::new());
        }
        self.assert_consistent(state);

        let mut dice = crate::core::ScriptedDice::default();
        let mut r = Resolver::new(&self.config, &self.armory, state.clone(), &mut dice);
        roll_initiative(&mut r);
        start_turn(&mut r);

        let Resolver { mut state, events, .. } = r;
        state.pending_events = events.clone();
        self.assert_consistent(&state);
        (state, events)
    }

    /// Check an action without resolving it.
    pub fn validate(
        &self,
        state: &CombatState,
        action: &CombatAction,
    ) -> Result<(), ValidationError> {
        validate(&self.config, &self.armory, state, action).map(|_| ())
    }

    /// Resolve an action, reporting why it was rejected.
    ///
    /// Panics if `state` violates a structural invariant.
    pub fn try_resolve<D: Dice + ?Sized>(
        &self,
        state: &CombatState,
        action: &CombatAction,
        dice: &mut D,
    ) -> Result<Resolution, ValidationError> {
        self.assert_consistent(state);
        let cost = validate(&self.config, &self.armory, state, action).map_err(|e| {
            tracing::debug!("rejected {:?}: {}", action, e);
            e
        })?;

        let turn = state.turn;
        let mut dice = DiceRef(dice);
        let mut r = Resolver::new(&self.config, &self.armory, state.clone(), &mut dice);
        let actor = action.actor();
        r.state.phase = Phase::Resolving;
        r.spend_ap(actor, cost);

        let ends_turn = match *action {
            CombatAction::Attack { target, .. } => {
                resolve_attack(&mut r, actor, target);
                false
            }
            CombatAction::Defend { guard, .. } => {
                resolve_defend(&mut r, actor, guard);
                true
            }
            CombatAction::Overwatch { .. } => {
                resolve_overwatch(&mut r, actor);
                true
            }
            CombatAction::AimedShot { .. } => {
                resolve_aimed_shot(&mut r, actor);
                false
            }
            CombatAction::MarkTarget { target, .. } => {
                resolve_mark(&mut r, actor, target);
                false
            }
            CombatAction::Move { to, .. } => {
                resolve_move(&mut r, actor, to);
                false
            }
            CombatAction::Swap { with, .. } => {
                resolve_swap(&mut r, actor, with);
                false
            }
            CombatAction::UseItem { item, target, .. } => {
                resolve_use_item(&mut r, actor, item, target);
                false
            }
            CombatAction::Flee { .. } => {
                resolve_flee(&mut r, actor);
                true
            }
            CombatAction::EndTurn { .. } => true,
        };

        r.state.phase = Phase::TurnEnd;
        if !evaluate(&mut r) {
            let spent = r
                .state
                .combatant(actor)
                .map_or(true, |c| c.is_down() || c.ap_remaining == 0);
            if ends_turn || spent {
                end_turn(&mut r, actor);
                advance(&mut r);
            } else {
                r.state.phase = Phase::AwaitingInput;
            }
        }

        let Resolver { mut state, events, .. } = r;
        let sequence = state.log.len() as u32;
        let entry = CombatLogEntry::from_events(sequence, turn, action, &events, &state);
        state.log.push_back(entry);
        state.pending_events = events.clone();

        self.assert_consistent(&state);
        Ok(Resolution { state, events })
    }

    /// Resolve an action.
    ///
    /// An illegal action returns an unchanged copy of `state` and no events.
    /// Panics if `state` violates a structural invariant.
    #[must_use]
    pub fn resolve<D: Dice + ?Sized>(
        &self,
        state: &CombatState,
        action: &CombatAction,
        dice: &mut D,
    ) -> (CombatState, Vec<CombatEvent>) {
        match self.try_resolve(state, action, dice) {
            Ok(Resolution { state, events }) => (state, events),
            Err(_) => (state.clone(), Vec::new()),
        }
    }

    /// Every action the current actor may legally take, in a fixed order.
    #[must_use]
    pub fn legal_actions(&self, state: &CombatState) -> Vec<CombatAction> {
        let Some(actor) = state.current_actor() else {
            return Vec::new();
        };
        let Some(c) = state.combatant(actor) else {
            return Vec::new();
        };

        let others: Vec<CombatantId> = state.combatants.keys().copied().collect();
        let width = state.battlefield.width();
        let mut candidates = Vec::new();

        candidates.extend(others.iter().map(|&id| CombatAction::Attack {
            actor,
            target: AttackTarget::Combatant(id),
        }));
        if let Some(from) = c.slot {
            let weapon = self.armory.weapon(c.weapon);
            if weapon.class == WeaponClass::Area {
                let occupied = |tile: &SlotRef| state.battlefield.occupant(*tile).is_some();
                candidates.extend(
                    valid_blast_centers(&state.battlefield, weapon, from)
                        .into_iter()
                        .filter(|tile| !occupied(tile))
                        .map(|tile| CombatAction::Attack {
                            actor,
                            target: AttackTarget::Tile(tile),
                        }),
                );
            }
        }
        candidates.push(CombatAction::Defend { actor, guard: None });
        candidates.extend(others.iter().map(|&id| CombatAction::Defend {
            actor,
            guard: Some(id),
        }));
        candidates.push(CombatAction::Overwatch { actor });
        candidates.push(CombatAction::AimedShot { actor });
        candidates.extend(others.iter().map(|&target| CombatAction::MarkTarget { actor, target }));
        candidates.extend((0..width).map(|to| CombatAction::Move { actor, to }));
        candidates.extend((0..width).map(|with| CombatAction::Swap { actor, with }));
        for stack in &c.items {
            candidates.push(CombatAction::UseItem {
                actor,
                item: stack.item,
                target: None,
            });
            candidates.extend(others.iter().filter(|&&id| id != actor).map(|&id| {
                CombatAction::UseItem {
                    actor,
                    item: stack.item,
                    target: Some(id),
                }
            }));
        }
        candidates.push(CombatAction::Flee { actor });
        candidates.push(CombatAction::EndTurn { actor });

        candidates.retain(|action| self.validate(state, action).is_ok());
        candidates
    }

    fn assert_consistent(&self, state: &CombatState) {
        if let Err(violation) = state.verify(self.config.ap_per_turn) {
            panic!("corrupted combat state: {violation}");
        }
    }
}

/// Forwards to a caller-supplied, possibly unsized, dice source.
struct DiceRef<'d, D: Dice + ?Sized>(&'d mut D);

impl<D: Dice + ?Sized> Dice for DiceRef<'_, D> {
    fn roll(&mut self, sides: u32) -> u32 {
        self.0.roll(sides)
    }
}
