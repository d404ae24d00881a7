//! Working context for one transition.

use crate::core::{CombatConfig, CombatState, Combatant, CombatantId, Dice};
use crate::equipment::Armory;
use crate::events::CombatEvent;

/// Mutable scratch space for a single `resolve` or `begin` call.
///
/// Owns a private copy of the state; the caller's snapshot is never
/// touched. Events are collected in emission order.
pub(crate) struct Resolver<'a> {
    pub config: &'a CombatConfig,
    pub armory: &'a Armory,
    pub state: CombatState,
    pub events: Vec<CombatEvent>,
    dice: &'a mut dyn Dice,
}

impl<'a> Resolver<'a> {
    pub fn new(
        config: &'a CombatConfig,
        armory: &'a Armory,
        state: CombatState,
        dice: &'a mut dyn Dice,
    ) -> Self {
        Self {
            config,
            armory,
            state,
            events: Vec::new(),
            dice,
        }
    }

    pub fn emit(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    pub fn d20(&mut self) -> u32 {
        let roll = self.dice.d20();
        tracing::trace!("d20 rolled {}", roll);
        roll
    }

    /// A copy of a combatant. Panics on a missing id, which validation and
    /// the invariant check rule out.
    pub fn get(&self, id: CombatantId) -> Combatant {
        match self.state.combatant(id) {
            Some(c) => c.clone(),
            None => panic!("combatant {id} vanished mid-resolution"),
        }
    }

    /// Edit a combatant in place. Missing ids are ignored.
    pub fn update(&mut self, id: CombatantId, f: impl FnOnce(&mut Combatant)) {
        if let Some(c) = self.state.combatant_mut(id) {
            f(c);
        }
    }

    pub fn spend_ap(&mut self, id: CombatantId, cost: u8) {
        self.update(id, |c| c.ap_remaining = c.ap_remaining.saturating_sub(cost));
    }

    pub fn is_standing(&self, id: CombatantId) -> bool {
        self.state.combatant(id).is_some_and(Combatant::is_standing)
    }

    /// Take a combatant off the battlefield and cut every link to it.
    ///
    /// Used for defeat and successful flight. Status flags that only make
    /// sense on the field are cleared; guards stay defending.
    pub fn withdraw(&mut self, id: CombatantId) {
        self.state.battlefield.remove(id);
        let c = self.get(id);
        if let Some(ward) = c.guarding {
            self.update(ward, |w| w.guarded_by = None);
        }
        if let Some(guard) = c.guarded_by {
            self.update(guard, |g| g.guarding = None);
        }
        self.update(id, |c| {
            c.slot = None;
            c.guarding = None;
            c.guarded_by = None;
            c.status.defending = false;
            c.status.overwatching = false;
            c.status.aimed_shot_ready = false;
        });
        self.state.marks.retain(|m| m.target != id);
    }

    /// Drop a combatant to 0 HP. Hostiles die, friendlies are knocked out.
    pub fn defeat(&mut self, id: CombatantId, by: Option<CombatantId>) {
        let knocked_out = self.get(id).side() == crate::core::Side::Friendly;
        self.update(id, |c| {
            c.hp = 0;
            if knocked_out {
                c.status.knocked_out = true;
            } else {
                c.status.dead = true;
            }
        });
        self.withdraw(id);
        tracing::debug!("{} defeated by {:?} (knocked out: {})", id, by, knocked_out);
        self.emit(CombatEvent::CharacterDefeated {
            target: id,
            by,
            knocked_out,
        });
    }
}
