//! Encounter initialization.
//!
//! An `Encounter` is the serializable description of a fight (who takes
//! part, at which level, with what gear) and builds the one `PreBattle`
//! `CombatState` the reducer starts from.
//!
//! Ids follow declaration order: the player is `0`, then allies, then
//! enemies. Explicit slot requests are honored first; everyone else takes
//! the lowest free slot of their row.
//!
//! ```
//! use grid_tactics::encounter::{CombatantSpec, Encounter};
//! use grid_tactics::rules::CombatEngine;
//!
//! let engine = CombatEngine::default();
//! let state = Encounter::new(CombatantSpec::new("Aria", 3))
//!     .with_enemy(CombatantSpec::new("Goblin", 2))
//!     .build(&engine)
//!     .unwrap();
//! assert_eq!(state.combatants.len(), 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::battlefield::SlotRef;
use crate::core::{CombatState, Combatant, CombatantId, Controller, ItemStack, Side};
use crate::equipment::{ItemId, WeaponId};
use crate::error::EncounterError;
use crate::rules::CombatEngine;

/// One participant's initialization data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantSpec {
    /// Display name.
    pub name: String,
    /// Level (clamped on build).
    pub level: u32,
    /// Equipped weapon.
    pub weapon: WeaponId,
    /// Carried consumables and their charges.
    pub items: Vec<(ItemId, u32)>,
    /// Requested slot index in the participant's row.
    pub slot: Option<u8>,
}

impl CombatantSpec {
    /// An unarmed participant with no items.
    pub fn new(name: impl Into<String>, level: u32) -> Self {
        Self {
            name: name.into(),
            level,
            weapon: WeaponId::UNARMED,
            items: Vec::new(),
            slot: None,
        }
    }

    /// Equip a weapon (builder pattern).
    #[must_use]
    pub fn with_weapon(mut self, weapon: WeaponId) -> Self {
        self.weapon = weapon;
        self
    }

    /// Carry an item (builder pattern).
    #[must_use]
    pub fn with_item(mut self, item: ItemId, charges: u32) -> Self {
        self.items.push((item, charges));
        self
    }

    /// Request a slot (builder pattern).
    #[must_use]
    pub fn at_slot(mut self, index: u8) -> Self {
        self.slot = Some(index);
        self
    }
}

/// Everything needed to start one fight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    /// The user-controlled protagonist.
    pub player: CombatantSpec,
    /// AI companions on the friendly row.
    pub allies: Vec<CombatantSpec>,
    /// Opponents on the hostile row.
    pub enemies: Vec<CombatantSpec>,
    /// Side that gets the initiative bonus (ambush, surprise).
    pub advantage: Option<Side>,
    /// Opaque room context for display.
    pub room: Option<String>,
}

impl Encounter {
    /// An encounter with only the player.
    #[must_use]
    pub fn new(player: CombatantSpec) -> Self {
        Self {
            player,
            allies: Vec::new(),
            enemies: Vec::new(),
            advantage: None,
            room: None,
        }
    }

    /// Add an ally (builder pattern).
    #[must_use]
    pub fn with_ally(mut self, ally: CombatantSpec) -> Self {
        self.allies.push(ally);
        self
    }

    /// Add an enemy (builder pattern).
    #[must_use]
    pub fn with_enemy(mut self, enemy: CombatantSpec) -> Self {
        self.enemies.push(enemy);
        self
    }

    /// Grant one side the initiative advantage (builder pattern).
    #[must_use]
    pub fn with_advantage(mut self, side: Side) -> Self {
        self.advantage = Some(side);
        self
    }

    /// Attach room metadata (builder pattern).
    #[must_use]
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    /// Build the pre-battle state.
    pub fn build(&self, engine: &CombatEngine) -> Result<CombatState, EncounterError> {
        if self.enemies.is_empty() {
            return Err(EncounterError::NoEnemies);
        }

        let width = engine.config().grid_width.max(1);
        let friendly_count = 1 + self.allies.len();
        if friendly_count > width as usize {
            return Err(EncounterError::RowFull {
                side: Side::Friendly,
                width,
                count: friendly_count,
            });
        }
        if self.enemies.len() > width as usize {
            return Err(EncounterError::RowFull {
                side: Side::Hostile,
                width,
                count: self.enemies.len(),
            });
        }

        let roster: Vec<(&CombatantSpec, Controller)> =
            std::iter::once((&self.player, Controller::Player))
                .chain(self.allies.iter().map(|s| (s, Controller::Ally)))
                .chain(self.enemies.iter().map(|s| (s, Controller::Enemy)))
                .collect();

        let mut state = CombatState::new(width);
        state.room = self.room.clone();
        state.advantage = self.advantage;

        for (index, &(spec, controller)) in roster.iter().enumerate() {
            let id = CombatantId(index as u32);
            state.combatants.insert(id, instantiate(engine, id, spec, controller)?);
        }

        // Explicit requests first, in declaration order.
        for (index, &(spec, controller)) in roster.iter().enumerate() {
            let Some(requested) = spec.slot else {
                continue;
            };
            if requested >= width {
                return Err(EncounterError::SlotOutOfBounds {
                    name: spec.name.clone(),
                    index: requested,
                    width,
                });
            }
            let slot = SlotRef::new(controller.side(), requested);
            if !state.battlefield.place(CombatantId(index as u32), slot) {
                return Err(EncounterError::SlotTaken {
                    name: spec.name.clone(),
                    index: requested,
                });
            }
        }

        for (index, &(spec, controller)) in roster.iter().enumerate() {
            if spec.slot.is_some() {
                continue;
            }
            let side = controller.side();
            let free = state.battlefield.free_slots(side).next();
            let id = CombatantId(index as u32);
            let placed = free.is_some_and(|slot| state.battlefield.place(id, slot));
            if !placed {
                return Err(EncounterError::RowFull {
                    side,
                    width,
                    count: roster.iter().filter(|(_, c)| c.side() == side).count(),
                });
            }
        }

        let placements: Vec<(SlotRef, CombatantId)> = state.battlefield.occupied().collect();
        for (slot, id) in placements {
            if let Some(c) = state.combatant_mut(id) {
                c.slot = Some(slot);
            }
        }

        tracing::debug!(
            "encounter built: {} combatants on a {}-wide field",
            state.combatants.len(),
            width
        );
        Ok(state)
    }
}

fn instantiate(
    engine: &CombatEngine,
    id: CombatantId,
    spec: &CombatantSpec,
    controller: Controller,
) -> Result<Combatant, EncounterError> {
    let armory = engine.armory();
    if !armory.has_weapon(spec.weapon) {
        return Err(EncounterError::UnknownWeapon {
            name: spec.name.clone(),
            weapon: spec.weapon,
        });
    }

    let mut combatant = Combatant::new(id, spec.name.clone(), controller, spec.level, spec.weapon);
    for &(item, charges) in &spec.items {
        if armory.item(item).is_none() {
            return Err(EncounterError::UnknownItem {
                name: spec.name.clone(),
                item,
            });
        }
        if charges > 0 {
            combatant.items.push(ItemStack { item, charges });
        }
    }
    Ok(combatant)
}
