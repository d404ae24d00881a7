//! Combatant identification and allegiance.
//!
//! Every participant in an encounter has a unique `CombatantId`. Ids are
//! allocated by the encounter builder in declaration order (player first,
//! then allies, then enemies), so "lowest id" is a stable, reproducible
//! tie-break everywhere in the engine.
//!
//! ```
//! use grid_tactics::core::{CombatantId, Side};
//!
//! let id = CombatantId::new(3);
//! assert_eq!(id.raw(), 3);
//! assert_eq!(Side::Friendly.opponent(), Side::Hostile);
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a combatant within one encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombatantId(pub u32);

impl CombatantId {
    /// Create a new combatant ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for CombatantId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Combatant({})", self.0)
    }
}

/// Which half of the battlefield a combatant fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The enemy row.
    Hostile,
    /// The player's row (player and allies).
    Friendly,
}

impl Side {
    /// The opposing side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Hostile => Side::Friendly,
            Side::Friendly => Side::Hostile,
        }
    }

    /// Grid row coordinate (hostile row is `y = 0`).
    #[must_use]
    pub const fn row_y(self) -> i32 {
        match self {
            Side::Hostile => 0,
            Side::Friendly => 1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Hostile => write!(f, "hostile"),
            Side::Friendly => write!(f, "friendly"),
        }
    }
}

/// Who drives a combatant's decisions.
///
/// Only `Player` waits for user input; allies and enemies are driven by an
/// `ActionPolicy`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Controller {
    /// The user-controlled protagonist.
    Player,
    /// AI-controlled companion on the friendly side.
    Ally,
    /// AI-controlled opponent on the hostile side.
    Enemy,
}

impl Controller {
    /// The side this controller fights for.
    #[must_use]
    pub const fn side(self) -> Side {
        match self {
            Controller::Player | Controller::Ally => Side::Friendly,
            Controller::Enemy => Side::Hostile,
        }
    }

    /// Whether decisions come from user input.
    #[must_use]
    pub const fn is_player(self) -> bool {
        matches!(self, Controller::Player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_follows_raw_id() {
        assert!(CombatantId(1) < CombatantId(2));
        let mut ids = vec![CombatantId(5), CombatantId(0), CombatantId(3)];
        ids.sort();
        assert_eq!(ids, vec![CombatantId(0), CombatantId(3), CombatantId(5)]);
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Hostile.opponent(), Side::Friendly);
        assert_eq!(Side::Friendly.opponent(), Side::Hostile);
        assert_ne!(Side::Hostile.row_y(), Side::Friendly.row_y());
    }

    #[test]
    fn test_controller_side() {
        assert_eq!(Controller::Player.side(), Side::Friendly);
        assert_eq!(Controller::Ally.side(), Side::Friendly);
        assert_eq!(Controller::Enemy.side(), Side::Hostile);
        assert!(Controller::Player.is_player());
        assert!(!Controller::Ally.is_player());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", CombatantId(42)), "Combatant(42)");
        assert_eq!(format!("{}", Side::Hostile), "hostile");
    }

    #[test]
    fn test_serialization() {
        let id = CombatantId(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: CombatantId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
