//! Combat rules configuration.
//!
//! Every tunable constant of the reducer lives in `CombatConfig`. Balance
//! changes are data changes: the engine never hardcodes a threshold that is
//! not read from here (the stat formulas in `stats` are the exception, they
//! are a fixed contract).

use serde::{Deserialize, Serialize};

/// How a cleave picks its follow-up victim among several eligible enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CleaveTieBreak {
    /// Lowest current HP, then lowest id.
    #[default]
    LowestHp,
    /// Smallest column distance from the attacker, then lowest id.
    Nearest,
    /// Lowest id.
    LowestId,
}

/// Combat rules configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatConfig {
    /// Slots per battlefield row.
    pub grid_width: u8,

    /// Action points granted at the start of each turn.
    pub ap_per_turn: u8,

    // === Action costs ===
    /// AP cost of moving to an empty slot.
    pub move_cost: u8,
    /// AP cost of swapping with an adjacent ally.
    pub swap_cost: u8,
    /// AP cost of defending.
    pub defend_cost: u8,
    /// AP cost of setting overwatch.
    pub overwatch_cost: u8,
    /// AP cost of readying an aimed shot.
    pub aimed_shot_cost: u8,
    /// AP cost of marking a target.
    pub mark_cost: u8,
    /// AP cost of fleeing. The attempt always ends the turn.
    pub flee_cost: u8,

    // === Hit quality ===
    /// Minimum margin for a crushing hit.
    pub crushing_margin: i32,
    /// Minimum margin for a solid hit.
    pub solid_margin: i32,
    /// Damage percentage applied on a crushing hit.
    pub crushing_damage_pct: u32,
    /// Damage percentage applied on a solid hit.
    pub solid_damage_pct: u32,
    /// Damage percentage applied on a marginal hit.
    pub marginal_damage_pct: u32,
    /// Final damage at or above this percentage of max HP counts as overkill.
    pub overkill_pct: u32,

    // === Defend ===
    /// Defense bonus while defending.
    pub defend_bonus: i32,
    /// Percentage of damage a guard takes in place of its ward.
    pub intercept_pct: u32,

    // === Preparatory actions ===
    /// Turns a mark stays active after placement.
    pub mark_duration: u32,
    /// Attack bonus for ranged and area attacks against a marked target.
    pub mark_attack_bonus: i32,
    /// Attack bonus granted by an aimed shot charge.
    pub aimed_attack_bonus: i32,
    /// Damage bonus granted by an aimed shot charge.
    pub aimed_damage_bonus: u32,
    /// Base accuracy penalty of an overwatch reaction.
    pub overwatch_penalty_base: i32,
    /// Extra penalty per reaction already fired this turn.
    pub overwatch_penalty_step: i32,
    /// Light weapon attacks allowed per turn.
    pub light_attacks_per_turn: u8,

    // === Flee ===
    /// Difficulty a flee roll must meet.
    pub flee_dc: u32,

    // === Outcome ===
    /// HP percentage restored to knocked-out allies after a victory.
    pub revive_pct: u32,
    /// Experience awarded per level of each defeated hostile.
    pub xp_per_level: u32,

    // === Initiative ===
    /// Initiative bonus for the side holding the advantage.
    pub initiative_advantage_bonus: u32,

    /// Follow-up target selection for cleave.
    pub cleave_tie_break: CleaveTieBreak,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            grid_width: 5,
            ap_per_turn: 3,
            move_cost: 1,
            swap_cost: 1,
            defend_cost: 1,
            overwatch_cost: 1,
            aimed_shot_cost: 1,
            mark_cost: 1,
            flee_cost: 0,
            crushing_margin: 8,
            solid_margin: 3,
            crushing_damage_pct: 150,
            solid_damage_pct: 100,
            marginal_damage_pct: 50,
            overkill_pct: 100,
            defend_bonus: 2,
            intercept_pct: 50,
            mark_duration: 2,
            mark_attack_bonus: 2,
            aimed_attack_bonus: 3,
            aimed_damage_bonus: 2,
            overwatch_penalty_base: 2,
            overwatch_penalty_step: 2,
            light_attacks_per_turn: 2,
            flee_dc: 12,
            revive_pct: 25,
            xp_per_level: 10,
            initiative_advantage_bonus: 2,
            cleave_tie_break: CleaveTieBreak::LowestHp,
        }
    }
}

impl CombatConfig {
    /// Set the number of slots per row.
    #[must_use]
    pub fn with_grid_width(mut self, width: u8) -> Self {
        self.grid_width = width;
        self
    }

    /// Set the AP granted per turn.
    #[must_use]
    pub fn with_ap_per_turn(mut self, ap: u8) -> Self {
        self.ap_per_turn = ap;
        self
    }

    /// Set the percentage of damage a guard intercepts.
    #[must_use]
    pub fn with_intercept_pct(mut self, pct: u32) -> Self {
        self.intercept_pct = pct;
        self
    }

    /// Set the flee difficulty.
    #[must_use]
    pub fn with_flee_dc(mut self, dc: u32) -> Self {
        self.flee_dc = dc;
        self
    }

    /// Set the cleave tie-break.
    #[must_use]
    pub fn with_cleave_tie_break(mut self, tie_break: CleaveTieBreak) -> Self {
        self.cleave_tie_break = tie_break;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CombatConfig::default();
        assert_eq!(config.grid_width, 5);
        assert_eq!(config.ap_per_turn, 3);
        assert_eq!(config.crushing_margin, 8);
        assert_eq!(config.solid_margin, 3);
        assert_eq!(config.cleave_tie_break, CleaveTieBreak::LowestHp);
    }

    #[test]
    fn test_builder_pattern() {
        let config = CombatConfig::default()
            .with_grid_width(7)
            .with_ap_per_turn(2)
            .with_intercept_pct(100)
            .with_flee_dc(5)
            .with_cleave_tie_break(CleaveTieBreak::Nearest);

        assert_eq!(config.grid_width, 7);
        assert_eq!(config.ap_per_turn, 2);
        assert_eq!(config.intercept_pct, 100);
        assert_eq!(config.flee_dc, 5);
        assert_eq!(config.cleave_tie_break, CleaveTieBreak::Nearest);
    }

    #[test]
    fn test_serialization() {
        let config = CombatConfig::default().with_flee_dc(15);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: CombatConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
