//! Battlefield grid and targeting rules.
//!
//! The battlefield is two facing rows of slots: the hostile row (`y = 0`)
//! and the friendly row (`y = 1`). Column is the slot index. All distances
//! are Chebyshev distances on that grid.
//!
//! - `grid`: slot storage and occupancy
//! - `targeting`: reach, line of sight, blast patterns, valid target sets

mod grid;
mod targeting;

pub use grid::{Battlefield, SlotRef};
pub use targeting::{
    blast_tiles, can_reach, cleave_candidates, has_line_of_sight, is_valid_blast_center,
    overwatch_zone, valid_attack_targets, valid_blast_centers,
};
