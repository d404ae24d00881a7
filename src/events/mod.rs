//! Combat events and the narrative log.
//!
//! - `event`: typed records of resolved effects, handed to playback
//! - `log`: one narrative entry per resolved action

mod event;
mod log;

pub use event::{AttackKind, AttackReport, CombatEvent, HitQuality};
pub use log::{ActionOutcome, CombatLogEntry};
