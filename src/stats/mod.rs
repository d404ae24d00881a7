//! Stat derivation from a single level value.
//!
//! The formulas here are a portable contract shared with balance tooling
//! and golden-master tests. They are pure integer arithmetic, total over
//! every input, and monotonic non-decreasing in level.

mod block;

pub use block::{attack_bonus, clamp_level, derive_stats, StatBlock, MAX_LEVEL, MIN_LEVEL};
