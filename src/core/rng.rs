//! Deterministic dice for the combat reducer.
//!
//! The reducer never touches ambient randomness. Every roll goes through the
//! [`Dice`] port passed to `CombatEngine::resolve`, so identical
//! `(state, action, seed)` triples always produce identical outcomes.
//!
//! - [`GameRng`]: seeded ChaCha8 stream, forkable for independent branches
//! - [`ScriptedDice`]: replays a fixed list of rolls (tests, forced outcomes)
//!
//! ```
//! use grid_tactics::core::{Dice, GameRng};
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.roll(20), b.roll(20));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of die rolls.
pub trait Dice {
    /// Roll a die with `sides` faces, returning a value in `1..=sides`.
    fn roll(&mut self, sides: u32) -> u32;

    /// Roll a d20.
    fn d20(&mut self) -> u32 {
        self.roll(20)
    }
}

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Fork this RNG to create an independent, deterministic branch.
    ///
    /// Used to give each simulated battle in a batch its own stream.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self {
            inner: ChaCha8Rng::seed_from_u64(fork_seed),
            seed: fork_seed,
            fork_counter: 0,
        }
    }
}

impl Dice for GameRng {
    fn roll(&mut self, sides: u32) -> u32 {
        self.inner.gen_range(1..=sides.max(1))
    }
}

/// Dice that replay a fixed script of results.
///
/// Once the script runs out the last value repeats. Values are clamped into
/// `1..=sides` of the die being rolled.
///
/// ```
/// use grid_tactics::core::{Dice, ScriptedDice};
///
/// let mut dice = ScriptedDice::new([20, 3]);
/// assert_eq!(dice.d20(), 20);
/// assert_eq!(dice.d20(), 3);
/// assert_eq!(dice.d20(), 3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScriptedDice {
    rolls: Vec<u32>,
    cursor: usize,
}

impl ScriptedDice {
    /// Create dice that return `rolls` in order.
    pub fn new(rolls: impl IntoIterator<Item = u32>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            cursor: 0,
        }
    }

    /// Dice that always roll `value`.
    #[must_use]
    pub fn always(value: u32) -> Self {
        Self::new([value])
    }

    /// Number of rolls consumed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self, sides: u32) -> u32 {
        let value = match self.rolls.get(self.cursor) {
            Some(&v) => v,
            None => self.rolls.last().copied().unwrap_or(1),
        };
        self.cursor += 1;
        value.clamp(1, sides.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.d20(), rng2.d20());
        }
    }

    #[test]
    fn test_roll_in_bounds() {
        let mut rng = GameRng::new(7);
        for _ in 0..1000 {
            let r = rng.d20();
            assert!((1..=20).contains(&r));
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = GameRng::new(1);
        let mut rng2 = GameRng::new(2);

        let seq1: Vec<_> = (0..16).map(|_| rng1.roll(1000)).collect();
        let seq2: Vec<_> = (0..16).map(|_| rng2.roll(1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_fork_is_deterministic() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        let mut forked1 = rng1.fork();
        let mut forked2 = rng2.fork();

        assert_eq!(forked1.seed, forked2.seed);
        assert_eq!(forked1.d20(), forked2.d20());
    }

    #[test]
    fn test_scripted_dice_repeats_last() {
        let mut dice = ScriptedDice::new([4, 17]);
        assert_eq!(dice.d20(), 4);
        assert_eq!(dice.d20(), 17);
        assert_eq!(dice.d20(), 17);
        assert_eq!(dice.consumed(), 3);
    }

    #[test]
    fn test_scripted_dice_clamps() {
        let mut dice = ScriptedDice::new([0, 50]);
        assert_eq!(dice.roll(6), 1);
        assert_eq!(dice.roll(6), 6);

        let mut empty = ScriptedDice::default();
        assert_eq!(empty.d20(), 1);
    }
}
