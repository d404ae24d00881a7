//! The animation unit and the built-in timed animations.

use crate::error::AnimationError;

/// A time-driven visual effect.
///
/// The scheduler calls `update` once per tick until it reports done, then
/// calls `on_complete` exactly once. If the animation is cancelled or fails,
/// `on_cancel` runs instead so it can restore its visual invariants
/// (transform, opacity, ...). An animation never sees both hooks.
pub trait Animation {
    /// Advance by `dt` seconds. Returns `Ok(true)` once finished.
    fn update(&mut self, dt: f32) -> Result<bool, AnimationError>;

    /// Called once after the final `update`.
    fn on_complete(&mut self) {}

    /// Called once if the animation is stopped before it finishes.
    fn on_cancel(&mut self) {}
}

impl<A: Animation + ?Sized> Animation for Box<A> {
    fn update(&mut self, dt: f32) -> Result<bool, AnimationError> {
        (**self).update(dt)
    }

    fn on_complete(&mut self) {
        (**self).on_complete();
    }

    fn on_cancel(&mut self) {
        (**self).on_cancel();
    }
}

// =============================================================================
// Pause
// =============================================================================

/// Does nothing for a fixed duration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pause {
    duration: f32,
    elapsed: f32,
}

impl Pause {
    /// A gap of `seconds`. Non-positive durations finish on the first tick.
    #[must_use]
    pub fn new(seconds: f32) -> Self {
        Self {
            duration: seconds.max(0.0),
            elapsed: 0.0,
        }
    }

    /// Seconds left before the pause ends.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }
}

impl Animation for Pause {
    fn update(&mut self, dt: f32) -> Result<bool, AnimationError> {
        self.elapsed += dt;
        Ok(self.elapsed >= self.duration)
    }
}

// =============================================================================
// Tween
// =============================================================================

/// Drives a callback with linear progress from 0.0 to 1.0.
///
/// Completion snaps to 1.0, cancellation resets to 0.0.
pub struct Tween<F: FnMut(f32)> {
    duration: f32,
    elapsed: f32,
    apply: F,
}

impl<F: FnMut(f32)> Tween<F> {
    /// A tween over `seconds`.
    pub fn new(seconds: f32, apply: F) -> Self {
        Self {
            duration: seconds.max(0.0),
            elapsed: 0.0,
            apply,
        }
    }

    /// Current progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }
}

impl<F: FnMut(f32)> Animation for Tween<F> {
    fn update(&mut self, dt: f32) -> Result<bool, AnimationError> {
        self.elapsed += dt;
        let progress = self.progress();
        (self.apply)(progress);
        Ok(progress >= 1.0)
    }

    fn on_complete(&mut self) {
        (self.apply)(1.0);
    }

    fn on_cancel(&mut self) {
        (self.apply)(0.0);
    }
}

impl<F: FnMut(f32)> std::fmt::Debug for Tween<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tween")
            .field("duration", &self.duration)
            .field("elapsed", &self.elapsed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_pause_finishes_after_duration() {
        let mut pause = Pause::new(0.5);
        assert_eq!(pause.update(0.25), Ok(false));
        assert!((pause.remaining() - 0.25).abs() < f32::EPSILON);
        assert_eq!(pause.update(0.25), Ok(true));
        assert_eq!(Pause::new(-1.0).update(0.0), Ok(true));
    }

    #[test]
    fn test_tween_progress_and_hooks() {
        let seen = Rc::new(Cell::new(-1.0));
        let sink = Rc::clone(&seen);
        let mut tween = Tween::new(1.0, move |p| sink.set(p));

        assert_eq!(tween.update(0.5), Ok(false));
        assert!((seen.get() - 0.5).abs() < f32::EPSILON);
        assert_eq!(tween.update(2.0), Ok(true));
        assert_eq!(seen.get(), 1.0);

        tween.on_cancel();
        assert_eq!(seen.get(), 0.0);
        tween.on_complete();
        assert_eq!(seen.get(), 1.0);
    }

    #[test]
    fn test_zero_length_tween() {
        let mut tween = Tween::new(0.0, |_| {});
        assert_eq!(tween.progress(), 1.0);
        assert_eq!(tween.update(0.0), Ok(true));
    }
}
